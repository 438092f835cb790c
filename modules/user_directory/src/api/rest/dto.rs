use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    ClientSummary, ConsultantClientLink, ConsultantSummary, ConsultantWithClients, LinkedClient,
    NewUser, User, UserId, UserPatch, UserType,
};
use crate::domain::postal::PostalAddress;
use crate::domain::validation::{UserForm, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserTypeDto {
    Consultant,
    Client,
}

impl From<UserType> for UserTypeDto {
    fn from(t: UserType) -> Self {
        match t {
            UserType::Consultant => Self::Consultant,
            UserType::Client => Self::Client,
        }
    }
}

/// REST DTO for user representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub user_type: UserTypeDto,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub cpf: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub complement: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A client attached to a consultant, stamped with the link time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkedClientDto {
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    pub client: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantDto {
    #[serde(flatten)]
    pub consultant: UserDto,
    pub clients: Vec<LinkedClientDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummaryDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub link_created_at: DateTime<Utc>,
}

/// Consultant row of the filtered search.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantSummaryDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub user_type: UserTypeDto,
    pub clients: Vec<ClientSummaryDto>,
}

/// Query string of `GET /api/users`. Any present key switches to the consultant search.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UsersQuery {
    /// Case-insensitive substring of the consultant name.
    pub name: Option<String>,
    /// Case-insensitive substring of the consultant email.
    pub email: Option<String>,
    /// `YYYY-MM-DD`; lower bound on creation date (local midnight).
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`; upper bound on creation date (end of the local day).
    pub end_date: Option<String>,
}

impl UsersQuery {
    pub fn is_search(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }
}

/// REST DTO for creating a user. Only `name` and `email` are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserReq {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `CONSULTANT` or `CLIENT` (default).
    pub user_type: Option<String>,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub cpf: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub complement: Option<String>,
}

/// REST DTO for updating a user (partial).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserReq {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedDto {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkClientReq {
    pub client_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub id: i32,
    pub consultant_id: UserId,
    pub client_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Form record for `POST /api/users/validate`; missing fields count as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateFormReq {
    pub user_type: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub age: String,
    pub cpf: String,
    pub zip_code: String,
    pub state: String,
    pub address: String,
    pub complement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationResultDto {
    pub valid: bool,
    /// Field name (camelCase) to error message.
    pub errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddressDto {
    pub postal_code: String,
    pub street: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub ibge: String,
    pub ddd: String,
    /// Suggested single-line address.
    pub address_line: String,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
    /// `VALIDATION`, `NOT_FOUND`, `STORE_ERROR` or `LOOKUP_UNAVAILABLE`.
    pub code: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            user_type: user.user_type.into(),
            phone: user.phone,
            age: user.age,
            cpf: user.cpf,
            zip_code: user.zip_code,
            state: user.state,
            address: user.address,
            complement: user.complement,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<LinkedClient> for LinkedClientDto {
    fn from(linked: LinkedClient) -> Self {
        Self {
            created_at: linked.linked_at,
            client: linked.client.into(),
        }
    }
}

impl From<ConsultantWithClients> for ConsultantDto {
    fn from(c: ConsultantWithClients) -> Self {
        Self {
            consultant: c.consultant.into(),
            clients: c.clients.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ClientSummary> for ClientSummaryDto {
    fn from(c: ClientSummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            link_created_at: c.link_created_at,
        }
    }
}

impl From<ConsultantSummary> for ConsultantSummaryDto {
    fn from(c: ConsultantSummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            user_type: c.user_type.into(),
            clients: c.clients.into_iter().map(Into::into).collect(),
        }
    }
}

impl CreateUserReq {
    /// Missing `name`/`email` become empty strings; the service rejects them.
    pub fn into_new_user(self, user_type: Option<UserType>) -> NewUser {
        NewUser {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            user_type,
            phone: self.phone,
            age: self.age,
            cpf: self.cpf,
            zip_code: self.zip_code,
            state: self.state,
            address: self.address,
            complement: self.complement,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

impl From<ConsultantClientLink> for LinkDto {
    fn from(link: ConsultantClientLink) -> Self {
        Self {
            id: link.id,
            consultant_id: link.consultant_id,
            client_id: link.client_id,
            created_at: link.created_at,
        }
    }
}

impl From<ValidateFormReq> for UserForm {
    fn from(req: ValidateFormReq) -> Self {
        Self {
            user_type: req.user_type,
            name: req.name,
            phone: req.phone,
            email: req.email,
            age: req.age,
            cpf: req.cpf,
            zip_code: req.zip_code,
            state: req.state,
            address: req.address,
            complement: req.complement,
        }
    }
}

impl From<ValidationReport> for ValidationResultDto {
    fn from(report: ValidationReport) -> Self {
        let valid = report.is_valid();
        let errors = report
            .into_errors()
            .into_iter()
            .map(|(field, msg)| (field.key().to_string(), msg))
            .collect();
        Self { valid, errors }
    }
}

impl From<PostalAddress> for PostalAddressDto {
    fn from(a: PostalAddress) -> Self {
        let address_line = a.address_line();
        Self {
            postal_code: a.postal_code,
            street: a.street,
            complement: a.complement,
            district: a.district,
            city: a.city,
            state: a.state,
            ibge: a.ibge,
            ddd: a.ddd,
            address_line,
        }
    }
}
