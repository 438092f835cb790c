use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::contract::model::{
    ClientSummary, ConsultantClientLink, ConsultantFilter, ConsultantSummary,
    ConsultantWithClients, LinkedClient, NewUser, User, UserId, UserPatch, UserType,
};
use crate::domain::error::DomainError;
use crate::domain::filter::{build_predicate, UserPredicate};
use crate::domain::ports::PostalLookup;
use crate::domain::postal::{PostalAddress, PostalLookupError};
use crate::domain::repo::{NewUserRecord, UsersRepository};
use crate::domain::validation::{validate_form, UserForm, ValidationReport};

/// Domain service with the directory's business rules.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    postal: Arc<dyn PostalLookup>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Groups `(consultant_id, client)` pairs by consultant, keeping their order.
fn group_clients(pairs: Vec<(UserId, LinkedClient)>) -> HashMap<UserId, Vec<LinkedClient>> {
    let mut grouped: HashMap<UserId, Vec<LinkedClient>> = HashMap::new();
    for (consultant_id, client) in pairs {
        grouped.entry(consultant_id).or_default().push(client);
    }
    grouped
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, postal: Arc<dyn PostalLookup>) -> Self {
        Self { repo, postal }
    }

    async fn consultants_with_clients(
        &self,
        predicate: &UserPredicate,
    ) -> Result<Vec<ConsultantWithClients>, DomainError> {
        let consultants = self
            .repo
            .find_users(predicate)
            .await
            .map_err(|e| DomainError::database(&e))?;
        if consultants.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<UserId> = consultants.iter().map(|c| c.id).collect();
        let mut grouped = group_clients(
            self.repo
                .clients_of(&ids)
                .await
                .map_err(|e| DomainError::database(&e))?,
        );

        Ok(consultants
            .into_iter()
            .map(|consultant| {
                let clients = grouped.remove(&consultant.id).unwrap_or_default();
                ConsultantWithClients { consultant, clients }
            })
            .collect())
    }

    #[instrument(name = "user_directory.service.list_consultants", skip(self))]
    pub async fn list_consultants(&self) -> Result<Vec<ConsultantWithClients>, DomainError> {
        debug!("Listing consultants");
        let result = self
            .consultants_with_clients(&UserPredicate::all_consultants())
            .await?;
        debug!("Listed {} consultants", result.len());
        Ok(result)
    }

    #[instrument(name = "user_directory.service.list_filtered_consultants", skip(self))]
    pub async fn list_filtered_consultants(
        &self,
        filter: ConsultantFilter,
    ) -> Result<Vec<ConsultantSummary>, DomainError> {
        let predicate = build_predicate(&filter);
        debug!(?predicate, "Searching consultants");

        let result = self
            .consultants_with_clients(&predicate)
            .await?
            .into_iter()
            .map(|entry| ConsultantSummary {
                id: entry.consultant.id,
                name: entry.consultant.name,
                email: entry.consultant.email,
                user_type: entry.consultant.user_type,
                clients: entry
                    .clients
                    .into_iter()
                    .map(|linked| ClientSummary {
                        id: linked.client.id,
                        name: linked.client.name,
                        email: linked.client.email,
                        phone: linked.client.phone,
                        link_created_at: linked.linked_at,
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        debug!("Found {} consultants", result.len());
        Ok(result)
    }

    #[instrument(name = "user_directory.service.list_all_users", skip(self))]
    pub async fn list_all_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(&e))
    }

    #[instrument(name = "user_directory.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(&e))?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(
        name = "user_directory.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        if is_blank(&new_user.name) || is_blank(&new_user.email) {
            return Err(DomainError::missing_required_fields());
        }

        let record = NewUserRecord {
            user_type: new_user.user_type.unwrap_or(UserType::Client),
            user: new_user,
            created_at: Utc::now(),
        };
        let user = self
            .repo
            .insert(record)
            .await
            .map_err(|e| DomainError::database(&e))?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "user_directory.service.update_user", skip(self, patch), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        if patch.name.as_deref().is_some_and(is_blank) {
            return Err(DomainError::validation("name", "cannot be blank"));
        }
        if patch.email.as_deref().is_some_and(is_blank) {
            return Err(DomainError::validation("email", "cannot be blank"));
        }

        let mut current = self.get_user(id).await?;
        if let Some(name) = patch.name {
            current.name = name;
        }
        if let Some(email) = patch.email {
            current.email = email;
        }
        current.updated_at = Utc::now();

        self.repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::database(&e))?;

        info!("Successfully updated user");
        Ok(current)
    }

    #[instrument(name = "user_directory.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        info!("Deleting user");

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(&e))?;
        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    #[instrument(
        name = "user_directory.service.link_client",
        skip(self),
        fields(consultant_id = %consultant_id, client_id = %client_id)
    )]
    pub async fn link_client(
        &self,
        consultant_id: UserId,
        client_id: UserId,
    ) -> Result<ConsultantClientLink, DomainError> {
        if consultant_id == client_id {
            return Err(DomainError::validation("clientId", "cannot link a user to itself"));
        }

        let consultant = self.get_user(consultant_id).await?;
        if consultant.user_type != UserType::Consultant {
            return Err(DomainError::validation("consultantId", "user is not a CONSULTANT"));
        }
        let client = self.get_user(client_id).await?;
        if client.user_type != UserType::Client {
            return Err(DomainError::validation("clientId", "user is not a CLIENT"));
        }

        let link = self
            .repo
            .insert_link(consultant_id, client_id, Utc::now())
            .await
            .map_err(|e| DomainError::database(&e))?;

        info!(link_id = link.id, "Linked client to consultant");
        Ok(link)
    }

    #[instrument(name = "user_directory.service.lookup_postal_code", skip(self))]
    pub async fn lookup_postal_code(&self, code: &str) -> Result<PostalAddress, PostalLookupError> {
        self.postal.lookup(code).await
    }

    pub fn validate_form(&self, form: &UserForm) -> ValidationReport {
        validate_form(form)
    }
}
