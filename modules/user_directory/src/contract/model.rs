use chrono::{DateTime, NaiveDate, Utc};

/// Store-assigned user identifier.
pub type UserId = i32;

/// Role of a user in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserType {
    Consultant,
    Client,
}

impl UserType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consultant => "CONSULTANT",
            Self::Client => "CLIENT",
        }
    }

    /// Parses the stored/wire form; case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CONSULTANT" => Some(Self::Consultant),
            "CLIENT" => Some(Self::Client),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure user model for in-process callers (no serde).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
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

/// Data for creating a new user.
///
/// Only `name` and `email` are mandatory; `user_type` defaults to [`UserType::Client`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub user_type: Option<UserType>,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub cpf: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub complement: Option<String>,
}

/// Partial update; only these two fields are editable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Association between a consultant and one of its clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultantClientLink {
    pub id: i32,
    pub consultant_id: UserId,
    pub client_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A client as seen from its consultant, with the moment the link was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedClient {
    pub client: User,
    pub linked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultantWithClients {
    pub consultant: User,
    pub clients: Vec<LinkedClient>,
}

/// Reshaped client row returned by the filtered consultant search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub link_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultantSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    pub clients: Vec<ClientSummary>,
}

/// Search criteria for consultants. Every field is optional; blank text counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsultantFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
