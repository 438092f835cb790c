use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{ConsultantClientLink, LinkedClient, NewUser, User, UserId, UserType};
use crate::domain::filter::UserPredicate;

/// A user ready to persist: type resolved and timestamps stamped by the service.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub user: NewUser,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>>;
    /// Every user, highest id first.
    async fn list_all(&self) -> anyhow::Result<Vec<User>>;
    /// Users matching the predicate, newest `created_at` first.
    async fn find_users(&self, predicate: &UserPredicate) -> anyhow::Result<Vec<User>>;
    /// Linked clients of the given consultants as `(consultant_id, client)` pairs.
    async fn clients_of(
        &self,
        consultant_ids: &[UserId],
    ) -> anyhow::Result<Vec<(UserId, LinkedClient)>>;
    /// Insert a new user; the store assigns the id.
    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User>;
    /// Update an existing user (by primary key in `u.id`).
    async fn update(&self, u: User) -> anyhow::Result<()>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: UserId) -> anyhow::Result<bool>;
    /// Persist a consultant/client association.
    async fn insert_link(
        &self,
        consultant_id: UserId,
        client_id: UserId,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<ConsultantClientLink>;
}
