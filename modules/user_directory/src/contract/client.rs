use async_trait::async_trait;

use crate::contract::{
    error::UserDirectoryError,
    model::{
        ConsultantClientLink, ConsultantFilter, ConsultantSummary, ConsultantWithClients, NewUser,
        User, UserId, UserPatch,
    },
};

/// Public API of the user directory for other in-process consumers.
#[async_trait]
pub trait UserDirectoryApi: Send + Sync {
    /// All consultants with their linked clients, newest first.
    async fn list_consultants(&self) -> Result<Vec<ConsultantWithClients>, UserDirectoryError>;

    /// Consultants matching `filter`, with reshaped client summaries.
    async fn list_filtered_consultants(
        &self,
        filter: ConsultantFilter,
    ) -> Result<Vec<ConsultantSummary>, UserDirectoryError>;

    /// Every user regardless of type, highest id first.
    async fn list_all_users(&self) -> Result<Vec<User>, UserDirectoryError>;

    async fn get_user(&self, id: UserId) -> Result<User, UserDirectoryError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserDirectoryError>;

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, UserDirectoryError>;

    async fn delete_user(&self, id: UserId) -> Result<(), UserDirectoryError>;

    async fn link_client(
        &self,
        consultant_id: UserId,
        client_id: UserId,
    ) -> Result<ConsultantClientLink, UserDirectoryError>;
}
