use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{
    client::UserDirectoryApi,
    error::UserDirectoryError,
    model::{
        ConsultantClientLink, ConsultantFilter, ConsultantSummary, ConsultantWithClients, NewUser,
        User, UserId, UserPatch,
    },
};
use crate::domain::service::Service;

/// Local implementation of the UserDirectoryApi trait that delegates to the domain service
pub struct UserDirectoryLocalClient {
    service: Arc<Service>,
}

impl UserDirectoryLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UserDirectoryApi for UserDirectoryLocalClient {
    async fn list_consultants(&self) -> Result<Vec<ConsultantWithClients>, UserDirectoryError> {
        self.service.list_consultants().await.map_err(Into::into)
    }

    async fn list_filtered_consultants(
        &self,
        filter: ConsultantFilter,
    ) -> Result<Vec<ConsultantSummary>, UserDirectoryError> {
        self.service
            .list_filtered_consultants(filter)
            .await
            .map_err(Into::into)
    }

    async fn list_all_users(&self) -> Result<Vec<User>, UserDirectoryError> {
        self.service.list_all_users().await.map_err(Into::into)
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserDirectoryError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserDirectoryError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, UserDirectoryError> {
        self.service
            .update_user(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserDirectoryError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }

    async fn link_client(
        &self,
        consultant_id: UserId,
        client_id: UserId,
    ) -> Result<ConsultantClientLink, UserDirectoryError> {
        self.service
            .link_client(consultant_id, client_id)
            .await
            .map_err(Into::into)
    }
}
