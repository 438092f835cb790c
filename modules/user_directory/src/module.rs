use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use url::Url;
use utoipa::OpenApi;

use crate::api::rest::{openapi::ApiDoc, routes};
use crate::config::UserDirectoryConfig;
use crate::contract::client::UserDirectoryApi;
use crate::domain::ports::PostalLookup;
use crate::domain::repo::UsersRepository;
use crate::domain::service::Service;
use crate::gateways::local::UserDirectoryLocalClient;
use crate::infra::postal::HttpPostalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

/// Wired user directory: the domain service plus its REST and in-process faces.
#[derive(Clone)]
pub struct UserDirectory {
    service: Arc<Service>,
}

impl UserDirectory {
    /// Apply the schema migrations to `db`.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running user_directory database migrations");
        Migrator::up(db, None)
            .await
            .context("user_directory migrations failed")?;
        info!("User directory migrations completed successfully");
        Ok(())
    }

    /// Wire the SeaORM repository and the HTTP postal client from configuration.
    pub fn init(cfg: &UserDirectoryConfig, db: DatabaseConnection) -> anyhow::Result<Self> {
        info!("Initializing user_directory module");
        debug!(
            "Loaded user_directory config: postal_base_url={}, postal_timeout_ms={}",
            cfg.postal_base_url, cfg.postal_timeout_ms
        );

        let base = Url::parse(&cfg.postal_base_url)
            .with_context(|| format!("invalid postal_base_url '{}'", cfg.postal_base_url))?;
        let postal = HttpPostalClient::new(base, Duration::from_millis(cfg.postal_timeout_ms))?;
        let repo = SeaOrmUsersRepository::new(db);

        Ok(Self::from_parts(Arc::new(repo), Arc::new(postal)))
    }

    pub fn from_parts(repo: Arc<dyn UsersRepository>, postal: Arc<dyn PostalLookup>) -> Self {
        Self {
            service: Arc::new(Service::new(repo, postal)),
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn UserDirectoryApi> {
        Arc::new(UserDirectoryLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering user_directory REST routes");
        routes::register_routes(router, self.service.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        ApiDoc::openapi()
    }
}
