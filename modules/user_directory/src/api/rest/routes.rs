use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount the directory endpoints on `router`, sharing `service` through an extension.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let api = Router::new()
        // Consultants
        .route("/api/consultants", get(handlers::list_consultants))
        .route("/api/consultants/{id}/clients", post(handlers::link_client))
        // Users
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/validate", post(handlers::validate_user_form))
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Postal lookup
        .route("/api/postal-codes/{code}", get(handlers::lookup_postal_code))
        .layer(Extension(service));

    router.merge(api)
}
