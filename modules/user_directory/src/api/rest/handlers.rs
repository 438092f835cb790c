use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{
    extract::{Path, Query},
    response::{IntoResponse, Json, Response},
    Extension,
};
use tracing::info;

use crate::api::rest::dto::{
    ConsultantDto, ConsultantSummaryDto, CreateUserReq, DeletedDto, ErrorDto, LinkClientReq,
    LinkDto, PostalAddressDto, UpdateUserReq, UserDto, UsersQuery, ValidateFormReq,
    ValidationResultDto,
};
use crate::api::rest::error::{map_domain_error, map_postal_error, ApiError};
use crate::contract::model::{ConsultantFilter, UserId, UserType};
use crate::domain::filter::parse_filter_date;
use crate::domain::service::Service;

type ApiResult<T> = Result<T, ApiError>;

fn optional_date(field: &str, raw: Option<&str>) -> ApiResult<Option<chrono::NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_filter_date(field, s)
            .map(Some)
            .map_err(|e| map_domain_error(&e)),
        None => Ok(None),
    }
}

/// List all consultants with their linked clients
#[utoipa::path(
    get,
    path = "/api/consultants",
    responses(
        (status = 200, description = "Consultants, newest first", body = [ConsultantDto]),
        (status = 500, description = "Store failure", body = ErrorDto)
    ),
    tag = "consultants",
    operation_id = "listConsultants"
)]
pub async fn list_consultants(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<ConsultantDto>>> {
    let consultants = svc
        .list_consultants()
        .await
        .map_err(|e| map_domain_error(&e))?;
    Ok(Json(consultants.into_iter().map(ConsultantDto::from).collect()))
}

/// List users, or search consultants when any filter key is present
#[utoipa::path(
    get,
    path = "/api/users",
    params(UsersQuery),
    responses(
        (status = 200, description = "All users (no filter) or matching consultant summaries", body = [UserDto]),
        (status = 400, description = "Unparsable date", body = ErrorDto),
        (status = 500, description = "Store failure", body = ErrorDto)
    ),
    tag = "users",
    operation_id = "listUsers"
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<UsersQuery>,
) -> ApiResult<Response> {
    if !query.is_search() {
        let users = svc.list_all_users().await.map_err(|e| map_domain_error(&e))?;
        let body: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
        return Ok(Json(body).into_response());
    }

    info!("Searching consultants with query: {:?}", query);
    let filter = ConsultantFilter {
        start_date: optional_date("startDate", query.start_date.as_deref())?,
        end_date: optional_date("endDate", query.end_date.as_deref())?,
        name: query.name,
        email: query.email,
    };
    let consultants = svc
        .list_filtered_consultants(filter)
        .await
        .map_err(|e| map_domain_error(&e))?;
    let body: Vec<ConsultantSummaryDto> = consultants
        .into_iter()
        .map(ConsultantSummaryDto::from)
        .collect();
    Ok(Json(body).into_response())
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not found", body = ErrorDto)
    ),
    tag = "users",
    operation_id = "getUser"
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    id: Result<Path<UserId>, PathRejection>,
) -> ApiResult<Json<UserDto>> {
    let Path(id) = id?;
    info!("Getting user with id: {}", id);
    let user = svc.get_user(id).await.map_err(|e| map_domain_error(&e))?;
    Ok(Json(UserDto::from(user)))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserReq,
    responses(
        (status = 200, description = "Created user", body = UserDto),
        (status = 400, description = "`missing` when name or email is absent", body = ErrorDto),
        (status = 500, description = "Store failure, e.g. duplicate email", body = ErrorDto)
    ),
    tag = "users",
    operation_id = "createUser"
)]
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<CreateUserReq>, JsonRejection>,
) -> ApiResult<Json<UserDto>> {
    let Json(req_body) = body?;
    info!(email = req_body.email.as_deref().unwrap_or_default(), "Creating user");

    let user_type = match req_body.user_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(UserType::parse(raw).ok_or_else(|| {
            ApiError::validation(format!("userType: expected CONSULTANT or CLIENT, got '{raw}'"))
        })?),
    };

    let user = svc
        .create_user(req_body.into_new_user(user_type))
        .await
        .map_err(|e| map_domain_error(&e))?;
    Ok(Json(UserDto::from(user)))
}

/// Update name and/or email of a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Blank field", body = ErrorDto),
        (status = 404, description = "Not found", body = ErrorDto),
        (status = 500, description = "Store failure", body = ErrorDto)
    ),
    tag = "users",
    operation_id = "updateUser"
)]
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    id: Result<Path<UserId>, PathRejection>,
    body: Result<Json<UpdateUserReq>, JsonRejection>,
) -> ApiResult<Json<UserDto>> {
    let Path(id) = id?;
    let Json(req_body) = body?;
    info!(
        user_id = id,
        name_set = req_body.name.is_some(),
        email_set = req_body.email.is_some(),
        "Updating user"
    );

    let user = svc
        .update_user(id, req_body.into())
        .await
        .map_err(|e| map_domain_error(&e))?;
    Ok(Json(UserDto::from(user)))
}

/// Delete a user by ID
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedDto),
        (status = 404, description = "Not found", body = ErrorDto),
        (status = 500, description = "Store failure", body = ErrorDto)
    ),
    tag = "users",
    operation_id = "deleteUser"
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    id: Result<Path<UserId>, PathRejection>,
) -> ApiResult<Json<DeletedDto>> {
    let Path(id) = id?;
    info!("Deleting user: {}", id);
    svc.delete_user(id).await.map_err(|e| map_domain_error(&e))?;
    Ok(Json(DeletedDto { ok: true }))
}

/// Run the profile form rules without persisting anything
#[utoipa::path(
    post,
    path = "/api/users/validate",
    request_body = ValidateFormReq,
    responses(
        (status = 200, description = "Validation outcome", body = ValidationResultDto),
        (status = 400, description = "Malformed body", body = ErrorDto)
    ),
    tag = "users",
    operation_id = "validateUserForm"
)]
pub async fn validate_user_form(
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<ValidateFormReq>, JsonRejection>,
) -> ApiResult<Json<ValidationResultDto>> {
    let Json(req_body) = body?;
    let report = svc.validate_form(&req_body.into());
    Ok(Json(report.into()))
}

/// Link a client to a consultant
#[utoipa::path(
    post,
    path = "/api/consultants/{id}/clients",
    params(("id" = i32, Path, description = "Consultant id")),
    request_body = LinkClientReq,
    responses(
        (status = 200, description = "Created link", body = LinkDto),
        (status = 400, description = "Wrong user types or self link", body = ErrorDto),
        (status = 404, description = "Consultant or client not found", body = ErrorDto),
        (status = 500, description = "Store failure, e.g. duplicate link", body = ErrorDto)
    ),
    tag = "consultants",
    operation_id = "linkClient"
)]
pub async fn link_client(
    Extension(svc): Extension<Arc<Service>>,
    id: Result<Path<UserId>, PathRejection>,
    body: Result<Json<LinkClientReq>, JsonRejection>,
) -> ApiResult<Json<LinkDto>> {
    let Path(consultant_id) = id?;
    let Json(req_body) = body?;
    info!("Linking client {} to consultant {}", req_body.client_id, consultant_id);

    let link = svc
        .link_client(consultant_id, req_body.client_id)
        .await
        .map_err(|e| map_domain_error(&e))?;
    Ok(Json(link.into()))
}

/// Look up an address by postal code (CEP)
#[utoipa::path(
    get,
    path = "/api/postal-codes/{code}",
    params(("code" = String, Path, description = "Postal code; non-digits are ignored")),
    responses(
        (status = 200, description = "Address found", body = PostalAddressDto),
        (status = 400, description = "Not 8 digits", body = ErrorDto),
        (status = 404, description = "Unknown postal code", body = ErrorDto),
        (status = 502, description = "Postal service unavailable", body = ErrorDto)
    ),
    tag = "postal",
    operation_id = "lookupPostalCode"
)]
pub async fn lookup_postal_code(
    Extension(svc): Extension<Arc<Service>>,
    Path(code): Path<String>,
) -> ApiResult<Json<PostalAddressDto>> {
    let address = svc
        .lookup_postal_code(&code)
        .await
        .map_err(|e| map_postal_error(&e))?;
    Ok(Json(address.into()))
}
