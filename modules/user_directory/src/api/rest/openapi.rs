//! OpenAPI document for the directory endpoints.

use utoipa::OpenApi;

use crate::api::rest::dto::{
    ClientSummaryDto, ConsultantDto, ConsultantSummaryDto, CreateUserReq, DeletedDto, ErrorDto,
    LinkClientReq, LinkDto, LinkedClientDto, PostalAddressDto, UpdateUserReq, UserDto,
    UserTypeDto, ValidateFormReq, ValidationResultDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "consultdesk API",
        description = "Administration of consultants, clients and their links."
    ),
    paths(
        crate::api::rest::handlers::list_consultants,
        crate::api::rest::handlers::link_client,
        crate::api::rest::handlers::list_users,
        crate::api::rest::handlers::create_user,
        crate::api::rest::handlers::validate_user_form,
        crate::api::rest::handlers::get_user,
        crate::api::rest::handlers::update_user,
        crate::api::rest::handlers::delete_user,
        crate::api::rest::handlers::lookup_postal_code,
    ),
    components(schemas(
        UserDto,
        UserTypeDto,
        ConsultantDto,
        LinkedClientDto,
        ConsultantSummaryDto,
        ClientSummaryDto,
        CreateUserReq,
        UpdateUserReq,
        DeletedDto,
        LinkClientReq,
        LinkDto,
        ValidateFormReq,
        ValidationResultDto,
        PostalAddressDto,
        ErrorDto,
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "consultants", description = "Consultants and their clients"),
        (name = "postal", description = "Postal code lookup")
    )
)]
pub struct ApiDoc;
