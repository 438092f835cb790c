pub mod consultant_client;
pub mod user;
