pub mod client;
pub mod error;
pub mod model;

pub use client::UserDirectoryApi;
pub use error::UserDirectoryError;
pub use model::*;
