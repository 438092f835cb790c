pub mod viacep_client;

pub use viacep_client::HttpPostalClient;
