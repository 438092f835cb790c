pub mod error;
pub mod filter;
pub mod form;
pub mod ports;
pub mod postal;
pub mod repo;
pub mod service;
pub mod validation;
