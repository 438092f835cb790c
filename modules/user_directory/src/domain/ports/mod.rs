pub mod postal;

pub use postal::PostalLookup;
