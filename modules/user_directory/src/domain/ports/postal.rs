use async_trait::async_trait;

use crate::domain::postal::{PostalAddress, PostalLookupError};

/// Outbound port: address lookup by postal code.
#[async_trait]
pub trait PostalLookup: Send + Sync {
    /// One lookup; the error says why no address came back.
    async fn lookup(&self, postal_code: &str) -> Result<PostalAddress, PostalLookupError>;

    /// Absence-only view: invalid input, not found and transport failures all become `None`.
    async fn lookup_optional(&self, postal_code: &str) -> Option<PostalAddress> {
        match self.lookup(postal_code).await {
            Ok(address) => Some(address),
            Err(e) => {
                tracing::debug!(error = %e, "postal lookup yielded no address");
                None
            }
        }
    }
}
