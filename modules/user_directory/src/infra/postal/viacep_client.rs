use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::ports::PostalLookup;
use crate::domain::postal::{normalize_postal_code, PostalAddress, PostalLookupError};

/// Wire shape of a ViaCEP answer. A miss comes back as `{"erro": true}` (some
/// deployments send the string `"true"`).
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    ibge: Option<String>,
    #[serde(default)]
    ddd: Option<String>,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_miss(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_address(self, digits: String) -> PostalAddress {
        PostalAddress {
            postal_code: self.cep.unwrap_or(digits),
            street: self.logradouro.unwrap_or_default(),
            complement: self.complemento.unwrap_or_default(),
            district: self.bairro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            state: self.uf.unwrap_or_default(),
            ibge: self.ibge.unwrap_or_default(),
            ddd: self.ddd.unwrap_or_default(),
        }
    }
}

/// HTTP adapter implementing the postal lookup port against a ViaCEP-compatible service.
pub struct HttpPostalClient {
    client: reqwest::Client,
    base: Url,
}

impl HttpPostalClient {
    pub fn new(base: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build postal HTTP client")?;
        Ok(Self { client, base })
    }

    /// `{base}/{digits}/json/`
    fn lookup_url(&self, digits: &str) -> Result<Url, PostalLookupError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| PostalLookupError::Unavailable("invalid postal base URL".into()))?
            .pop_if_empty()
            .extend([digits, "json", ""]);
        Ok(url)
    }
}

#[async_trait]
impl PostalLookup for HttpPostalClient {
    #[instrument(
        name = "user_directory.http.postal.lookup",
        skip_all,
        fields(postal_base = %self.base)
    )]
    async fn lookup(&self, postal_code: &str) -> Result<PostalAddress, PostalLookupError> {
        let digits = normalize_postal_code(postal_code).ok_or(PostalLookupError::InvalidPostalCode)?;
        let url = self.lookup_url(&digits)?;
        debug!(%url, "Looking up postal code");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET /{digits}/json/"))
            .map_err(|e| {
                warn!(error = %format!("{e:#}"), "Postal service request failed");
                PostalLookupError::Unavailable(format!("{e:#}"))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PostalLookupError::NotFound);
        }
        if !status.is_success() {
            return Err(PostalLookupError::Unavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PostalLookupError::Unavailable(e.to_string()))?;
        if body.trim().is_empty() {
            return Err(PostalLookupError::NotFound);
        }

        let decoded: ViaCepResponse = serde_json::from_str(&body)
            .map_err(|e| PostalLookupError::Unavailable(format!("undecodable response: {e}")))?;
        if decoded.is_miss() {
            return Err(PostalLookupError::NotFound);
        }
        Ok(decoded.into_address(digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpPostalClient {
        HttpPostalClient::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn url_has_trailing_json_segment() {
        let c = client("https://viacep.com.br/ws");
        assert_eq!(
            c.lookup_url("01310100").unwrap().as_str(),
            "https://viacep.com.br/ws/01310100/json/"
        );

        let c = client("http://localhost:9000/ws/");
        assert_eq!(
            c.lookup_url("01310100").unwrap().as_str(),
            "http://localhost:9000/ws/01310100/json/"
        );
    }

    #[test]
    fn miss_marker_accepts_bool_and_string() {
        let r: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(r.is_miss());
        let r: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(r.is_miss());
        let r: ViaCepResponse = serde_json::from_str(r#"{"cep": "01310-100"}"#).unwrap();
        assert!(!r.is_miss());
    }

    #[tokio::test]
    async fn invalid_code_makes_no_request() {
        // unroutable base: a request would fail with Unavailable
        let c = client("http://127.0.0.1:9");
        assert_eq!(c.lookup("123").await, Err(PostalLookupError::InvalidPostalCode));
    }
}
