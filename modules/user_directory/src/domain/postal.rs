//! Postal-code (CEP) address fragments and the address-line suggestion rule.

use thiserror::Error;

use crate::domain::validation::{digits_only, POSTAL_CODE_DIGITS};

/// Address fragment returned by a postal lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub postal_code: String,
    pub street: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub ibge: String,
    pub ddd: String,
}

impl PostalAddress {
    /// Suggested single-line address: `street - district - city/state`, skipping empty parts.
    pub fn address_line(&self) -> String {
        let city = self.city.trim();
        let state = self.state.trim();
        let locality = match (city.is_empty(), state.is_empty()) {
            (false, false) => format!("{city}/{state}"),
            (false, true) => city.to_string(),
            (true, false) => state.to_string(),
            (true, true) => String::new(),
        };

        [self.street.trim(), self.district.trim(), locality.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

/// Why a lookup produced no address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalLookupError {
    #[error("postal code must have {POSTAL_CODE_DIGITS} digits")]
    InvalidPostalCode,

    #[error("postal code not found")]
    NotFound,

    #[error("postal lookup unavailable: {0}")]
    Unavailable(String),
}

/// Returns the 8-digit form of `raw`, or `None` when it has any other digit count.
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    (digits.len() == POSTAL_CODE_DIGITS).then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(street: &str, district: &str, city: &str, state: &str) -> PostalAddress {
        PostalAddress {
            street: street.into(),
            district: district.into(),
            city: city.into(),
            state: state.into(),
            ..Default::default()
        }
    }

    #[test]
    fn full_address_line() {
        assert_eq!(
            addr("Avenida Paulista", "Bela Vista", "São Paulo", "SP").address_line(),
            "Avenida Paulista - Bela Vista - São Paulo/SP"
        );
    }

    #[test]
    fn empty_parts_are_omitted() {
        assert_eq!(addr("", "Centro", "Recife", "PE").address_line(), "Centro - Recife/PE");
        assert_eq!(addr("Rua A", "", "", "MG").address_line(), "Rua A - MG");
        assert_eq!(addr("Rua A", " ", "Natal", "").address_line(), "Rua A - Natal");
        assert_eq!(addr("", "", "", "").address_line(), "");
    }

    #[test]
    fn normalization_requires_eight_digits() {
        assert_eq!(normalize_postal_code("01310-100").as_deref(), Some("01310100"));
        assert_eq!(normalize_postal_code("0131010"), None);
        assert_eq!(normalize_postal_code("013101000"), None);
        assert_eq!(normalize_postal_code(""), None);
    }
}
