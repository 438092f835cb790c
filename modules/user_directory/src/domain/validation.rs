//! Field rules for the full user profile form.
//!
//! Every field is checked on its own; there are no cross-field rules. The same
//! rule set backs whole-form submission ([`validate_form`]) and incremental
//! per-field checks ([`validate_field`]).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder shown by the user type selector before a choice is made.
pub const USER_TYPE_PLACEHOLDER: &str = "select user type";
/// Placeholder shown by the state selector before a choice is made.
pub const STATE_PLACEHOLDER: &str = "select state";

/// Required digit count of a postal code (CEP).
pub const POSTAL_CODE_DIGITS: usize = 8;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    UserType,
    Name,
    Phone,
    Email,
    Age,
    Cpf,
    ZipCode,
    State,
    Address,
    Complement,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        Self::UserType,
        Self::Name,
        Self::Phone,
        Self::Email,
        Self::Age,
        Self::Cpf,
        Self::ZipCode,
        Self::State,
        Self::Address,
        Self::Complement,
    ];

    /// Wire name of the field (camelCase).
    pub const fn key(self) -> &'static str {
        match self {
            Self::UserType => "userType",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Age => "age",
            Self::Cpf => "cpf",
            Self::ZipCode => "zipCode",
            Self::State => "state",
            Self::Address => "address",
            Self::Complement => "complement",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::UserType => "User type",
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::Age => "Age",
            Self::Cpf => "CPF",
            Self::ZipCode => "Postal code",
            Self::State => "State",
            Self::Address => "Address",
            Self::Complement => "Complement",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw form values exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub user_type: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub age: String,
    pub cpf: String,
    pub zip_code: String,
    pub state: String,
    pub address: String,
    pub complement: String,
}

impl UserForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::UserType => &self.user_type,
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Email => &self.email,
            FormField::Age => &self.age,
            FormField::Cpf => &self.cpf,
            FormField::ZipCode => &self.zip_code,
            FormField::State => &self.state,
            FormField::Address => &self.address,
            FormField::Complement => &self.complement,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::UserType => &mut self.user_type,
            FormField::Name => &mut self.name,
            FormField::Phone => &mut self.phone,
            FormField::Email => &mut self.email,
            FormField::Age => &mut self.age,
            FormField::Cpf => &mut self.cpf,
            FormField::ZipCode => &mut self.zip_code,
            FormField::State => &mut self.state,
            FormField::Address => &mut self.address,
            FormField::Complement => &mut self.complement,
        };
        *slot = value.into();
    }
}

pub type FieldErrors = BTreeMap<FormField, String>;

/// Outcome of a whole-form validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: FieldErrors,
}

impl ValidationReport {
    /// Valid iff no field produced an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// Strips every non-digit character.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw)
}

fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

fn is_placeholder(raw: &str, placeholder: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(placeholder)
}

fn required(field: FormField) -> String {
    format!("{} is required", field.label())
}

/// Validates a single field; returns its error message, if any.
pub fn validate_field(field: FormField, value: &str) -> Option<String> {
    match field {
        FormField::UserType if is_blank(value) || is_placeholder(value, USER_TYPE_PLACEHOLDER) => {
            Some(required(field))
        }
        FormField::State if is_blank(value) || is_placeholder(value, STATE_PLACEHOLDER) => {
            Some(required(field))
        }
        FormField::Complement => None,
        _ if is_blank(value) => Some(required(field)),
        FormField::Email if !is_valid_email(value) => Some("Invalid email".to_string()),
        FormField::ZipCode if digits_only(value).len() != POSTAL_CODE_DIGITS => {
            Some(format!("Postal code must have {POSTAL_CODE_DIGITS} digits"))
        }
        _ => None,
    }
}

/// Validates every field of the form.
pub fn validate_form(form: &UserForm) -> ValidationReport {
    let errors = FormField::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, form.get(field)).map(|msg| (field, msg)))
        .collect();
    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> UserForm {
        UserForm {
            user_type: "CONSULTANT".into(),
            name: "Ana Souza".into(),
            phone: "(11) 99999-0000".into(),
            email: "ana@example.com".into(),
            age: "31".into(),
            cpf: "123.456.789-09".into(),
            zip_code: "01310-100".into(),
            state: "SP".into(),
            address: "Avenida Paulista".into(),
            complement: String::new(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        let report = validate_form(&valid_form());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let report = validate_form(&UserForm::default());
        assert!(!report.is_valid());
        let fields: Vec<_> = report.errors().keys().copied().collect();
        assert_eq!(
            fields,
            FormField::ALL
                .into_iter()
                .filter(|f| *f != FormField::Complement)
                .collect::<Vec<_>>()
        );
        assert_eq!(report.error(FormField::Name), Some("Name is required"));
        assert_eq!(report.error(FormField::Complement), None);
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        for field in [FormField::Name, FormField::Phone, FormField::Address, FormField::Age, FormField::Cpf] {
            assert!(validate_field(field, "   \t").is_some(), "{field}");
        }
    }

    #[test]
    fn placeholders_count_as_empty() {
        assert_eq!(
            validate_field(FormField::UserType, "select user type").as_deref(),
            Some("User type is required")
        );
        assert!(validate_field(FormField::UserType, "  Select User Type ").is_some());
        assert_eq!(
            validate_field(FormField::State, "select state").as_deref(),
            Some("State is required")
        );
        assert!(validate_field(FormField::State, "RJ").is_none());
    }

    #[test]
    fn complement_is_never_an_error() {
        assert!(validate_field(FormField::Complement, "").is_none());
        assert!(validate_field(FormField::Complement, "apt 4").is_none());
    }

    #[test]
    fn blank_email_is_required_not_invalid() {
        assert_eq!(
            validate_field(FormField::Email, " ").as_deref(),
            Some("Email is required")
        );
    }

    #[test]
    fn emails_without_at_or_dot_after_at_are_rejected() {
        let samples = [
            "plainaddress",
            "user.example.com",
            "user@example",
            "user@localhost",
            "a.b@c",
            "@",
            "x@.",
            "first.last@",
        ];
        for s in samples {
            assert_eq!(
                validate_field(FormField::Email, s).as_deref(),
                Some("Invalid email"),
                "{s}"
            );
        }
        // generated: every split of a dotless domain
        for name in ["a", "john", "j.doe"] {
            for domain in ["x", "example", "localhost"] {
                let e = format!("{name}@{domain}");
                assert!(validate_field(FormField::Email, &e).is_some(), "{e}");
                let no_at = format!("{name}{domain}.com");
                assert!(validate_field(FormField::Email, &no_at).is_some(), "{no_at}");
            }
        }
    }

    #[test]
    fn well_formed_emails_pass() {
        for s in ["a@b.c", "john.doe@example.com", "x+tag@sub.domain.org"] {
            assert!(validate_field(FormField::Email, s).is_none(), "{s}");
        }
        assert!(validate_field(FormField::Email, "a b@c.d").is_some());
    }

    #[test]
    fn postal_code_must_have_exactly_eight_digits() {
        for n in 0..=12usize {
            let digits: String = (0..n).map(|i| char::from(b'0' + (i % 10) as u8)).collect();
            // decorate with separators that are stripped before counting
            let decorated = format!("#{digits}-");
            let err = validate_field(FormField::ZipCode, &decorated);
            if n == POSTAL_CODE_DIGITS {
                assert!(err.is_none(), "{decorated}");
            } else {
                assert!(err.is_some(), "{decorated}");
            }
        }
        assert!(validate_field(FormField::ZipCode, "01310-100").is_none());
        assert_eq!(
            validate_field(FormField::ZipCode, "0131-010").as_deref(),
            Some("Postal code must have 8 digits")
        );
    }

    #[test]
    fn field_keys_roundtrip() {
        for field in FormField::ALL {
            assert_eq!(FormField::from_key(field.key()), Some(field));
        }
        assert_eq!(FormField::from_key("unknown"), None);
    }

    #[test]
    fn digits_only_strips_everything_else() {
        assert_eq!(digits_only("01.310-100 "), "01310100");
        assert_eq!(digits_only("abc"), "");
    }
}
