//! Consultant search criteria turned into a store-independent predicate.
//!
//! The predicate is evaluated in memory by [`UserPredicate::matches`] and translated
//! into a query condition by the storage adapter; both must agree. Text matching on
//! both sides goes through [`fold_case`], the store keeping pre-folded columns.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::contract::model::{ConsultantFilter, User, UserType};
use crate::domain::error::DomainError;

/// Conjunction of optional constraints over a [`User`]. `None` imposes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPredicate {
    pub user_type: Option<UserType>,
    /// Lower-cased needle for a case-insensitive substring match on `name`.
    pub name_contains: Option<String>,
    /// Lower-cased needle for a case-insensitive substring match on `email`.
    pub email_contains: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub created_to: Option<DateTime<Utc>>,
}

/// Case fold used for text search. Unicode-aware, so `JOÃO` and `joão` agree.
pub fn fold_case(raw: &str) -> String {
    raw.to_lowercase()
}

impl UserPredicate {
    pub fn all_consultants() -> Self {
        Self {
            user_type: Some(UserType::Consultant),
            ..Default::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        if self.user_type.is_some_and(|t| t != user.user_type) {
            return false;
        }
        if let Some(needle) = &self.name_contains {
            if !fold_case(&user.name).contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.email_contains {
            if !fold_case(&user.email).contains(needle.as_str()) {
                return false;
            }
        }
        if self.created_from.is_some_and(|from| user.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| user.created_at > to) {
            return false;
        }
        true
    }
}

fn non_blank(raw: Option<&String>) -> Option<String> {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(fold_case)
}

/// Interprets `date time` on the local clock; `earliest` picks the bound side when
/// the local time is ambiguous. Falls back to UTC when the local time does not exist.
fn local_to_utc(naive: NaiveDateTime, earliest: bool) -> DateTime<Utc> {
    let local = Local.from_local_datetime(&naive);
    let resolved = if earliest { local.earliest() } else { local.latest() };
    match resolved {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

/// Start of `date` (00:00:00.000 local time).
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN), true)
}

/// End of `date` (23:59:59.999 local time).
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    local_to_utc(date.and_time(time), false)
}

/// Builds the consultant predicate. Absent dates add no bound at all.
pub fn build_predicate(filter: &ConsultantFilter) -> UserPredicate {
    UserPredicate {
        user_type: Some(UserType::Consultant),
        name_contains: non_blank(filter.name.as_ref()),
        email_contains: non_blank(filter.email.as_ref()),
        created_from: filter.start_date.map(start_of_day),
        created_to: filter.end_date.map(end_of_day),
    }
}

/// Parses a query-string date: `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to
/// its local calendar date.
pub fn parse_filter_date(field: &str, raw: &str) -> Result<NaiveDate, DomainError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .map_err(|_| DomainError::invalid_date(field, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn user(name: &str, email: &str, user_type: UserType, created_at: DateTime<Utc>) -> User {
        User {
            id: 1,
            name: name.into(),
            email: email.into(),
            user_type,
            phone: None,
            age: None,
            cpf: None,
            zip_code: None,
            state: None,
            address: None,
            complement: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn empty_filter_is_all_consultants() {
        assert_eq!(
            build_predicate(&ConsultantFilter::default()),
            UserPredicate::all_consultants()
        );
    }

    #[test]
    fn blank_text_counts_as_absent() {
        let filter = ConsultantFilter {
            name: Some("   ".into()),
            email: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(build_predicate(&filter), UserPredicate::all_consultants());
    }

    #[test]
    fn start_date_bound_is_local_midnight() {
        let d = date("2025-10-21");
        let p = build_predicate(&ConsultantFilter {
            start_date: Some(d),
            ..Default::default()
        });
        let expected = Local
            .from_local_datetime(&d.and_hms_opt(0, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(p.created_from, Some(expected));
        assert_eq!(p.created_to, None);
    }

    #[test]
    fn end_date_bound_is_last_millisecond_of_day() {
        let d = date("2025-12-21");
        let p = build_predicate(&ConsultantFilter {
            end_date: Some(d),
            ..Default::default()
        });
        let to = p.created_to.unwrap().with_timezone(&Local);
        assert_eq!(to.date_naive(), d);
        assert_eq!(to.time(), NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
        assert_eq!(p.created_from, None);
    }

    #[test]
    fn text_matching_is_case_insensitive_substring() {
        let p = build_predicate(&ConsultantFilter {
            name: Some("JO".into()),
            email: Some("Example".into()),
            ..Default::default()
        });
        let now = Utc::now();
        assert!(p.matches(&user("John Doe", "john@example.com", UserType::Consultant, now)));
        assert!(!p.matches(&user("Mary", "john@example.com", UserType::Consultant, now)));
        assert!(!p.matches(&user("John", "john@test.com", UserType::Consultant, now)));
        assert!(!p.matches(&user("John", "john@example.com", UserType::Client, now)));
    }

    #[test]
    fn john_doe_is_inside_the_window() {
        let p = build_predicate(&ConsultantFilter {
            name: Some("jo".into()),
            email: None,
            start_date: Some(date("2025-10-21")),
            end_date: Some(date("2025-12-21")),
        });
        let created = start_of_day(date("2025-11-01"));
        assert!(p.matches(&user("John Doe", "john@doe.com", UserType::Consultant, created)));

        let before = start_of_day(date("2025-10-20"));
        assert!(!p.matches(&user("John Doe", "john@doe.com", UserType::Consultant, before)));
        let after = start_of_day(date("2025-12-22"));
        assert!(!p.matches(&user("John Doe", "john@doe.com", UserType::Consultant, after)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let d = date("2025-11-01");
        let p = build_predicate(&ConsultantFilter {
            start_date: Some(d),
            end_date: Some(d),
            ..Default::default()
        });
        assert!(p.matches(&user("A", "a@a.a", UserType::Consultant, start_of_day(d))));
        assert!(p.matches(&user("A", "a@a.a", UserType::Consultant, end_of_day(d))));
    }

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        assert_eq!(parse_filter_date("startDate", "2025-10-21").unwrap(), date("2025-10-21"));
        assert_eq!(parse_filter_date("startDate", " 2025-10-21 ").unwrap(), date("2025-10-21"));

        let stamp = "2025-10-21T12:00:00Z";
        let expected = DateTime::parse_from_rfc3339(stamp)
            .unwrap()
            .with_timezone(&Local)
            .date_naive();
        assert_eq!(parse_filter_date("endDate", stamp).unwrap(), expected);
    }

    #[test]
    fn garbage_date_is_rejected() {
        let err = parse_filter_date("startDate", "21/10/2025").unwrap_err();
        assert_eq!(err.to_string(), "startDate: invalid date '21/10/2025'");
        assert!(parse_filter_date("endDate", "").is_err());
    }
}
