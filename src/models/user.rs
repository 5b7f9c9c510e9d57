// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored in the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Storage-assigned ID (also used as document ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    /// Unique (case-insensitive) email address
    pub email: String,
}

impl User {
    /// Build a stored user from a draft and its assigned ID.
    pub fn from_draft(id: u64, draft: UserDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            birthdate: draft.birthdate,
            email: draft.email,
        }
    }

    /// Replace all mutable fields with those from `draft`.
    pub fn apply(&mut self, draft: UserDraft) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.birthdate = draft.birthdate;
        self.email = draft.email;
    }

    /// Case-insensitive email comparison.
    ///
    /// Emails fold ASCII case only, both here and in [`User::email_contains`].
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }

    /// Case-insensitive substring match on the email.
    pub fn email_contains(&self, fragment: &str) -> bool {
        self.email
            .to_ascii_lowercase()
            .contains(&fragment.to_ascii_lowercase())
    }
}

/// User fields supplied on create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserDraft {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub birthdate: NaiveDate,
    #[validate(email)]
    pub email: String,
}

/// Reduced user view for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserSummary {
    /// Summary without the email address.
    pub fn basic(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: None,
        }
    }

    /// Summary including the email address.
    pub fn with_email(user: &User) -> Self {
        Self {
            email: Some(user.email.clone()),
            ..Self::basic(user)
        }
    }
}

/// Optional search criteria; absent fields match every user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

impl UserSearch {
    /// Whether `user` satisfies every present criterion.
    pub fn matches(&self, user: &User) -> bool {
        let eq = |criterion: &Option<String>, value: &str| {
            criterion
                .as_deref()
                .is_none_or(|c| c.eq_ignore_ascii_case(value))
        };

        eq(&self.first_name, &user.first_name)
            && eq(&self.last_name, &user.last_name)
            && eq(&self.email, &user.email)
            && self.birthdate.is_none_or(|b| b == user.birthdate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            first_name: "Anna".to_string(),
            last_name: "Nowak".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            email: "Anna.Nowak@example.com".to_string(),
        }
    }

    #[test]
    fn test_email_matching_folds_ascii_only() {
        let mut u = user();
        assert!(u.has_email("ANNA.NOWAK@example.COM"));
        assert!(u.email_contains("NOWAK@EX"));

        // Non-ASCII letters are compared exactly by both checks
        u.email = "Łukasz@example.com".to_string();
        assert!(!u.has_email("łukasz@example.com"));
        assert!(!u.email_contains("łukasz"));
        assert!(u.email_contains("Łukasz@EXAMPLE"));
    }

    #[test]
    fn test_empty_search_matches_everyone() {
        assert!(UserSearch::default().matches(&user()));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let search = UserSearch {
            first_name: Some("anna".to_string()),
            email: Some("anna.nowak@EXAMPLE.com".to_string()),
            ..Default::default()
        };
        assert!(search.matches(&user()));
    }

    #[test]
    fn test_search_requires_all_criteria() {
        let search = UserSearch {
            first_name: Some("Anna".to_string()),
            birthdate: NaiveDate::from_ymd_opt(1991, 1, 1),
            ..Default::default()
        };
        assert!(!search.matches(&user()));
    }

    #[test]
    fn test_summary_variants() {
        let u = user();
        assert_eq!(UserSummary::basic(&u).email, None);
        assert_eq!(
            UserSummary::with_email(&u).email.as_deref(),
            Some("Anna.Nowak@example.com")
        );
    }
}
