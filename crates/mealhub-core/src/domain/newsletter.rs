use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// One newsletter subscription per email. Unsubscribing flips the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscription {
    pub id: Uuid,
    pub email: String,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsletterSubscription {
    /// A fresh, active subscription. `email` must already be normalized.
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            is_subscribed: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_subscribed(&mut self, subscribed: bool) {
        self.is_subscribed = subscribed;
        self.updated_at = Utc::now();
    }
}

/// Trim and lower-case an email address, rejecting obviously malformed ones.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    let invalid = || DomainError::Validation("Invalid email format".to_string());

    if email.is_empty() {
        return Err(DomainError::Validation("Email is required".to_string()));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Reader@Example.COM ").unwrap(),
            "reader@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_malformed() {
        for raw in ["", "plainaddress", "@example.com", "a@b", "a@@b.com", "a b@c.com", "a@b..com"] {
            assert!(normalize_email(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_set_subscribed_touches_timestamp() {
        let mut sub = NewsletterSubscription::new("a@b.com".to_string());
        let before = sub.updated_at;
        sub.set_subscribed(false);
        assert!(!sub.is_subscribed);
        assert!(sub.updated_at >= before);
    }
}
