use std::sync::Arc;

use crate::domain::{NewsletterSubscription, normalize_email};
use crate::error::{DomainError, RepoError};
use crate::ports::NewsletterRepository;

const ENTITY: &str = "Subscription";

#[derive(Clone)]
pub struct NewsletterService {
    subscriptions: Arc<dyn NewsletterRepository>,
}

impl NewsletterService {
    pub fn new(subscriptions: Arc<dyn NewsletterRepository>) -> Self {
        Self { subscriptions }
    }

    /// Subscribe an email.
    ///
    /// An active subscription is returned as-is without a write. An inactive
    /// one is re-activated in place, so an email never gets a second record.
    pub async fn subscribe(&self, email: &str) -> Result<NewsletterSubscription, DomainError> {
        let email = normalize_email(email)?;

        match self.subscriptions.find_by_email(&email).await? {
            Some(existing) if existing.is_subscribed => Ok(existing),
            Some(mut existing) => {
                existing.set_subscribed(true);
                Ok(self.subscriptions.update(existing).await?)
            }
            None => {
                let created = self
                    .subscriptions
                    .insert(NewsletterSubscription::new(email.clone()))
                    .await;
                match created {
                    Ok(subscription) => Ok(subscription),
                    // Lost a race with a concurrent subscribe for the same email.
                    Err(RepoError::Constraint(_)) => self
                        .subscriptions
                        .find_by_email(&email)
                        .await?
                        .ok_or_else(|| DomainError::not_found(ENTITY, &email)),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Soft-unsubscribe. The record is kept with `is_subscribed = false`.
    pub async fn unsubscribe(&self, email: &str) -> Result<NewsletterSubscription, DomainError> {
        let email = email.trim().to_lowercase();
        let mut subscription = self
            .subscriptions
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, &email))?;

        if !subscription.is_subscribed {
            return Ok(subscription);
        }
        subscription.set_subscribed(false);
        Ok(self.subscriptions.update(subscription).await?)
    }

    /// Subscriptions, newest first. Without a filter only active ones are listed.
    pub async fn list(
        &self,
        is_subscribed: Option<bool>,
    ) -> Result<Vec<NewsletterSubscription>, DomainError> {
        Ok(self
            .subscriptions
            .list(Some(is_subscribed.unwrap_or(true)))
            .await?)
    }
}
