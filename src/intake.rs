use secrecy::Secret;
use std::time;

use crate::domain::lead::{Lead, ValidationError};
use crate::domain::lead_form_data::LeadFormData;
use crate::record_store::{RecordStoreClient, REQUEST_TIMEOUT};
use crate::webhook_client::WebhookClient;

pub const DEFAULT_LEAD_RECIPIENT: &str = "tm@travismartin.io";
pub const DEFAULT_LEAD_SOURCE: &str = "patient-advocacy-service";

pub const VALIDATION_MESSAGE: &str = "Please fill in all fields.";
pub const FAILURE_MESSAGE: &str = "We could not submit your request. Please try again or contact us.";

#[derive(Clone, Debug)]
pub struct StoreCredentials {
    pub url: String,
    pub api_key: Secret<String>,
    pub table: String,
}

/// Which integrations a [`LeadIntake`] talks to. A `None` disables that step.
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub store: Option<StoreCredentials>,
    pub webhook_url: Option<Secret<String>>,
    pub recipient: String,
    pub source: String,
    pub store_timeout: time::Duration,
    pub webhook_timeout: time::Duration,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig {
            store: None,
            webhook_url: None,
            recipient: String::from(DEFAULT_LEAD_RECIPIENT),
            source: String::from(DEFAULT_LEAD_SOURCE),
            store_timeout: REQUEST_TIMEOUT,
            webhook_timeout: REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    /// The remote answered with a 4xx or 5xx status.
    Rejected,
    Transport,
}

impl FailureKind {
    fn of(err: &reqwest::Error) -> FailureKind {
        if err.is_timeout() {
            FailureKind::Timeout
        } else if err.is_status() {
            FailureKind::Rejected
        } else {
            FailureKind::Transport
        }
    }
}

#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error("The lead is missing a required field.")]
    Validation(#[from] ValidationError),
    #[error("Failed to insert the lead into the record store.")]
    Persistence(#[source] reqwest::Error),
    #[error("Failed to notify the lead webhook.")]
    Notification(#[source] reqwest::Error),
}

impl SubmissionError {
    /// The only text ever shown to the person filling in the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmissionError::Validation(_) => VALIDATION_MESSAGE,
            SubmissionError::Persistence(_) | SubmissionError::Notification(_) => FAILURE_MESSAGE,
        }
    }

    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            SubmissionError::Validation(_) => None,
            SubmissionError::Persistence(err) | SubmissionError::Notification(err) => {
                Some(FailureKind::of(err))
            }
        }
    }
}

impl std::fmt::Debug for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;

        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            write!(f, "\n\tCaused by: {}", cause)?;
            source = cause.source();
        }

        Ok(())
    }
}

pub struct LeadIntake {
    record_store: Option<RecordStoreClient>,
    webhook: Option<WebhookClient>,
}

impl LeadIntake {
    pub fn new(config: IntakeConfig) -> Result<LeadIntake, reqwest::Error> {
        let record_store = config
            .store
            .map(|store| {
                RecordStoreClient::new(
                    store.url,
                    store.table,
                    store.api_key,
                    Some(config.store_timeout),
                )
            })
            .transpose()?;
        let webhook = config
            .webhook_url
            .map(|url| {
                WebhookClient::new(
                    url,
                    config.recipient,
                    config.source,
                    Some(config.webhook_timeout),
                )
            })
            .transpose()?;

        Ok(LeadIntake {
            record_store,
            webhook,
        })
    }

    pub fn is_store_enabled(&self) -> bool {
        self.record_store.is_some()
    }

    pub fn is_webhook_enabled(&self) -> bool {
        self.webhook.is_some()
    }

    /// Validates the form, then stores and forwards the lead. The store runs
    /// first and a failure there skips the webhook.
    #[tracing::instrument(name = "Submitting a lead", skip(self, form))]
    pub async fn submit(&self, form: LeadFormData) -> Result<(), SubmissionError> {
        let result = self.process(form).await;

        match &result {
            Err(err @ SubmissionError::Validation(_)) => {
                tracing::warn!("Rejected lead: {:?}", err)
            }
            Err(err) => tracing::error!("Failed to submit lead: {:?}", err),
            Ok(()) => tracing::info!("Lead submitted"),
        }

        result
    }

    async fn process(&self, form: LeadFormData) -> Result<(), SubmissionError> {
        let lead: Lead = form.try_into()?;

        if let Some(record_store) = &self.record_store {
            record_store
                .insert_lead(&lead)
                .await
                .map_err(|err| SubmissionError::Persistence(err.without_url()))?;
        }

        // Errors leave without their URL: webhook URLs carry their own secret token.
        if let Some(webhook) = &self.webhook {
            webhook
                .notify_lead(&lead)
                .await
                .map_err(|err| SubmissionError::Notification(err.without_url()))?;
        }

        Ok(())
    }
}
