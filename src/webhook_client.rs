use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::lead::Lead;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

pub struct WebhookClient {
    http_client: Client,
    url: Secret<String>,
    recipient: String,
    source: String,
}

#[derive(serde::Serialize)]
struct LeadNotification<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    to: &'a str,
    payload: &'a Lead,
    source: &'a str,
    timestamp: String,
}

impl WebhookClient {
    pub fn new(
        url: Secret<String>,
        recipient: String,
        source: String,
        timeout: Option<time::Duration>,
    ) -> Result<WebhookClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(WebhookClient {
            http_client,
            url,
            recipient,
            source,
        })
    }

    #[tracing::instrument(
        name = "Notify the lead webhook",
        skip(self, lead),
        fields(recipient = %self.recipient)
    )]
    pub async fn notify_lead(&self, lead: &Lead) -> Result<(), reqwest::Error> {
        let body = LeadNotification {
            kind: "lead",
            to: &self.recipient,
            payload: lead,
            source: &self.source,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        // The response status is not inspected, only transport failures count.
        let response = self
            .http_client
            .post(self.url.expose_secret())
            .json(&body)
            .send()
            .await?;

        tracing::debug!("Lead webhook answered with status {}", response.status());

        Ok(())
    }
}
