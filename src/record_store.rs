use chrono::{SecondsFormat, Utc};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::lead::Lead;

pub const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// Client for the hosted table service (PostgREST-style REST interface).
pub struct RecordStoreClient {
    http_client: Client,
    base_url: String,
    table: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct LeadRow<'a> {
    full_name: &'a str,
    email: &'a str,
    insurance: &'a str,
    summary: &'a str,
    created_at: String,
}

impl<'a> LeadRow<'a> {
    fn new(lead: &'a Lead) -> Self {
        LeadRow {
            full_name: lead.full_name.as_ref(),
            email: lead.email.as_ref(),
            insurance: lead.insurance.as_ref(),
            summary: lead.summary.as_ref(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl RecordStoreClient {
    pub fn new(
        base_url: String,
        table: String,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<RecordStoreClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(RecordStoreClient {
            http_client,
            base_url,
            table,
            api_key,
        })
    }

    #[tracing::instrument(name = "Insert a new lead into the record store", skip(self, lead))]
    pub async fn insert_lead(&self, lead: &Lead) -> Result<(), reqwest::Error> {
        let url = format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        );

        let response = self
            .http_client
            .post(&url)
            .header("apikey", self.api_key.expose_secret())
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Prefer", "return=minimal")
            .json(&[LeadRow::new(lead)])
            .send()
            .await?;

        // the store reports insert errors as 4xx or 5xx, with the reason in the body
        let status = response.status();
        let status_check = response.error_for_status_ref().map(|_| ());
        if let Err(err) = status_check {
            let body = rejection_body(response).await;
            tracing::error!(status = %status, "Record store rejected the lead: {}", body);
            return Err(err);
        }

        Ok(())
    }
}

async fn rejection_body(response: Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|err| format!("<unreadable body: {}>", err.without_url()))
}
