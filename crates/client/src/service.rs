use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use reqwest::{Client, Response};
use signage_core::{
    models::{
        block::ScheduledBlock,
        schedule::{GetScheduleResponse, PutScheduleRequest, PutScheduleResponse, ScheduleScope},
    },
    service::ScheduleService,
};
use tracing::debug;

use crate::config::ClientConfig;

/// [`ScheduleService`] backed by the signage API's `/api/schedules`
/// endpoints.
#[derive(Debug, Clone)]
pub struct HttpScheduleService {
    client: Client,
    base_url: String,
}

impl HttpScheduleService {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn schedules_url(&self) -> String {
        format!("{}/api/schedules", self.base_url)
    }
}

/// Turns a non-success status into an error carrying the server's message.
async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(eyre!("Failed to {}: {} {}", action, status, error_text))
}

fn scope_query(scope: &ScheduleScope) -> Vec<(&'static str, String)> {
    let screens = scope
        .screen_ids
        .iter()
        .map(|screen| screen.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut query = vec![("screens", screens)];
    if let Some(organization_id) = scope.organization_id {
        query.push(("organization", organization_id.to_string()));
    }
    if let Some(branch_id) = scope.branch_id {
        query.push(("branch", branch_id.to_string()));
    }
    query
}

#[async_trait]
impl ScheduleService for HttpScheduleService {
    async fn get_schedule(&self, scope: &ScheduleScope) -> Result<Vec<ScheduledBlock>> {
        let response = self
            .client
            .get(self.schedules_url())
            .query(&scope_query(scope))
            .send()
            .await
            .wrap_err("Schedule request failed")?;

        let body: GetScheduleResponse = ensure_success(response, "load schedule")
            .await?
            .json()
            .await
            .wrap_err("Malformed schedule response")?;
        debug!("Fetched {} block(s)", body.blocks.len());

        Ok(body.blocks)
    }

    async fn put_schedule(&self, scope: &ScheduleScope, blocks: Vec<ScheduledBlock>) -> Result<()> {
        let request = PutScheduleRequest {
            scope: scope.clone(),
            blocks,
        };
        let response = self
            .client
            .put(self.schedules_url())
            .json(&request)
            .send()
            .await
            .wrap_err("Schedule submission failed")?;

        let body: PutScheduleResponse = ensure_success(response, "save schedule")
            .await?
            .json()
            .await
            .wrap_err("Malformed save response")?;
        debug!("Server stored {} block(s) at {}", body.saved, body.updated_at);

        Ok(())
    }
}
