use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::responses::{
    decode, decode_error, DeleteSnapshotResponse, DescribeSnapshotsResponse, SnapshotItem,
};
use crate::{
    domain::{
        errors::{ProviderError, ProviderResult},
        models::{SnapshotRecord, SnapshotStatus},
        value_objects::{Region, SnapshotId, VolumeId},
    },
    ports::provider::SnapshotProvider,
};

const API_VERSION: &str = "2016-11-15";

/// Configuration for the EC2 snapshot provider
#[derive(Debug, Clone)]
pub struct Ec2Config {
    pub region: Region,
    /// Overrides `https://ec2.<region>.amazonaws.com/`
    pub endpoint: Option<String>,
    /// MaxResults for DescribeSnapshots pages
    pub page_size: Option<u32>,
    pub timeout: Duration,
}

impl Ec2Config {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            endpoint: None,
            page_size: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://ec2.{}.amazonaws.com/", self.region.code()),
        }
    }
}

/// Snapshot provider speaking the EC2 Query API.
///
/// Requests are form-encoded POSTs and responses are XML. Requests are not
/// signed: point `endpoint` at an EC2-compatible service or a signing proxy.
#[derive(Clone, Debug)]
pub struct Ec2SnapshotProvider {
    client: Client,
    endpoint: String,
    page_size: Option<u32>,
}

impl Ec2SnapshotProvider {
    pub fn new(config: Ec2Config) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
            page_size: config.page_size,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one Query API action and return the raw success body
    async fn call(
        &self,
        action: &str,
        params: Vec<(String, String)>,
        snapshot_id: Option<&SnapshotId>,
    ) -> ProviderResult<String> {
        let mut form = vec![
            ("Action".to_string(), action.to_string()),
            ("Version".to_string(), API_VERSION.to_string()),
        ];
        form.extend(params);

        debug!(action, endpoint = %self.endpoint, "Sending EC2 request");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                message: format!("{} request failed: {}", action, e),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProviderError::Transport {
            message: format!("Failed to read {} response: {}", action, e),
        })?;

        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &body, snapshot_id));
        }

        Ok(body)
    }
}

#[async_trait]
impl SnapshotProvider for Ec2SnapshotProvider {
    async fn list_snapshots(
        &self,
        volume: &VolumeId,
        status: SnapshotStatus,
    ) -> ProviderResult<Vec<SnapshotRecord>> {
        let mut snapshots = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("Filter.1.Name".to_string(), "volume-id".to_string()),
                ("Filter.1.Value.1".to_string(), volume.to_string()),
                ("Filter.2.Name".to_string(), "status".to_string()),
                ("Filter.2.Value.1".to_string(), status.as_str().to_string()),
            ];
            if let Some(page_size) = self.page_size {
                params.push(("MaxResults".to_string(), page_size.to_string()));
            }
            if let Some(token) = next_token.take() {
                params.push(("NextToken".to_string(), token));
            }

            let body = self.call("DescribeSnapshots", params, None).await?;
            let page: DescribeSnapshotsResponse = decode("DescribeSnapshots", &body)?;

            for item in page.snapshot_set.items {
                let record = item.into_record(volume);
                if let Some(defect) = &record.defect {
                    warn!(
                        snapshot_id = %record.id,
                        field = %defect.field,
                        reason = %defect.reason,
                        "Listed snapshot failed validation"
                    );
                }
                snapshots.push(record);
            }

            match page.next_token.filter(|t| !t.trim().is_empty()) {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!(volume = %volume, count = snapshots.len(), "Listed snapshots");
        Ok(snapshots)
    }

    async fn create_snapshot(
        &self,
        volume: &VolumeId,
        description: Option<&str>,
    ) -> ProviderResult<SnapshotRecord> {
        let mut params = vec![("VolumeId".to_string(), volume.to_string())];
        if let Some(description) = description {
            params.push(("Description".to_string(), description.to_string()));
        }

        let body = self.call("CreateSnapshot", params, None).await?;
        let created: SnapshotItem = decode("CreateSnapshot", &body)?;
        let record = created.into_record(volume);

        if let Some(defect) = &record.defect {
            return Err(ProviderError::InvalidResponse {
                message: format!(
                    "CreateSnapshot returned an invalid {}: {}",
                    defect.field, defect.reason
                ),
            });
        }

        Ok(record)
    }

    async fn delete_snapshot(&self, snapshot_id: &SnapshotId) -> ProviderResult<()> {
        let params = vec![("SnapshotId".to_string(), snapshot_id.to_string())];

        let body = self
            .call("DeleteSnapshot", params, Some(snapshot_id))
            .await?;
        let response: DeleteSnapshotResponse = decode("DeleteSnapshot", &body)?;

        if !response.result {
            return Err(ProviderError::Api {
                status: 200,
                code: "DeleteSnapshotRejected".to_string(),
                message: format!("DeleteSnapshot returned false for {}", snapshot_id),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_follows_region() {
        let config = Ec2Config::new(Region::parse("eu-w1").unwrap());
        assert_eq!(config.endpoint_url(), "https://ec2.eu-west-1.amazonaws.com/");
    }

    #[test]
    fn test_endpoint_override() {
        let config = Ec2Config::new(Region::default()).with_endpoint("http://localhost:5000/");
        let provider = Ec2SnapshotProvider::new(config).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:5000/");
    }
}
