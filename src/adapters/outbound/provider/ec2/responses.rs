//! XML documents returned by the EC2 Query API.

use quick_xml::de::from_str;
use serde::Deserialize;

use crate::domain::{
    errors::{ProviderError, ProviderResult},
    models::{SnapshotRecord, SnapshotStatus},
    value_objects::{SnapshotId, VolumeId},
};

#[derive(Debug, Deserialize)]
pub(crate) struct DescribeSnapshotsResponse {
    #[serde(rename = "snapshotSet", default)]
    pub snapshot_set: SnapshotSet,
    #[serde(rename = "nextToken", default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SnapshotSet {
    #[serde(rename = "item", default)]
    pub items: Vec<SnapshotItem>,
}

/// One snapshot as described by EC2; also the body of CreateSnapshotResponse
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotItem {
    #[serde(rename = "snapshotId")]
    pub snapshot_id: String,
    #[serde(rename = "volumeId", default)]
    pub volume_id: String,
    #[serde(rename = "status", default)]
    pub status: String,
    #[serde(rename = "startTime", default)]
    pub start_time: String,
    #[serde(rename = "description", default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteSnapshotResponse {
    #[serde(rename = "return")]
    pub result: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Errors")]
    errors: ErrorList,
}

#[derive(Debug, Deserialize)]
struct ErrorList {
    #[serde(rename = "Error", default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

/// Decode a successful response body
pub(crate) fn decode<T>(action: &str, body: &str) -> ProviderResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    from_str(body).map_err(|e| ProviderError::InvalidResponse {
        message: format!("{} response could not be decoded: {}", action, e),
    })
}

/// Map an error document to a provider error
pub(crate) fn decode_error(
    status: u16,
    body: &str,
    snapshot_id: Option<&SnapshotId>,
) -> ProviderError {
    let first = from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|doc| doc.errors.errors.into_iter().next());

    match (first, snapshot_id) {
        (Some(error), Some(id)) if error.code == "InvalidSnapshot.NotFound" => {
            ProviderError::NotFound {
                snapshot_id: id.clone(),
            }
        }
        (Some(error), _) => ProviderError::Api {
            status,
            code: error.code,
            message: error.message,
        },
        (None, _) => ProviderError::Api {
            status,
            code: "Unknown".to_string(),
            message: body.chars().take(200).collect(),
        },
    }
}

impl SnapshotItem {
    /// Convert to a domain record.
    ///
    /// An item with an invalid identifier is still returned, marked with a
    /// defect so the classifier rejects it alone. The start time is
    /// validated later by the classifier.
    pub(crate) fn into_record(self, requested_volume: &VolumeId) -> SnapshotRecord {
        let (id, id_defect) = match SnapshotId::new(self.snapshot_id.clone()) {
            Ok(id) => (id, None),
            Err(e) => (
                SnapshotId::unchecked(self.snapshot_id),
                Some(("snapshot_id", e.to_string())),
            ),
        };

        let (volume_id, volume_defect) = if self.volume_id.is_empty() {
            (requested_volume.clone(), None)
        } else {
            match VolumeId::new(self.volume_id) {
                Ok(volume_id) => (volume_id, None),
                Err(e) => (requested_volume.clone(), Some(("volume_id", e.to_string()))),
            }
        };

        let record = SnapshotRecord {
            id,
            volume_id,
            start_time: self.start_time,
            description: self.description.filter(|d| !d.trim().is_empty()),
            status: SnapshotStatus::parse(&self.status),
            defect: None,
        };

        match id_defect.or(volume_defect) {
            Some((field, reason)) => record.with_defect(field, reason),
            None => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIBE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeSnapshotsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <snapshotSet>
        <item>
            <snapshotId>snap-1234567890abcdef0</snapshotId>
            <volumeId>vol-1234567890abcdef0</volumeId>
            <status>completed</status>
            <startTime>2016-08-29T20:44:18.000Z</startTime>
            <progress>100%</progress>
            <ownerId>111122223333</ownerId>
            <volumeSize>15</volumeSize>
            <description>Daily Backup</description>
            <encrypted>false</encrypted>
        </item>
        <item>
            <snapshotId>snap-0a1b2c3d4e5f67890</snapshotId>
            <volumeId>vol-1234567890abcdef0</volumeId>
            <status>completed</status>
            <startTime>2016-08-30T20:44:18.000Z</startTime>
            <progress>100%</progress>
            <ownerId>111122223333</ownerId>
            <volumeSize>15</volumeSize>
            <encrypted>false</encrypted>
        </item>
    </snapshotSet>
    <nextToken>page-2</nextToken>
</DescribeSnapshotsResponse>"#;

    #[test]
    fn test_decode_describe_snapshots() {
        let response: DescribeSnapshotsResponse = decode("DescribeSnapshots", DESCRIBE).unwrap();
        assert_eq!(response.next_token.as_deref(), Some("page-2"));
        assert_eq!(response.snapshot_set.items.len(), 2);

        let volume = VolumeId::new("vol-1234567890abcdef0".to_string()).unwrap();
        let records: Vec<SnapshotRecord> = response
            .snapshot_set
            .items
            .into_iter()
            .map(|item| item.into_record(&volume))
            .collect();

        assert_eq!(records[0].id.as_str(), "snap-1234567890abcdef0");
        assert_eq!(records[0].description.as_deref(), Some("Daily Backup"));
        assert_eq!(records[0].status, SnapshotStatus::Completed);
        assert_eq!(records[0].start_time, "2016-08-29T20:44:18.000Z");
        assert!(records[1].description.is_none());
    }

    #[test]
    fn test_decode_empty_snapshot_set() {
        let body = r#"<DescribeSnapshotsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <snapshotSet/>
</DescribeSnapshotsResponse>"#;

        let response: DescribeSnapshotsResponse = decode("DescribeSnapshots", body).unwrap();
        assert!(response.snapshot_set.items.is_empty());
        assert!(response.next_token.is_none());
    }

    #[test]
    fn test_invalid_item_is_kept_with_defect() {
        let body = r#"<DescribeSnapshotsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <snapshotSet>
        <item>
            <snapshotId>snap-good</snapshotId>
            <volumeId>vol-1</volumeId>
            <status>completed</status>
            <startTime>2024-03-01T00:00:00.000Z</startTime>
        </item>
        <item>
            <snapshotId>snap-bad</snapshotId>
            <volumeId>vol 1</volumeId>
            <status>completed</status>
            <startTime>2024-03-02T00:00:00.000Z</startTime>
        </item>
    </snapshotSet>
</DescribeSnapshotsResponse>"#;

        let response: DescribeSnapshotsResponse = decode("DescribeSnapshots", body).unwrap();
        let volume = VolumeId::new("vol-1".to_string()).unwrap();
        let records: Vec<SnapshotRecord> = response
            .snapshot_set
            .items
            .into_iter()
            .map(|item| item.into_record(&volume))
            .collect();

        assert_eq!(records.len(), 2);
        assert!(records[0].defect.is_none());
        assert_eq!(records[1].id.as_str(), "snap-bad");
        assert_eq!(
            records[1].defect.as_ref().map(|d| d.field.as_str()),
            Some("volume_id")
        );
    }

    #[test]
    fn test_decode_delete_response() {
        let body = r#"<DeleteSnapshotResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <return>true</return>
</DeleteSnapshotResponse>"#;

        let response: DeleteSnapshotResponse = decode("DeleteSnapshot", body).unwrap();
        assert!(response.result);
    }

    #[test]
    fn test_decode_error_document() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Response><Errors><Error><Code>InvalidSnapshot.InUse</Code><Message>The snapshot snap-1 is currently in use by ami-1</Message></Error></Errors><RequestID>ea966190-f9aa-478e-9ede-example</RequestID></Response>"#;

        match decode_error(400, body, None) {
            ProviderError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "InvalidSnapshot.InUse");
                assert!(message.contains("in use"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_not_found_error() {
        let body = r#"<Response><Errors><Error><Code>InvalidSnapshot.NotFound</Code><Message>The snapshot 'snap-1' does not exist.</Message></Error></Errors><RequestID>x</RequestID></Response>"#;
        let id = SnapshotId::new("snap-1".to_string()).unwrap();

        assert_eq!(
            decode_error(400, body, Some(&id)),
            ProviderError::NotFound { snapshot_id: id }
        );
    }

    #[test]
    fn test_decode_garbage_error_body() {
        let err = decode_error(503, "Service Unavailable", None);
        assert_eq!(err.code(), "Unknown");
    }
}
