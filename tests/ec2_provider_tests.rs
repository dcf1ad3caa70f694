use axum::{
    Form, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{TimeZone, Utc};
use snapshot_retention::{
    Ec2Config, Ec2SnapshotProvider, FixedClock, ProviderError, Region, RetentionPolicy,
    RetentionService, RetentionServiceImpl, SnapshotId, SnapshotProvider, SnapshotStatus,
    VolumeId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const VOLUME: &str = "vol-1234567890abcdef0";

struct FakeSnapshot {
    id: String,
    start_time: String,
    status: &'static str,
    volume_id: Option<&'static str>,
}

/// Just enough of the EC2 Query API to exercise the provider
#[derive(Default)]
struct FakeEc2 {
    snapshots: Mutex<Vec<FakeSnapshot>>,
    requests: Mutex<Vec<HashMap<String, String>>>,
    in_use: Mutex<Vec<String>>,
}

impl FakeEc2 {
    fn with_snapshots(snapshots: &[(&str, &str)]) -> Arc<Self> {
        let fake = Self::default();
        *fake.snapshots.lock().unwrap() = snapshots
            .iter()
            .map(|(id, start_time)| FakeSnapshot {
                id: id.to_string(),
                start_time: start_time.to_string(),
                status: "completed",
                volume_id: None,
            })
            .collect();
        Arc::new(fake)
    }

    fn actions(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r["Action"].clone())
            .collect()
    }
}

fn xml(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/xml;charset=UTF-8")], body).into_response()
}

fn error_doc(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response><Errors><Error><Code>{}</Code><Message>{}</Message></Error></Errors><RequestID>ea966190-f9aa-478e-9ede-example</RequestID></Response>"#,
        code, message
    )
}

async fn handle(
    State(fake): State<Arc<FakeEc2>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    fake.requests.lock().unwrap().push(params.clone());

    if params.get("Version").map(String::as_str) != Some("2016-11-15") {
        return xml(StatusCode::BAD_REQUEST, error_doc("InvalidParameterValue", "bad version"));
    }

    match params.get("Action").map(String::as_str) {
        Some("DescribeSnapshots") => describe(&fake, &params),
        Some("CreateSnapshot") => {
            let description = params.get("Description").cloned().unwrap_or_default();
            xml(
                StatusCode::OK,
                format!(
                    r#"<CreateSnapshotResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <snapshotId>snap-0fedcba9876543210</snapshotId>
    <volumeId>{}</volumeId>
    <status>pending</status>
    <startTime>2024-03-08T00:00:00.000Z</startTime>
    <progress>60%</progress>
    <ownerId>111122223333</ownerId>
    <volumeSize>30</volumeSize>
    <description>{}</description>
</CreateSnapshotResponse>"#,
                    params["VolumeId"], description
                ),
            )
        }
        Some("DeleteSnapshot") => {
            let id = params["SnapshotId"].clone();
            if fake.in_use.lock().unwrap().contains(&id) {
                return xml(
                    StatusCode::BAD_REQUEST,
                    error_doc("InvalidSnapshot.InUse", "The snapshot is currently in use"),
                );
            }

            let mut snapshots = fake.snapshots.lock().unwrap();
            match snapshots.iter().position(|s| s.id == id) {
                Some(pos) => {
                    snapshots.remove(pos);
                    xml(
                        StatusCode::OK,
                        r#"<DeleteSnapshotResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <return>true</return>
</DeleteSnapshotResponse>"#
                            .to_string(),
                    )
                }
                None => xml(
                    StatusCode::BAD_REQUEST,
                    error_doc(
                        "InvalidSnapshot.NotFound",
                        &format!("The snapshot '{}' does not exist.", id),
                    ),
                ),
            }
        }
        _ => xml(StatusCode::BAD_REQUEST, error_doc("InvalidAction", "unknown action")),
    }
}

fn describe(fake: &FakeEc2, params: &HashMap<String, String>) -> Response {
    assert_eq!(params["Filter.1.Name"], "volume-id");
    assert_eq!(params["Filter.2.Name"], "status");
    let status = params["Filter.2.Value.1"].as_str();

    let snapshots = fake.snapshots.lock().unwrap();
    let matching: Vec<&FakeSnapshot> = snapshots
        .iter()
        .filter(|s| s.status == status)
        .collect();

    let offset: usize = params
        .get("NextToken")
        .map(|t| t.parse().unwrap())
        .unwrap_or(0);
    let page_size: usize = params
        .get("MaxResults")
        .map(|m| m.parse().unwrap())
        .unwrap_or(matching.len().max(1));
    let end = (offset + page_size).min(matching.len());

    let items: String = matching[offset..end]
        .iter()
        .map(|s| {
            format!(
                "<item><snapshotId>{}</snapshotId><volumeId>{}</volumeId><status>{}</status><startTime>{}</startTime><progress>100%</progress></item>",
                s.id,
                s.volume_id.map_or(params["Filter.1.Value.1"].as_str(), |v| v),
                s.status,
                s.start_time
            )
        })
        .collect();
    let next_token = if end < matching.len() {
        format!("<nextToken>{}</nextToken>", end)
    } else {
        String::new()
    };

    xml(
        StatusCode::OK,
        format!(
            r#"<DescribeSnapshotsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <snapshotSet>{}</snapshotSet>{}
</DescribeSnapshotsResponse>"#,
            items, next_token
        ),
    )
}

async fn start_fake(fake: Arc<FakeEc2>) -> String {
    let app = Router::new().route("/", post(handle)).with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}

async fn provider_for(fake: Arc<FakeEc2>, page_size: Option<u32>) -> Ec2SnapshotProvider {
    let endpoint = start_fake(fake).await;
    let mut config = Ec2Config::new(Region::default()).with_endpoint(endpoint);
    config.page_size = page_size;
    Ec2SnapshotProvider::new(config).unwrap()
}

fn volume() -> VolumeId {
    VolumeId::new(VOLUME.to_string()).unwrap()
}

#[tokio::test]
async fn test_list_follows_pagination() {
    let fake = FakeEc2::with_snapshots(&[
        ("snap-01", "2024-02-01T06:00:00.000Z"),
        ("snap-02", "2024-02-02T06:00:00.000Z"),
        ("snap-03", "2024-02-03T06:00:00.000Z"),
        ("snap-04", "2024-02-04T06:00:00.000Z"),
        ("snap-05", "2024-02-05T06:00:00.000Z"),
    ]);
    let provider = provider_for(fake.clone(), Some(2)).await;

    let snapshots = provider
        .list_snapshots(&volume(), SnapshotStatus::Completed)
        .await
        .unwrap();

    let ids: Vec<_> = snapshots.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["snap-01", "snap-02", "snap-03", "snap-04", "snap-05"]);
    assert_eq!(snapshots[0].volume_id.as_str(), VOLUME);
    assert_eq!(fake.actions(), vec!["DescribeSnapshots"; 3]);
    assert_eq!(fake.requests.lock().unwrap()[1]["NextToken"], "2");
}

#[tokio::test]
async fn test_create_snapshot_sends_description() {
    let fake = FakeEc2::with_snapshots(&[]);
    let provider = provider_for(fake.clone(), None).await;

    let created = provider
        .create_snapshot(&volume(), Some("nightly"))
        .await
        .unwrap();

    assert_eq!(created.id.as_str(), "snap-0fedcba9876543210");
    assert_eq!(created.status, SnapshotStatus::Pending);
    assert_eq!(created.description.as_deref(), Some("nightly"));
    assert_eq!(fake.requests.lock().unwrap()[0]["VolumeId"], VOLUME);
}

#[tokio::test]
async fn test_delete_error_mapping() {
    let fake = FakeEc2::with_snapshots(&[("snap-busy", "2024-02-01T06:00:00.000Z")]);
    fake.in_use.lock().unwrap().push("snap-busy".to_string());
    let provider = provider_for(fake, None).await;

    let missing = SnapshotId::new("snap-missing".to_string()).unwrap();
    assert_eq!(
        provider.delete_snapshot(&missing).await,
        Err(ProviderError::NotFound {
            snapshot_id: missing.clone()
        })
    );

    let busy = SnapshotId::new("snap-busy".to_string()).unwrap();
    let err = provider.delete_snapshot(&busy).await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Api { status: 400, ref code, .. } if code == "InvalidSnapshot.InUse"
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Ec2Config::new(Region::default()).with_endpoint(format!("http://{}/", addr));
    let provider = Ec2SnapshotProvider::new(config).unwrap();

    let err = provider
        .list_snapshots(&volume(), SnapshotStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport { .. }));
}

#[tokio::test]
async fn test_cleanup_against_ec2_endpoint() {
    let fake = FakeEc2::with_snapshots(&[
        ("snap-0201", "2024-02-01T06:00:00.000Z"),
        ("snap-0212", "2024-02-12T06:00:00.000Z"),
        ("snap-0225", "2024-02-25T06:00:00.000Z"),
        ("snap-0229", "2024-02-29T06:00:00.000Z"),
        ("snap-bad", "not-a-date"),
    ]);
    let provider = provider_for(fake.clone(), None).await;
    let now = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();
    let service =
        RetentionServiceImpl::new(Arc::new(provider)).with_clock(Arc::new(FixedClock(now)));

    let report = service
        .cleanup(&volume(), &RetentionPolicy::default())
        .await
        .unwrap();

    assert_eq!(report.kept, 3);
    assert_eq!(report.deleted_succeeded, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].snapshot.id.as_str(), "snap-bad");

    let remaining: Vec<String> = fake
        .snapshots
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(remaining, vec!["snap-0201", "snap-0225", "snap-0229", "snap-bad"]);
    assert_eq!(
        fake.actions(),
        vec!["DescribeSnapshots", "DeleteSnapshot"]
    );
}

#[tokio::test]
async fn test_invalid_listed_item_is_rejected_alone() {
    let fake = FakeEc2::with_snapshots(&[
        ("snap-0212", "2024-02-12T06:00:00.000Z"),
        ("snap-0229", "2024-02-29T06:00:00.000Z"),
        ("snap-odd", "2024-02-13T06:00:00.000Z"),
    ]);
    fake.snapshots.lock().unwrap()[2].volume_id = Some("vol 1");
    let provider = provider_for(fake.clone(), None).await;

    let listed = provider
        .list_snapshots(&volume(), SnapshotStatus::Completed)
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed[0].defect.is_none());
    assert_eq!(
        listed[2].defect.as_ref().map(|d| d.field.as_str()),
        Some("volume_id")
    );

    let now = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();
    let service =
        RetentionServiceImpl::new(Arc::new(provider)).with_clock(Arc::new(FixedClock(now)));
    let report = service
        .cleanup(&volume(), &RetentionPolicy::default())
        .await
        .unwrap();

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].snapshot.id.as_str(), "snap-odd");
    assert_eq!(report.rejected[0].field, "volume_id");
    assert_eq!(report.kept, 1);
    assert_eq!(report.deleted_succeeded, 1);

    let remaining: Vec<String> = fake
        .snapshots
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(remaining, vec!["snap-0229", "snap-odd"]);
}
