use std::sync::{Arc, Mutex};

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::Client as S3Client;
use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use presigned_url::object_store::S3ObjectStore;
use tokio::net::TcpListener;

pub const FAKE_BUCKET: &str = "test-bucket";

/// Requests seen by the fake endpoint, as `METHOD path?query`
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// In-process S3 endpoint serving a fixed bucket layout:
///
/// * `images/logo.png` exists
/// * `images/secret.png` is forbidden (403 with an empty body)
/// * every other key is missing (404)
/// * listing `images/` returns two pages joined by continuation token `tok`
pub struct FakeS3 {
    pub endpoint: String,
    pub requests: RequestLog,
}

impl FakeS3 {
    pub async fn start() -> Self {
        let requests = RequestLog::default();
        let app = Router::new()
            .fallback(handle)
            .with_state(requests.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake S3 listener");
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { endpoint, requests }
    }

    /// Object store talking to this endpoint with static credentials and no retries
    pub fn store(&self) -> S3ObjectStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"))
            .endpoint_url(&self.endpoint)
            .force_path_style(true)
            .retry_config(aws_sdk_s3::config::retry::RetryConfig::disabled())
            .build();

        S3ObjectStore::new(
            Arc::new(S3Client::from_conf(config)),
            FAKE_BUCKET.to_string(),
        )
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(State(requests): State<RequestLog>, method: Method, uri: Uri) -> Response {
    requests
        .lock()
        .unwrap()
        .push(format!("{method} {uri}"));

    let path = uri.path();
    let query = uri.query().unwrap_or_default();

    if method == Method::HEAD {
        return match path {
            "/test-bucket/images/logo.png" => StatusCode::OK.into_response(),
            "/test-bucket/images/secret.png" => StatusCode::FORBIDDEN.into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        };
    }

    if method == Method::GET && matches!(path, "/test-bucket" | "/test-bucket/") && query.contains("list-type=2") {
        let body = if query.contains("continuation-token=tok") {
            list_page(&["images/b.png"], None)
        } else {
            list_page(&["images/a.png", "images/dir/"], Some("tok"))
        };
        return ([(header::CONTENT_TYPE, "application/xml")], body).into_response();
    }

    StatusCode::NOT_IMPLEMENTED.into_response()
}

fn list_page(keys: &[&str], next_token: Option<&str>) -> String {
    let contents: String = keys
        .iter()
        .map(|key| format!("<Contents><Key>{key}</Key><Size>1</Size></Contents>"))
        .collect();
    let truncation = next_token.map_or_else(
        || "<IsTruncated>false</IsTruncated>".to_string(),
        |token| {
            format!("<IsTruncated>true</IsTruncated><NextContinuationToken>{token}</NextContinuationToken>")
        },
    );

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>test-bucket</Name><Prefix>images/</Prefix><KeyCount>{}</KeyCount><MaxKeys>1000</MaxKeys>{truncation}{contents}</ListBucketResult>"#,
        keys.len()
    )
}
