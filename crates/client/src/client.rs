//! Processing server HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! One multipart POST per submission: no retries, no timeout unless configured.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};

use bufalo_config::Settings;
use bufalo_core::SubmissionRequest;

use crate::error::UploadError;
use crate::reply::{classify, RawReply, ServerReply};

/// Sends a submission and returns the classified reply.
///
/// The coordinator only sees this trait, so flows can be exercised without
/// a server.
pub trait Transport {
    fn send(&self, req: &SubmissionRequest) -> Result<ServerReply, UploadError>;
}

/// Upload client (blocking).
#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl UploadClient {
    /// Client for `endpoint` with no request timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, UploadError> {
        Self::with_timeout(endpoint, None)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, UploadError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("bufalo/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self { http, endpoint })
    }

    /// Client from settings, with an optional `--endpoint` override.
    pub fn from_settings(settings: &Settings, endpoint_flag: Option<&str>) -> Result<Self, UploadError> {
        Self::with_timeout(
            settings.effective_endpoint(endpoint_flag),
            settings.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload/", self.endpoint)
    }

    /// POST the file and dates as `multipart/form-data`.
    pub fn submit(&self, req: &SubmissionRequest) -> Result<ServerReply, UploadError> {
        let url = self.upload_url();
        log::debug!(
            "POST {} file={} ({} bytes) start_date={} end_date={}",
            url,
            req.file.name,
            req.file.bytes.len(),
            req.start_field(),
            req.end_field(),
        );

        let response = self.http.post(&url)
            .multipart(build_form(req)?)
            .send()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = header_string(&response, CONTENT_TYPE);
        let content_disposition = header_string(&response, CONTENT_DISPOSITION);
        let body = response.bytes()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let reply = classify(RawReply {
            status,
            content_type: content_type.as_deref(),
            content_disposition: content_disposition.as_deref(),
            body: &body,
        });

        match &reply {
            Ok(ServerReply::File { bytes, .. }) => {
                log::info!("HTTP {}: processed file, {} bytes", status, bytes.len())
            }
            Ok(ServerReply::Preview(table)) => {
                log::info!("HTTP {}: preview, {} rows", status, table.rows.len())
            }
            Err(e) => log::warn!("HTTP {}: {}", status, e),
        }

        reply
    }
}

impl Transport for UploadClient {
    fn send(&self, req: &SubmissionRequest) -> Result<ServerReply, UploadError> {
        self.submit(req)
    }
}

/// The three form fields: `file`, `start_date`, `end_date`.
fn build_form(req: &SubmissionRequest) -> Result<Form, UploadError> {
    let file = Part::bytes(req.file.bytes.clone())
        .file_name(req.file.name.clone())
        .mime_str(req.file.mime())
        .map_err(|e| UploadError::Request(e.to_string()))?;

    Ok(Form::new()
        .part("file", file)
        .text("start_date", req.start_field())
        .text("end_date", req.end_field()))
}

fn header_string(
    response: &reqwest::blocking::Response,
    name: reqwest::header::HeaderName,
) -> Option<String> {
    response.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
