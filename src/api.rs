// Upload client module: a small blocking HTTP client that posts release
// files to the Google Code project file service. The uploader only sees the
// `FileHost` trait, so tests can swap in a fake host.

use crate::config::UploadConfig;
use crate::labels::Label;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LOCATION, USER_AGENT};
use reqwest::StatusCode;
use std::path::Path;

const UPLOADER_AGENT: &str = "Googlecode.com uploader v0.9.4";

/// One file to publish.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub path: &'a Path,
    pub project: &'a str,
    pub author: &'a str,
    pub credential: &'a str,
    pub summary: &'a str,
    pub labels: &'a [Label],
}

/// What the host said about an upload. `location` is only set when the
/// file was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: u16,
    /// Canonical phrase for `status`; hyper does not keep the server's own.
    pub reason: String,
    pub location: Option<String>,
}

pub trait FileHost {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<UploadResponse>;
}

/// Client for the `/files` endpoint, authenticated per request with HTTP
/// basic auth. Without an override the endpoint is derived from the
/// request's project.
#[derive(Clone)]
pub struct GoogleCodeClient {
    client: Client,
    base_url: Option<String>,
}

impl GoogleCodeClient {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GoogleCodeClient {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        Self::new(config.upload_url.as_deref())
    }

    fn files_url(&self, project: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/files", base),
            None => format!("https://{}.googlecode.com/files", project),
        }
    }

    fn headers(&self, author: &str, credential: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&basic_auth(author, credential))
                .context("Credential cannot be sent in a header")?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(UPLOADER_AGENT));
        Ok(headers)
    }
}

impl FileHost for GoogleCodeClient {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<UploadResponse> {
        let url = self.files_url(request.project);

        // Buffered so the body goes out with a Content-Length.
        let contents = std::fs::read(request.path)
            .with_context(|| format!("Failed to read {}", request.path.display()))?;
        let file_name = request
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let part = multipart::Part::bytes(contents)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;

        let mut form = multipart::Form::new().text("summary", request.summary.to_string());
        for label in request.labels {
            form = form.text("label", label.as_str());
        }
        let form = form.part("filename", part);

        tracing::debug!(%url, file = %request.path.display(), "sending upload request");
        let res = self
            .client
            .post(&url)
            .headers(self.headers(request.author, request.credential)?)
            .multipart(form)
            .send()
            .context("Failed to send upload request")?;

        let status = res.status();
        let location = if status == StatusCode::CREATED {
            res.headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        } else {
            None
        };
        tracing::debug!(status = status.as_u16(), ?location, "upload response");
        Ok(UploadResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            location,
        })
    }
}

/// `Basic` authorization value; a `@gmail.com` account suffix is dropped
/// because the service expects the bare user name.
fn basic_auth(author: &str, credential: &str) -> String {
    let user = author.strip_suffix("@gmail.com").unwrap_or(author);
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, credential)))
}
