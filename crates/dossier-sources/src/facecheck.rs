//! Face search client for the FaceCheck.ID API
//!
//! A search is two steps: upload the image to obtain a search id, then poll
//! the search endpoint until it returns results or an error.

use crate::config::FaceCheckConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use dossier_domain::traits::{BoxError, FaceSearch};
use dossier_domain::CandidateMatch;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

/// Reply to an image upload
#[derive(Debug, Deserialize)]
struct UploadReply {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    id_search: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    id_search: &'a str,
    with_progress: bool,
    status_only: bool,
    demo: bool,
}

/// Reply to a search poll
#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    output: Option<SearchOutput>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    progress: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchOutput {
    #[serde(default)]
    items: Vec<FaceItem>,
}

#[derive(Debug, Deserialize)]
struct FaceItem {
    score: u32,
    url: String,
}

/// What one poll told us
#[derive(Debug)]
enum PollState {
    Pending { message: String, progress: u32 },
    Done(Vec<CandidateMatch>),
}

/// Format a service error the way the service reports it: `"{error} ({code})"`
fn upstream_error(error: &str, code: Option<&Value>) -> SourceError {
    let code = match code {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    SourceError::Upstream(format!("{} ({})", error, code))
}

fn non_empty(error: Option<&String>) -> Option<&str> {
    error.map(String::as_str).filter(|e| !e.is_empty())
}

impl SearchReply {
    fn into_state(self) -> Result<PollState, SourceError> {
        if let Some(error) = non_empty(self.error.as_ref()) {
            return Err(upstream_error(error, self.code.as_ref()));
        }
        match self.output {
            Some(output) => Ok(PollState::Done(
                output
                    .items
                    .into_iter()
                    .map(|item| CandidateMatch::new(item.score, item.url))
                    .collect(),
            )),
            None => Ok(PollState::Pending {
                message: self.message.unwrap_or_default(),
                progress: self.progress.unwrap_or(0),
            }),
        }
    }
}

/// FaceCheck.ID client
pub struct FaceCheckClient {
    client: reqwest::Client,
    config: FaceCheckConfig,
}

impl FaceCheckClient {
    /// Create a client; the API token must be set
    pub fn new(config: FaceCheckConfig) -> Result<Self, SourceError> {
        if config.api_token.trim().is_empty() {
            return Err(SourceError::Config("FaceCheck API token is empty".to_string()));
        }
        config.validate().map_err(SourceError::Config)?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn upload(&self, image: &[u8]) -> Result<String, SourceError> {
        let form = Form::new().part("images", Part::bytes(image.to_vec()).file_name("image"));
        let reply: UploadReply = self
            .client
            .post(self.endpoint("/api/upload_pic"))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::AUTHORIZATION, self.config.api_token.as_str())
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = non_empty(reply.error.as_ref()) {
            return Err(upstream_error(error, reply.code.as_ref()));
        }
        let id = reply
            .id_search
            .ok_or_else(|| SourceError::InvalidResponse("Upload reply has no id_search".to_string()))?;
        info!(id_search = %id, status = reply.message.as_deref().unwrap_or(""), "Image uploaded");
        Ok(id)
    }

    async fn poll(&self, id_search: &str) -> Result<PollState, SourceError> {
        let request = SearchRequest {
            id_search,
            with_progress: true,
            status_only: false,
            demo: self.config.testing_mode,
        };
        let reply: SearchReply = self
            .client
            .post(self.endpoint("/api/search"))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::AUTHORIZATION, self.config.api_token.as_str())
            .json(&request)
            .send()
            .await?
            .json()
            .await?;
        reply.into_state()
    }

    /// Upload `image` and wait for the results
    pub async fn search_face(&self, image: &[u8]) -> Result<Vec<CandidateMatch>, SourceError> {
        if self.config.testing_mode {
            info!("Testing mode: results are inaccurate and the queue is slow, but no credits are spent");
        }

        let id_search = self.upload(image).await?;
        let start = Instant::now();
        loop {
            match self.poll(&id_search).await? {
                PollState::Done(candidates) => {
                    info!(results = candidates.len(), "Face search finished");
                    return Ok(candidates);
                }
                PollState::Pending { message, progress } => {
                    debug!(status = %message, progress, "Face search pending");
                }
            }
            if start.elapsed() >= self.config.max_wait() {
                return Err(SourceError::Timeout(self.config.max_wait_secs));
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}

#[async_trait]
impl FaceSearch for FaceCheckClient {
    async fn search(&self, image: &[u8]) -> Result<Vec<CandidateMatch>, BoxError> {
        Ok(self.search_face(image).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> Result<PollState, SourceError> {
        serde_json::from_str::<SearchReply>(json).unwrap().into_state()
    }

    #[test]
    fn test_pending_reply() {
        match reply(r#"{"error": null, "output": null, "message": "Waiting in queue. 3 ahead", "progress": 0}"#) {
            Ok(PollState::Pending { message, .. }) => assert!(message.starts_with("Waiting")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_finished_reply() {
        let state = reply(
            r#"{"error": "", "output": {"items": [
                {"score": 98, "url": "https://a.example", "base64": "data:image/webp;base64,AAA"},
                {"score": 61, "url": "https://b.example", "base64": ""}
            ]}}"#,
        )
        .unwrap();
        match state {
            PollState::Done(candidates) => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].score, 98);
                assert_eq!(candidates[1].url, "https://b.example");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_reply_is_verbatim() {
        let err = reply(r#"{"error": "Not enough credits", "code": "NO_CREDITS"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Not enough credits (NO_CREDITS)");

        let err = reply(r#"{"error": "Bad image", "code": 17}"#).unwrap_err();
        assert_eq!(err.to_string(), "Bad image (17)");
    }

    #[test]
    fn test_search_request_shape() {
        let json = serde_json::to_value(SearchRequest {
            id_search: "abc",
            with_progress: true,
            status_only: false,
            demo: true,
        })
        .unwrap();
        assert_eq!(json["id_search"], "abc");
        assert_eq!(json["demo"], true);
        assert_eq!(json["status_only"], false);
    }

    #[test]
    fn test_token_required() {
        assert!(matches!(
            FaceCheckClient::new(FaceCheckConfig::default()),
            Err(SourceError::Config(_))
        ));
    }
}
