//! HTTP access to session snapshots.

use reqwest::Url;
use sharepad_server::infrastructure::dto::http::{
    SaveSnapshotRequest, SavedSnapshotDto, SnapshotTextDto,
};

use crate::error::ClientError;

/// Client for `GET /session/{id}` and `POST /session/{id}/save`
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    base_url: String,
}

impl SnapshotClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Load the text of a session (empty for a new session)
    pub async fn load(&self, session_id: &str) -> Result<String, ClientError> {
        let url = self.session_url(session_id, None)?;
        let snapshot: SnapshotTextDto = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;
        Ok(snapshot.text)
    }

    pub async fn save(&self, session_id: &str, text: String) -> Result<SavedSnapshotDto, ClientError> {
        let url = self.session_url(session_id, Some("save"))?;
        self.http
            .post(url)
            .json(&SaveSnapshotRequest { text })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)
    }

    /// `{base}/session/{id}[/suffix]` with the session id percent-encoded
    fn session_url(&self, session_id: &str, suffix: Option<&str>) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::SnapshotRequest(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::SnapshotRequest(format!("'{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .push("session")
            .push(session_id)
            .extend(suffix);
        Ok(url)
    }
}

fn request_error(error: reqwest::Error) -> ClientError {
    ClientError::SnapshotRequest(error.to_string())
}
