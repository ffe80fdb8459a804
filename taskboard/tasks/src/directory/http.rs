use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use super::{UserDirectory, UserLookupError};

/// Looks users up with `GET {base_url}/users/{id}` on the users service.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpUserDirectory {
    /// Creates a directory for the users service at `base_url`.
    ///
    /// Every lookup is bounded by `timeout`. A trailing `/` on the URL is ignored.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, user_id: u32) -> String {
        format!("{}/users/{}", self.base_url, user_id)
    }

    fn classify(&self, err: reqwest::Error) -> UserLookupError {
        if err.is_timeout() {
            UserLookupError::Timeout(self.timeout)
        } else {
            UserLookupError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    #[tracing::instrument(skip(self))]
    async fn verify_user(&self, user_id: u32) -> Result<(), UserLookupError> {
        let response = self
            .client
            .get(self.user_url(user_id))
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(UserLookupError::NotFound(user_id)),
            status => Err(UserLookupError::UnexpectedStatus(status.as_u16())),
        }
    }
}
