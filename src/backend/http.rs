use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use url::Url;

use super::{BackendError, CreatePayload, ListResponse, PostsBackend, RemotePost, UpdatePayload};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn post_url(&self, id: &str) -> Result<Url, BackendError> {
        Ok(self.base.join(&format!("{}/", id))?)
    }
}

/// Turn non-2xx responses into `BackendError::Status` with the body text.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Backend returned {}: {}", status, body);
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PostsBackend for HttpBackend {
    async fn list_posts(&self) -> Result<Vec<RemotePost>, BackendError> {
        let response = self.client.get(self.base.clone()).send().await?;
        let list: ListResponse = check(response).await?.json().await?;
        Ok(list.into_posts())
    }

    async fn create_post(&self, payload: &CreatePayload) -> Result<RemotePost, BackendError> {
        let response = self
            .client
            .post(self.base.clone())
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update_post(
        &self,
        id: &str,
        payload: &UpdatePayload,
    ) -> Result<RemotePost, BackendError> {
        let response = self
            .client
            .patch(self.post_url(id)?)
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete_post(&self, id: &str) -> Result<(), BackendError> {
        let response = self.client.delete(self.post_url(id)?).send().await?;
        let response = check(response).await?;
        if response.status() != StatusCode::NO_CONTENT {
            tracing::debug!("Delete answered {}", response.status());
        }
        Ok(())
    }
}
