//! Client-side core of the QR management page: the REST surface it consumes,
//! the all-or-nothing fan-out primitive, and the page controller.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{QrCodeId, UserId},
    protocol::{QrCodeSummary, QrCodeUpsert, UserSummary},
};

pub mod controller;
pub mod join;
pub mod page;

pub use controller::{Navigation, PageController};
pub use join::join_all_ordered;
pub use page::{
    ElementRole, PageDocument, PageElements, PageInitError, PageState, QrListEntry,
};

/// The backend REST surface the page consumes. Treated as a black box: any
/// transport failure, error status, or undecodable body is a single
/// undifferentiated error.
#[async_trait]
pub trait QrApi: Send + Sync {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<QrCodeSummary>>;
    async fn fetch(&self, id: QrCodeId) -> Result<QrCodeSummary>;
    async fn create(&self, form: &QrCodeUpsert) -> Result<()>;
    async fn update(&self, id: QrCodeId, form: &QrCodeUpsert) -> Result<()>;
    async fn delete(&self, id: QrCodeId) -> Result<()>;
    async fn list_users(&self) -> Result<Vec<UserSummary>>;
}

pub struct HttpQrApi {
    http: Client,
    server_url: String,
}

impl HttpQrApi {
    pub fn new(server_url: impl Into<String>) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self {
            http: Client::new(),
            server_url,
        }
    }
}

#[async_trait]
impl QrApi for HttpQrApi {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<QrCodeSummary>> {
        let res = self
            .http
            .get(format!("{}/api/qrcodes/user/{}", self.server_url, user_id))
            .send()
            .await?
            .error_for_status()?;
        let body: Vec<QrCodeSummary> = res.json().await?;
        Ok(body)
    }

    async fn fetch(&self, id: QrCodeId) -> Result<QrCodeSummary> {
        let res = self
            .http
            .get(format!("{}/api/qrcodes/{}", self.server_url, id))
            .send()
            .await?
            .error_for_status()?;
        let body: QrCodeSummary = res.json().await?;
        Ok(body)
    }

    async fn create(&self, form: &QrCodeUpsert) -> Result<()> {
        self.http
            .post(format!("{}/api/qrcodes", self.server_url))
            .json(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, id: QrCodeId, form: &QrCodeUpsert) -> Result<()> {
        self.http
            .put(format!("{}/api/qrcodes/{}", self.server_url, id))
            .json(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: QrCodeId) -> Result<()> {
        self.http
            .delete(format!("{}/api/qrcodes/{}", self.server_url, id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let res = self
            .http
            .get(format!("{}/api/users", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        let body: Vec<UserSummary> = res.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
