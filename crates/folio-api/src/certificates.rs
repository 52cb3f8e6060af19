// Certificate endpoints

use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Certificate, CertificateInput, ListParams, Page};

const CERTIFICATES: &str = "certificates";

impl ApiClient {
    /// `GET /api/certificates{?page,limit,search,sort}`
    pub async fn list_certificates(
        &self,
        params: &ListParams,
        cancel: Option<&CancellationToken>,
    ) -> Result<Page<Certificate>, Error> {
        let url = self.endpoint(&["api", CERTIFICATES], &params.query_string())?;
        debug!(?params, "listing certificates");
        self.get_page(url, cancel).await
    }

    /// `GET /api/certificates/{id}`
    pub async fn get_certificate(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Certificate, Error> {
        let url = self.endpoint(&["api", CERTIFICATES, id], "")?;
        self.get_data(url, cancel).await
    }

    /// `POST /api/certificates`
    pub async fn create_certificate(
        &self,
        input: &CertificateInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Certificate, Error> {
        let url = self.endpoint(&["api", CERTIFICATES], "")?;
        debug!(title = %input.title, "creating certificate");
        self.send_json(Method::POST, url, input, cancel).await
    }

    /// `PUT /api/certificates/{id}`
    pub async fn update_certificate(
        &self,
        id: &str,
        input: &CertificateInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Certificate, Error> {
        let url = self.endpoint(&["api", CERTIFICATES, id], "")?;
        debug!(id, "updating certificate");
        self.send_json(Method::PUT, url, input, cancel).await
    }

    /// `DELETE /api/certificates/{id}`
    pub async fn delete_certificate(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), Error> {
        let url = self.endpoint(&["api", CERTIFICATES, id], "")?;
        debug!(id, "deleting certificate");
        self.send_empty(Method::DELETE, url, cancel).await
    }
}
