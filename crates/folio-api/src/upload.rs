// Image upload endpoints
//
// Uploads are multipart with a single `image` field; the JSON content type
// is deliberately not set so reqwest can write the multipart boundary.

use bytes::Bytes;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{ApiClient, RequestBody};
use crate::error::Error;
use crate::models::{Envelope, UploadedImage};

/// Multipart field name expected by the upload endpoint.
pub const IMAGE_FIELD: &str = "image";

impl ApiClient {
    /// Upload an image and return its hosted URL.
    ///
    /// `POST /api/upload/image` as `multipart/form-data`.
    pub async fn upload_image(
        &self,
        bytes: impl Into<Bytes>,
        file_name: &str,
        mime: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<UploadedImage, Error> {
        let url = self.endpoint(&["api", "upload", "image"], "")?;
        let bytes: Bytes = bytes.into();
        debug!(file_name, mime, size = bytes.len(), "uploading image");

        let part = Part::bytes(Vec::from(bytes))
            .file_name(file_name.to_owned())
            .mime_str(mime)
            .map_err(|e| Error::Multipart(e.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let envelope: Envelope<UploadedImage> = self
            .send(Method::POST, url, RequestBody::Multipart(form), cancel)
            .await?;
        envelope.data.ok_or_else(|| Error::Deserialization {
            message: "upload response carried no data".into(),
            body: envelope.message.unwrap_or_default(),
        })
    }

    /// `DELETE /api/upload/image/{public_id}`
    pub async fn delete_image(
        &self,
        public_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), Error> {
        let url = self.endpoint(&["api", "upload", "image", public_id], "")?;
        debug!(public_id, "deleting uploaded image");
        self.send_empty(Method::DELETE, url, cancel).await
    }
}
