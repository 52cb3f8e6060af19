// ── Form submission flows ──
//
// validate -> optional image upload -> create or update. A cancellation
// token spans the whole flow; once it fires nothing further is sent or
// cached and the flow resolves to `CoreError::Cancelled` without a
// notification.

use bytes::Bytes;
use folio_api::{Certificate, Project};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Portfolio;
use crate::error::CoreError;
use crate::forms::{CertificateForm, ProjectForm, validate_form};

/// An image chosen for upload, with its sniffed MIME type.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub bytes: Bytes,
    pub file_name: String,
    pub mime: String,
}

impl ImageFile {
    /// Accept `bytes` only when their signature is a known image format.
    pub fn new(bytes: impl Into<Bytes>, file_name: impl Into<String>) -> Result<Self, CoreError> {
        let bytes = bytes.into();
        let file_name = file_name.into();
        match infer::get(&bytes) {
            Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(Self {
                bytes,
                file_name,
                mime: kind.mime_type().to_owned(),
            }),
            Some(kind) => Err(CoreError::validation(
                "image",
                format!("{file_name} is {}, not an image", kind.mime_type()),
            )),
            None => Err(CoreError::validation(
                "image",
                format!("{file_name} is not a recognized image"),
            )),
        }
    }
}

/// The transient file pick owned by a form. Submitting always empties it.
#[derive(Debug, Clone, Default)]
pub struct ImageSelection {
    file: Option<ImageFile>,
}

impl ImageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, file: ImageFile) {
        self.file = Some(file);
    }

    pub fn is_selected(&self) -> bool {
        self.file.is_some()
    }

    pub fn take(&mut self) -> Option<ImageFile> {
        self.file.take()
    }
}

impl From<ImageFile> for ImageSelection {
    fn from(file: ImageFile) -> Self {
        Self { file: Some(file) }
    }
}

impl Portfolio {
    /// Create (`editing = None`) or update a project from its form.
    ///
    /// An uploaded image becomes the thumbnail and is added to `images`.
    pub async fn submit_project(
        &self,
        form: ProjectForm,
        editing: Option<&str>,
        image: &mut ImageSelection,
        cancel: &CancellationToken,
    ) -> Result<Project, CoreError> {
        let file = image.take();
        validate_form(&form).map_err(|errors| CoreError::Validation { errors })?;

        let mut form = form;
        if let Some(file) = file {
            let uploaded = self.upload_image(file, Some(cancel)).await?;
            debug!(url = %uploaded.url, "project image uploaded");
            if !form.images.contains(&uploaded.url) {
                form.images.push(uploaded.url.clone());
            }
            form.thumbnail = uploaded.url;
        }
        ensure_live(cancel)?;

        let input = form.into_input();
        match editing {
            Some(id) => self.update_project(id, &input, Some(cancel)).await,
            None => self.create_project(&input, Some(cancel)).await,
        }
    }

    /// Create or update a certificate; an uploaded image becomes `image_url`.
    pub async fn submit_certificate(
        &self,
        form: CertificateForm,
        editing: Option<&str>,
        image: &mut ImageSelection,
        cancel: &CancellationToken,
    ) -> Result<Certificate, CoreError> {
        let file = image.take();
        validate_form(&form).map_err(|errors| CoreError::Validation { errors })?;

        let mut form = form;
        if let Some(file) = file {
            let uploaded = self.upload_image(file, Some(cancel)).await?;
            debug!(url = %uploaded.url, "certificate image uploaded");
            form.image_url = uploaded.url;
        }
        ensure_live(cancel)?;

        let input = form.into_input();
        match editing {
            Some(id) => self.update_certificate(id, &input, Some(cancel)).await,
            None => self.create_certificate(&input, Some(cancel)).await,
        }
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), CoreError> {
    if cancel.is_cancelled() {
        Err(CoreError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn png_is_accepted_with_sniffed_mime() {
        let file = ImageFile::new(PNG_HEADER.to_vec(), "shot.png").unwrap();
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.file_name, "shot.png");
    }

    #[test]
    fn non_images_are_validation_errors() {
        let err = ImageFile::new(b"%PDF-1.7 rest".to_vec(), "cv.pdf").unwrap_err();
        let CoreError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        assert!(errors["image"][0].contains("application/pdf"));

        assert!(ImageFile::new(b"plain text".to_vec(), "a.txt").is_err());
    }

    #[test]
    fn take_empties_selection() {
        let mut selection = ImageSelection::from(ImageFile::new(PNG_HEADER.to_vec(), "a.png").unwrap());
        assert!(selection.is_selected());
        assert!(selection.take().is_some());
        assert!(!selection.is_selected());
    }
}
