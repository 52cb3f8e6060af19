// Admin mutations. Each call makes exactly one request; on success the
// result is folded into cached lists with an explicit patch strategy and a
// success notification is pushed. Failures are reported, never patched.

use folio_api::{
    Certificate, CertificateInput, Identified, Page, Project, ProjectInput, UploadedImage,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Portfolio;
use super::submit::ImageFile;
use crate::cache::{CachePatch, Cacheable, Resource};
use crate::error::CoreError;

impl Portfolio {
    // ── Projects ─────────────────────────────────────────────────────

    pub async fn create_project(
        &self,
        input: &ProjectInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Project, CoreError> {
        let result = self.inner.api.create_project(input, cancel).await;
        self.settle(
            Resource::Projects,
            result,
            cancel,
            ("create project", "Project created"),
            |project| CachePatch::InsertAtHead(project.clone()),
        )
    }

    pub async fn update_project(
        &self,
        id: &str,
        input: &ProjectInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Project, CoreError> {
        let result = self.inner.api.update_project(id, input, cancel).await;
        self.settle(
            Resource::Projects,
            result,
            cancel,
            ("update project", "Project updated"),
            |project| CachePatch::ReplaceById(project.clone()),
        )
    }

    pub async fn delete_project(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), CoreError> {
        let result = self.inner.api.delete_project(id, cancel).await;
        self.settle(
            Resource::Projects,
            result,
            cancel,
            ("delete project", "Project deleted"),
            |_| CachePatch::<Project>::RemoveById(id.to_owned()),
        )
    }

    // ── Certificates ─────────────────────────────────────────────────

    pub async fn create_certificate(
        &self,
        input: &CertificateInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Certificate, CoreError> {
        let result = self.inner.api.create_certificate(input, cancel).await;
        self.settle(
            Resource::Certificates,
            result,
            cancel,
            ("create certificate", "Certificate created"),
            |cert| CachePatch::InsertAtHead(cert.clone()),
        )
    }

    pub async fn update_certificate(
        &self,
        id: &str,
        input: &CertificateInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Certificate, CoreError> {
        let result = self.inner.api.update_certificate(id, input, cancel).await;
        self.settle(
            Resource::Certificates,
            result,
            cancel,
            ("update certificate", "Certificate updated"),
            |cert| CachePatch::ReplaceById(cert.clone()),
        )
    }

    pub async fn delete_certificate(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), CoreError> {
        let result = self.inner.api.delete_certificate(id, cancel).await;
        self.settle(
            Resource::Certificates,
            result,
            cancel,
            ("delete certificate", "Certificate deleted"),
            |_| CachePatch::<Certificate>::RemoveById(id.to_owned()),
        )
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Upload an image. Failures are reported like any other mutation;
    /// success is silent since it is normally one step of a submit.
    pub async fn upload_image(
        &self,
        file: ImageFile,
        cancel: Option<&CancellationToken>,
    ) -> Result<UploadedImage, CoreError> {
        let ImageFile {
            bytes,
            file_name,
            mime,
        } = file;
        let result = self
            .inner
            .api
            .upload_image(bytes, &file_name, &mime, cancel)
            .await
            .map_err(CoreError::from);
        match result {
            Ok(uploaded) if !is_cancelled(cancel) => Ok(uploaded),
            Ok(_) => Err(CoreError::Cancelled),
            Err(e) => Err(self.report_failure("upload image", e)),
        }
    }

    pub async fn delete_image(
        &self,
        public_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_image(public_id, cancel)
            .await
            .map_err(|e| self.report_failure("delete image", CoreError::from(e)))
    }

    // ── Settlement ───────────────────────────────────────────────────

    /// Apply a mutation outcome to the cache and notify.
    ///
    /// A token cancelled before settlement discards even a successful
    /// response. When the server may have committed the write without us
    /// seeing a verdict, the resource is invalidated instead of patched.
    fn settle<T, R>(
        &self,
        resource: Resource,
        result: Result<T, folio_api::Error>,
        cancel: Option<&CancellationToken>,
        (action, success): (&str, &str),
        patch: impl FnOnce(&T) -> CachePatch<R>,
    ) -> Result<T, CoreError>
    where
        R: Identified + Clone,
        Page<R>: Cacheable,
    {
        let value = match result {
            Ok(value) => value,
            Err(e) => {
                let error = CoreError::from(e);
                if outcome_unknown(&error) {
                    let count = self.inner.cache.invalidate_resource(resource);
                    debug!(%resource, count, error = %error, "mutation outcome unknown; invalidated");
                }
                return Err(self.report_failure(action, error));
            }
        };
        if is_cancelled(cancel) {
            self.inner.cache.invalidate_resource(resource);
            return Err(CoreError::Cancelled);
        }

        let patch = patch(&value);
        let report = self.inner.cache.patch(resource, &patch);
        info!(
            %resource,
            id = patch.target_id(),
            patched = report.patched,
            "{success}"
        );
        self.inner.notifier.success(success);
        Ok(value)
    }

    /// Notify about a failed mutation unless it was cancelled.
    pub(super) fn report_failure(&self, action: &str, error: CoreError) -> CoreError {
        if !error.is_cancelled() {
            warn!(action, status = error.status(), error = %error, "mutation failed");
            self.inner.notifier.error(error.to_string());
        }
        error
    }
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(CancellationToken::is_cancelled)
}

/// Failures after which the write may still have reached the server.
fn outcome_unknown(error: &CoreError) -> bool {
    match error {
        CoreError::Cancelled | CoreError::Timeout | CoreError::Internal(_) => true,
        CoreError::Api { status, .. } => *status == 0,
        _ => false,
    }
}
