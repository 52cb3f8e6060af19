// Project endpoints
//
// Read endpoints are public; create/update/delete require an admin
// session cookie.

use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ListParams, Page, Project, ProjectInput};

const PROJECTS: &str = "projects";

impl ApiClient {
    /// List projects matching `params`.
    ///
    /// `GET /api/projects{?page,limit,category,featured,search,sort}`
    pub async fn list_projects(
        &self,
        params: &ListParams,
        cancel: Option<&CancellationToken>,
    ) -> Result<Page<Project>, Error> {
        let url = self.endpoint(&["api", PROJECTS], &params.query_string())?;
        debug!(?params, "listing projects");
        self.get_page(url, cancel).await
    }

    /// `GET /api/projects?featured=true`
    pub async fn featured_projects(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<Page<Project>, Error> {
        self.list_projects(&ListParams::featured(), cancel).await
    }

    /// `GET /api/projects/{id}`
    pub async fn get_project(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Project, Error> {
        let url = self.endpoint(&["api", PROJECTS, id], "")?;
        self.get_data(url, cancel).await
    }

    /// `GET /api/projects/slug/{slug}`
    pub async fn get_project_by_slug(
        &self,
        slug: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Project, Error> {
        let url = self.endpoint(&["api", PROJECTS, "slug", slug], "")?;
        self.get_data(url, cancel).await
    }

    /// `POST /api/projects`
    pub async fn create_project(
        &self,
        input: &ProjectInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Project, Error> {
        let url = self.endpoint(&["api", PROJECTS], "")?;
        debug!(slug = %input.slug, "creating project");
        self.send_json(Method::POST, url, input, cancel).await
    }

    /// `PUT /api/projects/{id}`
    pub async fn update_project(
        &self,
        id: &str,
        input: &ProjectInput,
        cancel: Option<&CancellationToken>,
    ) -> Result<Project, Error> {
        let url = self.endpoint(&["api", PROJECTS, id], "")?;
        debug!(id, "updating project");
        self.send_json(Method::PUT, url, input, cancel).await
    }

    /// `DELETE /api/projects/{id}`
    pub async fn delete_project(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), Error> {
        let url = self.endpoint(&["api", PROJECTS, id], "")?;
        debug!(id, "deleting project");
        self.send_empty(Method::DELETE, url, cancel).await
    }
}
