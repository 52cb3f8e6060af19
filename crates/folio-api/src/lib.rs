// folio-api: Async Rust client for the portfolio content API

pub mod auth;
pub mod certificates;
pub mod client;
pub mod error;
pub mod models;
pub mod projects;
pub mod query;
pub mod transport;
pub mod upload;

pub use client::{ApiClient, RequestBody};
pub use error::Error;
pub use models::{
    Certificate, CertificateInput, Difficulty, Envelope, Identified, ListParams, LoginRequest,
    Page, Pagination, Project, ProjectCategory, ProjectInput, UploadedImage, User,
};
pub use query::{QueryParams, create_query_string};
pub use transport::TransportConfig;
pub use tokio_util::sync::CancellationToken;
