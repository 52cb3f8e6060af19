//! Data layer between `folio-api` and the admin CLI.
//!
//! - **[`Portfolio`]**: central facade. Reads resolve through the
//!   [`QueryCache`] (one in-flight request per key, lazy invalidation,
//!   optional placeholder fallback); mutations call the API once and fold
//!   their result into cached lists with an explicit [`CachePatch`].
//!
//! - **[`QueryCache`]**: `DashMap` of `tokio::sync::watch` channels holding
//!   [`CacheEntry`] values, exposed to callers as typed [`QuerySnapshot`]s.
//!
//! - **Forms** ([`forms`]): `validator` schemas for projects, certificates
//!   and login, plus [`TechStackInput`] for chip-style tag entry.
//!
//! - **App state**: [`SessionState`], [`ThemeState`] and [`Notifier`], owned
//!   by the `Portfolio` and handed out by reference.

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod forms;
pub mod notify;
pub mod portfolio;
pub mod session;
pub mod tech_stack;
pub mod theme;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{
    CacheData, CacheEntry, CachePatch, Cacheable, FetchStatus, KeyScope, PatchReport, QueryCache,
    QueryKey, QuerySnapshot, QueryStatus, Resource,
};
pub use config::{CacheConfig, PortfolioConfig};
pub use error::{CoreError, FieldErrors};
pub use forms::{CertificateForm, LoginForm, ProjectForm, validate_form};
pub use notify::{Level, Notification, Notifier};
pub use portfolio::{ImageFile, ImageSelection, Portfolio};
pub use session::SessionState;
pub use tech_stack::TechStackInput;
pub use theme::{Theme, ThemeState};

// Wire types consumers need alongside the facade.
pub use folio_api::{
    CancellationToken, Certificate, CertificateInput, Difficulty, ListParams, Page, Pagination,
    Project, ProjectCategory, ProjectInput, UploadedImage, User,
};
