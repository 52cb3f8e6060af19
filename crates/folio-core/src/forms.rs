// ── Admin form schemas ──
//
// Each form is a `validator` schema. `validate_form` turns violations into a
// field -> messages map that can be shown next to the offending inputs;
// submission is refused while the map is non-empty.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use folio_api::{
    Certificate, CertificateInput, Difficulty, LoginRequest, Project, ProjectCategory,
    ProjectInput,
};
use secrecy::SecretString;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::FieldErrors;

// ── Schemas ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProjectForm {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(
        length(min = 3, message = "Slug must be at least 3 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: String,
    #[validate(length(min = 10, message = "Summary must be at least 10 characters"))]
    pub summary: String,
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,
    pub category: ProjectCategory,
    pub difficulty: Difficulty,
    #[validate(custom(function = "validate_optional_url"))]
    pub thumbnail: String,
    pub images: Vec<String>,
    #[validate(custom(function = "validate_optional_url"))]
    pub github_url: String,
    #[validate(custom(function = "validate_optional_url"))]
    pub live_url: String,
    #[validate(length(min = 1, message = "Add at least one technology"))]
    pub tech_stack: Vec<String>,
    pub featured: bool,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            summary: String::new(),
            description: String::new(),
            category: ProjectCategory::Web,
            difficulty: Difficulty::Intermediate,
            thumbnail: String::new(),
            images: Vec::new(),
            github_url: String::new(),
            live_url: String::new(),
            tech_stack: Vec::new(),
            featured: false,
        }
    }
}

impl ProjectForm {
    /// Pre-fill the form for editing an existing project.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            slug: project.slug.clone(),
            summary: project.summary.clone(),
            description: project.description.clone(),
            category: project.category,
            difficulty: project.difficulty,
            thumbnail: project.thumbnail.clone().unwrap_or_default(),
            images: project.images.clone(),
            github_url: project.github_url.clone().unwrap_or_default(),
            live_url: project.live_url.clone().unwrap_or_default(),
            tech_stack: project.tech_stack.clone(),
            featured: project.featured,
        }
    }

    pub fn into_input(self) -> ProjectInput {
        ProjectInput {
            title: self.title.trim().to_owned(),
            slug: self.slug.trim().to_owned(),
            summary: self.summary.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: self.category,
            difficulty: self.difficulty,
            thumbnail: non_empty(self.thumbnail),
            images: self.images,
            github_url: non_empty(self.github_url),
            live_url: non_empty(self.live_url),
            tech_stack: self.tech_stack,
            featured: self.featured,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CertificateForm {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 2, message = "Issuer must be at least 2 characters"))]
    pub issuer: String,
    #[validate(
        length(min = 1, message = "Date issued is required"),
        custom(function = "validate_date")
    )]
    pub date_issued: String,
    pub credential_id: String,
    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: String,
}

impl CertificateForm {
    pub fn from_certificate(certificate: &Certificate) -> Self {
        Self {
            title: certificate.title.clone(),
            issuer: certificate.issuer.clone(),
            date_issued: certificate.date_issued.clone(),
            credential_id: certificate.credential_id.clone().unwrap_or_default(),
            image_url: certificate.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn into_input(self) -> CertificateInput {
        CertificateInput {
            title: self.title.trim().to_owned(),
            issuer: self.issuer.trim().to_owned(),
            date_issued: self.date_issued.trim().to_owned(),
            credential_id: non_empty(self.credential_id),
            image_url: non_empty(self.image_url),
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Validate)]
pub struct LoginForm {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn into_request(self) -> LoginRequest {
        LoginRequest {
            username: self.username.trim().to_owned(),
            password: SecretString::from(self.password),
        }
    }
}

// ── Validation entry point ──────────────────────────────────────────

/// Run a form's schema, collecting human-readable messages per field.
pub fn validate_form(form: &impl Validate) -> Result<(), FieldErrors> {
    form.validate().map_err(|errors| field_errors(&errors))
}

fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, violations)| {
            let messages = violations.iter().map(|v| describe(field, v)).collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Custom message when the schema gave one, else one derived from the rule.
fn describe(field: &str, violation: &ValidationError) -> String {
    if let Some(message) = &violation.message {
        return message.to_string();
    }
    match &*violation.code {
        "length" => match violation.params.get("min") {
            Some(min) => format!("{field} must be at least {min} characters"),
            None => format!("{field} has an invalid length"),
        },
        _ => format!("{field} is invalid"),
    }
}

// ── Custom rules ────────────────────────────────────────────────────

fn new_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Lowercase alphanumeric words joined by single hyphens.
fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && slug
            .split('-')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    if well_formed {
        Ok(())
    } else {
        Err(new_validation_error(
            "slug",
            "Slug may only contain lowercase letters, numbers and single hyphens",
        ))
    }
}

/// Empty is allowed; anything else must be an absolute http(s) URL.
fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(new_validation_error("url", "Must be a valid URL")),
    }
}

/// `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn validate_date(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
    {
        Ok(())
    } else {
        Err(new_validation_error("date", "Date must look like 2024-01-31"))
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
