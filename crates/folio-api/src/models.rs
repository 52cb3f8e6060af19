// Wire types for the portfolio content API.
//
// Field names follow the server's camelCase JSON; identity is `_id`.
// Every response is wrapped in the `{ success, data, message, errors }`
// envelope, with `pagination` added on list endpoints.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::query::{QueryParams, create_query_string};

// ── Envelope ────────────────────────────────────────────────────────

/// Uniform response wrapper used by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            errors: None,
            pagination: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

/// A list payload together with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Option<Pagination>) -> Self {
        Self { items, pagination }
    }

    /// Total number of records on the server, falling back to the
    /// number of items held when no pagination was reported.
    pub fn total(&self) -> u64 {
        self.pagination
            .map_or(self.items.len() as u64, |p| p.total)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ── Identity ────────────────────────────────────────────────────────

/// Records addressable by a server-assigned `_id`.
pub trait Identified {
    fn id(&self) -> &str;
}

// ── Projects ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProjectCategory {
    Web,
    Embedded,
    Software,
    #[serde(rename = "3d")]
    #[strum(serialize = "3d")]
    ThreeD,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Intermediate,
    Hard,
    Professional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub category: ProjectCategory,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update body for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub description: String,
    pub category: ProjectCategory,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

// ── Certificates ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub date_issued: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Certificate {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update body for a certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInput {
    pub title: String,
    pub issuer: String,
    pub date_issued: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
}

/// Login body. The password is only exposed while serializing the request.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

// ── Uploads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

// ── List parameters ─────────────────────────────────────────────────

/// Filters and paging accepted by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn featured() -> Self {
        Self {
            featured: Some(true),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push_opt("page", self.page)
            .push_opt("limit", self.limit)
            .push_opt("category", self.category.as_deref())
            .push_opt("featured", self.featured)
            .push_opt("search", self.search.as_deref().filter(|s| !s.is_empty()))
            .push_opt("sort", self.sort.as_deref())
    }

    /// Rendered `?k=v` suffix; also the canonical form used in cache keys.
    pub fn query_string(&self) -> String {
        create_query_string(&self.to_query())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_uses_wire_field_names() {
        let project: Project = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Rover",
            "slug": "rover",
            "summary": "A small robot",
            "description": "Line following robot",
            "category": "3d",
            "difficulty": "hard",
            "githubUrl": "https://github.com/x/rover",
            "techStack": ["C", "KiCad"],
            "featured": true,
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(project.id(), "p1");
        assert_eq!(project.category, ProjectCategory::ThreeD);
        assert_eq!(project.difficulty, Difficulty::Hard);
        assert_eq!(project.tech_stack, vec!["C", "KiCad"]);
        assert!(project.images.is_empty());
        assert!(project.live_url.is_none());

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["_id"], "p1");
        assert_eq!(back["githubUrl"], "https://github.com/x/rover");
        assert!(back.get("liveUrl").is_none());
    }

    #[test]
    fn category_parses_from_cli_strings() {
        assert_eq!("3d".parse::<ProjectCategory>().unwrap(), ProjectCategory::ThreeD);
        assert_eq!("Web".parse::<ProjectCategory>().unwrap(), ProjectCategory::Web);
        assert_eq!(ProjectCategory::ThreeD.to_string(), "3d");
        assert!("mobile".parse::<ProjectCategory>().is_err());
    }

    #[test]
    fn user_accepts_mongo_style_id() {
        let user: User = serde_json::from_value(json!({ "_id": "u1", "username": "admin" })).unwrap();
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn page_total_falls_back_to_len() {
        let page = Page::new(vec![1, 2, 3], None);
        assert_eq!(page.total(), 3);
        let page = Page::new(
            vec![1],
            Some(Pagination {
                total: 40,
                ..Pagination::default()
            }),
        );
        assert_eq!(page.total(), 40);
    }

    #[test]
    fn list_params_render_in_fixed_order() {
        let params = ListParams {
            limit: Some(6),
            featured: Some(true),
            search: Some(String::new()),
            ..ListParams::default()
        };
        assert_eq!(params.query_string(), "?limit=6&featured=true");
        assert_eq!(ListParams::default().query_string(), "");
    }
}
