// Built-in placeholder content served when the API cannot be reached.

use std::sync::{Arc, LazyLock};

use folio_api::{
    Certificate, Difficulty, ListParams, Page, Pagination, Project, ProjectCategory,
};

static PROJECTS: LazyLock<Vec<Project>> = LazyLock::new(|| {
    vec![
        project(
            "placeholder-1",
            "Portfolio Website",
            "portfolio-website",
            "Personal site with an admin panel for projects and certificates.",
            ProjectCategory::Web,
            Difficulty::Intermediate,
            &["TypeScript", "React", "Node.js"],
            true,
        ),
        project(
            "placeholder-2",
            "Weather Station",
            "weather-station",
            "Battery powered sensor node reporting over MQTT.",
            ProjectCategory::Embedded,
            Difficulty::Hard,
            &["C", "ESP-IDF", "MQTT"],
            true,
        ),
        project(
            "placeholder-3",
            "Task Scheduler",
            "task-scheduler",
            "Command-line job runner with cron expressions and retries.",
            ProjectCategory::Software,
            Difficulty::Intermediate,
            &["Rust", "SQLite"],
            false,
        ),
        project(
            "placeholder-4",
            "Desk Organizer",
            "desk-organizer",
            "Parametric printable organizer modelled for FDM printers.",
            ProjectCategory::ThreeD,
            Difficulty::Easy,
            &["Fusion 360"],
            false,
        ),
    ]
});

static CERTIFICATES: LazyLock<Vec<Certificate>> = LazyLock::new(|| {
    vec![
        certificate("placeholder-cert-1", "Cloud Practitioner", "Amazon Web Services", "2023-03-15"),
        certificate("placeholder-cert-2", "Embedded Systems Essentials", "Coursera", "2022-09-01"),
    ]
});

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    title: &str,
    slug: &str,
    summary: &str,
    category: ProjectCategory,
    difficulty: Difficulty,
    tech: &[&str],
    featured: bool,
) -> Project {
    Project {
        id: id.into(),
        title: title.into(),
        slug: slug.into(),
        summary: summary.into(),
        description: summary.into(),
        category,
        difficulty,
        thumbnail: None,
        images: Vec::new(),
        github_url: None,
        live_url: None,
        tech_stack: tech.iter().map(|t| (*t).to_owned()).collect(),
        featured,
        created_at: None,
        updated_at: None,
    }
}

fn certificate(id: &str, title: &str, issuer: &str, date_issued: &str) -> Certificate {
    Certificate {
        id: id.into(),
        title: title.into(),
        issuer: issuer.into(),
        date_issued: date_issued.into(),
        credential_id: None,
        image_url: None,
        created_at: None,
        updated_at: None,
    }
}

fn paged<T: Clone>(items: Vec<T>, params: &ListParams) -> Page<T> {
    let total = items.len() as u64;
    let limit = params.limit.map_or(total.max(1), u64::from);
    let page = params.page.map_or(1, u64::from).max(1);
    let skip = usize::try_from((page - 1) * limit).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    Page::new(
        items.into_iter().skip(skip).take(take).collect(),
        Some(Pagination {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }),
    )
}

/// Placeholder projects, filtered by category/featured/search and paged.
pub fn projects(params: &ListParams) -> Arc<Page<Project>> {
    let search = params
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());
    let items = PROJECTS
        .iter()
        .filter(|p| {
            params
                .category
                .as_deref()
                .is_none_or(|c| p.category.to_string().eq_ignore_ascii_case(c))
        })
        .filter(|p| params.featured.is_none_or(|f| p.featured == f))
        .filter(|p| {
            search
                .as_deref()
                .is_none_or(|s| p.title.to_lowercase().contains(s) || p.summary.to_lowercase().contains(s))
        })
        .cloned()
        .collect();
    Arc::new(paged(items, params))
}

pub fn featured_projects() -> Arc<Page<Project>> {
    projects(&ListParams::featured())
}

pub fn project_by_id(id: &str) -> Option<Arc<Project>> {
    PROJECTS.iter().find(|p| p.id == id).cloned().map(Arc::new)
}

pub fn project_by_slug(slug: &str) -> Option<Arc<Project>> {
    PROJECTS.iter().find(|p| p.slug == slug).cloned().map(Arc::new)
}

pub fn certificates(params: &ListParams) -> Arc<Page<Certificate>> {
    Arc::new(paged(CERTIFICATES.clone(), params))
}

pub fn certificate_by_id(id: &str) -> Option<Arc<Certificate>> {
    CERTIFICATES.iter().find(|c| c.id == id).cloned().map(Arc::new)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn featured_filter_applies() {
        let page = featured_projects();
        assert!(!page.is_empty());
        assert!(page.items.iter().all(|p| p.featured));
    }

    #[test]
    fn category_and_search_filter() {
        let params = ListParams {
            category: Some("3d".into()),
            ..ListParams::default()
        };
        assert_eq!(projects(&params).items[0].slug, "desk-organizer");

        let params = ListParams {
            search: Some("MQTT".into()),
            ..ListParams::default()
        };
        assert_eq!(projects(&params).len(), 1);
    }

    #[test]
    fn paging_reports_totals() {
        let params = ListParams {
            page: Some(2),
            limit: Some(3),
            ..ListParams::default()
        };
        let page = projects(&params);
        assert_eq!(page.len(), 1);
        let meta = page.pagination.unwrap();
        assert_eq!(meta.total, 4);
        assert_eq!(meta.pages, 2);
    }

    #[test]
    fn lookups_by_identity() {
        assert!(project_by_slug("weather-station").is_some());
        assert!(project_by_id("nope").is_none());
        assert_eq!(certificate_by_id("placeholder-cert-2").unwrap().issuer, "Coursera");
    }
}
