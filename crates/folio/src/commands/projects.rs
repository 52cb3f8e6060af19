//! Project command handlers.

use std::path::Path;

use serde::Deserialize;
use tabled::Tabled;
use tracing::warn;

use folio_config::Config;
use folio_core::{
    Difficulty, ListParams, Portfolio, Project, ProjectCategory, ProjectForm, TechStackInput,
};

use crate::cli::{GlobalOpts, ProjectInputArgs, ProjectListArgs, ProjectsArgs, ProjectsCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Difficulty")]
    difficulty: String,
    #[tabled(rename = "Featured")]
    featured: String,
    #[tabled(rename = "Tech")]
    tech: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            slug: p.slug.clone(),
            category: p.category.to_string(),
            difficulty: p.difficulty.to_string(),
            featured: if p.featured { "★" } else { "" }.into(),
            tech: p.tech_stack.join(", "),
        }
    }
}

fn detail(p: &Project) -> String {
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Title:       {}", p.title),
        format!("Slug:        {}", p.slug),
        format!("Category:    {}", p.category),
        format!("Difficulty:  {}", p.difficulty),
        format!("Featured:    {}", p.featured),
        format!("Tech:        {}", p.tech_stack.join(", ")),
        format!("Summary:     {}", p.summary),
        format!("GitHub:      {}", util::or_dash(p.github_url.as_deref())),
        format!("Live:        {}", util::or_dash(p.live_url.as_deref())),
        format!("Thumbnail:   {}", util::or_dash(p.thumbnail.as_deref())),
    ];
    if !p.images.is_empty() {
        lines.push(format!("Images:      {}", p.images.len()));
    }
    if let Some(created) = p.created_at {
        lines.push(format!("Created:     {}", created.date_naive()));
    }
    lines.join("\n")
}

// ── Form assembly ───────────────────────────────────────────────────

/// Partial project read from `--from-file`; absent keys keep the base value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProjectFile {
    title: Option<String>,
    slug: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    category: Option<ProjectCategory>,
    difficulty: Option<Difficulty>,
    thumbnail: Option<String>,
    images: Option<Vec<String>>,
    github_url: Option<String>,
    live_url: Option<String>,
    tech_stack: Option<Vec<String>>,
    featured: Option<bool>,
}

fn apply_file(form: &mut ProjectForm, path: &Path) -> Result<(), CliError> {
    let file: ProjectFile = serde_json::from_value(util::read_json_file(path)?)?;
    overwrite(&mut form.title, file.title);
    overwrite(&mut form.slug, file.slug);
    overwrite(&mut form.summary, file.summary);
    overwrite(&mut form.description, file.description);
    overwrite(&mut form.category, file.category);
    overwrite(&mut form.difficulty, file.difficulty);
    overwrite(&mut form.thumbnail, file.thumbnail);
    overwrite(&mut form.images, file.images);
    overwrite(&mut form.github_url, file.github_url);
    overwrite(&mut form.live_url, file.live_url);
    overwrite(&mut form.tech_stack, file.tech_stack);
    overwrite(&mut form.featured, file.featured);
    Ok(())
}

fn overwrite<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Layer `--from-file` and then the individual flags over `form`.
fn build_form(
    mut form: ProjectForm,
    args: &ProjectInputArgs,
    remove_tech: &[String],
) -> Result<ProjectForm, CliError> {
    if let Some(ref path) = args.from_file {
        apply_file(&mut form, path)?;
    }

    overwrite(&mut form.title, args.title.clone());
    overwrite(&mut form.slug, args.slug.clone());
    overwrite(&mut form.summary, args.summary.clone());
    overwrite(&mut form.description, args.description.clone());
    overwrite(&mut form.category, args.category);
    overwrite(&mut form.difficulty, args.difficulty);
    overwrite(&mut form.github_url, args.github_url.clone());
    overwrite(&mut form.live_url, args.live_url.clone());
    if args.featured {
        form.featured = true;
    } else if args.not_featured {
        form.featured = false;
    }

    let mut stack = TechStackInput::from_items(&form.tech_stack);
    for tech in &args.tech {
        stack.set_input(tech.as_str());
        if !stack.add() {
            warn!(tech = %tech, "skipping empty or duplicate technology");
        }
    }
    for tech in remove_tech {
        if !stack.remove(tech) {
            warn!(tech = %tech, "technology not in stack");
        }
    }
    form.tech_stack = stack.into_items();

    Ok(form)
}

fn list_params(args: &ProjectListArgs) -> ListParams {
    ListParams {
        page: args.page,
        limit: args.limit,
        category: args.category.map(|c| c.to_string()),
        featured: args.featured.then_some(true),
        search: args.search.clone(),
        sort: args.sort.clone(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    portfolio: &Portfolio,
    args: ProjectsArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProjectsCommand::List(list) => {
            let page = util::resolve(portfolio.projects(&list_params(&list)).await, global.quiet)?;
            let out = output::render_list(
                &global.output,
                &page.items,
                |p| ProjectRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            output::pagination_footer(&global.output, page.pagination.as_ref(), global.quiet);
            Ok(())
        }

        ProjectsCommand::Featured => {
            let page = util::resolve(portfolio.featured_projects().await, global.quiet)?;
            let out = output::render_list(
                &global.output,
                &page.items,
                |p| ProjectRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Get { id, slug } => {
            let id = util::require_id(&id)?;
            let snapshot = if slug {
                portfolio.project_by_slug(id).await
            } else {
                portfolio.project(id).await
            };
            let project = util::resolve(snapshot, global.quiet)
                .map_err(|e| e.not_found_as("project", id, "projects list"))?;
            let out = output::render_single(&global.output, &*project, detail, |p| p.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Create(input) => {
            let form = build_form(ProjectForm::default(), &input, &[])?;
            let mut image = util::image_selection(input.image.as_deref())?;
            config::sign_in(portfolio, cfg).await?;

            let cancel = util::cancel_on_ctrl_c();
            let project = portfolio
                .submit_project(form, None, &mut image, &cancel)
                .await?;
            let out = output::render_single(&global.output, &project, detail, |p| p.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Update {
            id,
            input,
            remove_tech,
        } => {
            let id = util::require_id(&id)?;
            let mut image = util::image_selection(input.image.as_deref())?;
            config::sign_in(portfolio, cfg).await?;

            let existing = util::resolve_live(portfolio.project(id).await)
                .map_err(|e| e.not_found_as("project", id, "projects list"))?;
            let form = build_form(ProjectForm::from_project(&existing), &input, &remove_tech)?;

            let cancel = util::cancel_on_ctrl_c();
            let project = portfolio
                .submit_project(form, Some(id), &mut image, &cancel)
                .await?;
            let out = output::render_single(&global.output, &project, detail, |p| p.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Delete { id } => {
            let id = util::require_id(&id)?;
            if !util::confirm(&format!("Delete project {id}?"), global.yes)? {
                return Ok(());
            }
            config::sign_in(portfolio, cfg).await?;
            portfolio
                .delete_project(id, None)
                .await
                .map_err(|e| CliError::from(e).not_found_as("project", id, "projects list"))?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn args() -> ProjectInputArgs {
        ProjectInputArgs {
            from_file: None,
            title: None,
            slug: None,
            summary: None,
            description: None,
            category: None,
            difficulty: None,
            tech: Vec::new(),
            github_url: None,
            live_url: None,
            featured: false,
            not_featured: false,
            image: None,
        }
    }

    #[test]
    fn flags_override_base_values() {
        let base = ProjectForm {
            title: "Old title".into(),
            featured: true,
            ..ProjectForm::default()
        };
        let input = ProjectInputArgs {
            title: Some("New title".into()),
            category: Some(ProjectCategory::ThreeD),
            not_featured: true,
            ..args()
        };

        let form = build_form(base, &input, &[]).unwrap();
        assert_eq!(form.title, "New title");
        assert_eq!(form.category, ProjectCategory::ThreeD);
        assert!(!form.featured);
    }

    #[test]
    fn tech_flags_go_through_chip_input() {
        let base = ProjectForm {
            tech_stack: vec!["React".into(), "Node.js".into()],
            ..ProjectForm::default()
        };
        let input = ProjectInputArgs {
            tech: vec!["React".into(), " Rust ".into(), "  ".into()],
            ..args()
        };

        let form = build_form(base, &input, &["Node.js".into()]).unwrap();
        assert_eq!(form.tech_stack, vec!["React".to_owned(), "Rust".to_owned()]);
    }

    #[test]
    fn file_fills_fields_and_flags_win() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"title": "From file", "slug": "from-file", "techStack": ["Go"], "githubUrl": "https://github.com/x/y"}}"#
        )
        .unwrap();
        let input = ProjectInputArgs {
            from_file: Some(file.path().to_path_buf()),
            slug: Some("from-flag".into()),
            ..args()
        };

        let form = build_form(ProjectForm::default(), &input, &[]).unwrap();
        assert_eq!(form.title, "From file");
        assert_eq!(form.slug, "from-flag");
        assert_eq!(form.tech_stack, vec!["Go".to_owned()]);
        assert_eq!(form.github_url, "https://github.com/x/y");
    }

    #[test]
    fn list_flags_become_query_params() {
        let params = list_params(&ProjectListArgs {
            page: Some(2),
            limit: None,
            category: Some(ProjectCategory::Embedded),
            featured: true,
            search: Some("rust".into()),
            sort: None,
        });
        assert_eq!(
            params.query_string(),
            "?page=2&category=embedded&featured=true&search=rust"
        );
    }
}
