//! Clap derive structures for the `folio` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_core::{Difficulty, ProjectCategory, Theme};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// folio -- admin CLI for a portfolio content API
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Manage portfolio projects and certificates from the command line",
    long_about = "Administer the projects, certificates and images served by a\n\
        portfolio content API. Reads are cached per invocation and fall back\n\
        to built-in placeholder content when the API is unreachable.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API origin (overrides config)
    #[arg(long, short = 'u', env = "FOLIO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FOLIO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "FOLIO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Fail instead of showing placeholder content when the API is down
    #[arg(long, global = true)]
    pub no_fallback: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage portfolio projects
    #[command(alias = "p")]
    Projects(ProjectsArgs),

    /// Manage certificates
    #[command(alias = "certs")]
    Certificates(CertificatesArgs),

    /// Sign in, sign out, and inspect the admin session
    Auth(AuthArgs),

    /// Upload or delete images
    Upload(UploadArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROJECTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects
    #[command(alias = "ls")]
    List(ProjectListArgs),

    /// List featured projects
    Featured,

    /// Get a project by ID (or slug with --slug)
    Get {
        /// Project ID, or slug when --slug is given
        id: String,

        /// Look the project up by slug
        #[arg(long)]
        slug: bool,
    },

    /// Create a project
    Create(ProjectInputArgs),

    /// Update a project
    Update {
        /// Project ID
        id: String,

        #[command(flatten)]
        input: ProjectInputArgs,

        /// Remove a technology from the stack (repeatable)
        #[arg(long = "remove-tech", value_name = "TECH")]
        remove_tech: Vec<String>,
    },

    /// Delete a project
    #[command(alias = "rm")]
    Delete {
        /// Project ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ProjectListArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Filter by category (web, embedded, software, 3d)
    #[arg(long, short = 'c')]
    pub category: Option<ProjectCategory>,

    /// Only featured projects
    #[arg(long)]
    pub featured: bool,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort expression passed through to the API (e.g. "-createdAt")
    #[arg(long)]
    pub sort: Option<String>,
}

/// Project fields shared by create and update. Flags override `--from-file`.
#[derive(Debug, Args)]
pub struct ProjectInputArgs {
    /// Read the project from a JSON file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    /// URL slug (lowercase letters, digits and hyphens)
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// web, embedded, software or 3d
    #[arg(long)]
    pub category: Option<ProjectCategory>,

    /// easy, intermediate, hard or professional
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Technology label (repeatable)
    #[arg(long = "tech", value_name = "TECH")]
    pub tech: Vec<String>,

    #[arg(long)]
    pub github_url: Option<String>,

    #[arg(long)]
    pub live_url: Option<String>,

    /// Mark as featured
    #[arg(long, conflicts_with = "not_featured")]
    pub featured: bool,

    /// Clear the featured flag
    #[arg(long)]
    pub not_featured: bool,

    /// Image file to upload and use as the thumbnail
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CERTIFICATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CertificatesArgs {
    #[command(subcommand)]
    pub command: CertificatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CertificatesCommand {
    /// List certificates
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long, short = 'l')]
        limit: Option<u32>,
    },

    /// Get a certificate by ID
    Get {
        /// Certificate ID
        id: String,
    },

    /// Create a certificate
    Create(CertificateInputArgs),

    /// Update a certificate
    Update {
        /// Certificate ID
        id: String,

        #[command(flatten)]
        input: CertificateInputArgs,
    },

    /// Delete a certificate
    #[command(alias = "rm")]
    Delete {
        /// Certificate ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CertificateInputArgs {
    /// Read the certificate from a JSON file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub issuer: Option<String>,

    /// Issue date (YYYY-MM-DD)
    #[arg(long)]
    pub date_issued: Option<String>,

    #[arg(long)]
    pub credential_id: Option<String>,

    /// Image file to upload for the certificate
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH / UPLOAD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Verify admin credentials against the API
    Login {
        /// Username (defaults to the configured one)
        #[arg(long)]
        username: Option<String>,
    },

    /// End the server-side session
    Logout,

    /// Show the signed-in admin user
    Whoami,
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Image file to upload
    #[arg(required_unless_present = "delete")]
    pub file: Option<PathBuf>,

    /// Delete a previously uploaded image by its public ID
    #[arg(long, value_name = "PUBLIC_ID", conflicts_with = "file")]
    pub delete: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Store the admin password in the system keyring
    SetPassword,

    /// Set the theme, or toggle between light and dark when omitted
    Theme {
        /// light, dark or system
        value: Option<Theme>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
