use clap::{Args, Parser, Subcommand, ValueEnum};
use deskview::listing::{Flag, FlagFilter};
use deskview::model::{
    DocumentKind, DocumentSortKey, DocumentTab, DriveKind, DriveSortKey, DriveTab, ProjectSortKey,
    ProjectStatus, ProjectTab, TemplateCategory, TemplateSortKey, TemplateTab,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "deskview", bin_name = "deskview", version)]
#[command(
    about = "Drive, SMS templates, technician lists and profile settings for the back office",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and manage the admin Drive
    Drive {
        #[command(subcommand)]
        command: DriveCommands,
    },

    /// Manage SMS templates
    #[command(alias = "tpl")]
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// List technician documents
    #[command(alias = "docs")]
    Documents {
        #[command(subcommand)]
        command: DocumentCommands,
    },

    /// List technician projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Show or edit the admin profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (page-size, recent-days, autosave-delay-ms, profile-key)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Search, direction and paging shared by every list command.
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Case-insensitive search text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page number; out-of-range pages are clamped
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (defaults to the page-size setting)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FlagArgs {
    /// Only starred items
    #[arg(long, conflicts_with = "shared")]
    pub starred: bool,

    /// Only shared items
    #[arg(long)]
    pub shared: bool,
}

impl FlagArgs {
    pub fn filter(&self) -> FlagFilter {
        if self.starred {
            FlagFilter::Only(Flag::Starred)
        } else if self.shared {
            FlagFilter::Only(Flag::Shared)
        } else {
            FlagFilter::Any
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum DriveCommands {
    /// List a folder, or a tab across all folders
    #[command(alias = "ls")]
    List {
        /// Folder id (or unique prefix); defaults to the root
        #[arg(long)]
        folder: Option<String>,

        /// my-drive, starred, shared or recent
        #[arg(short, long)]
        tab: Option<DriveTab>,

        /// Entry kind (folder, document, pdf, image, ...)
        #[arg(short, long)]
        kind: Option<DriveKind>,

        /// name, modified, size or kind
        #[arg(long)]
        sort: Option<DriveSortKey>,

        #[command(flatten)]
        flags: FlagArgs,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Create a folder
    Mkdir {
        name: String,

        /// Parent folder id (or unique prefix); defaults to the root
        #[arg(long = "in")]
        parent: Option<String>,
    },

    /// Rename a file or folder
    #[command(alias = "mv")]
    Rename { id: String, name: String },

    /// Delete a file, or a folder and everything inside it
    #[command(alias = "rm")]
    Delete { id: String },

    /// Toggle the star on an entry
    Star { id: String },

    /// Share an entry (or stop sharing with --off)
    Share {
        id: String,

        #[arg(long)]
        off: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List templates
    #[command(alias = "ls")]
    List {
        /// all, active or inactive
        #[arg(short, long)]
        tab: Option<TemplateTab>,

        /// Template category
        #[arg(short, long)]
        category: Option<TemplateCategory>,

        /// name, updated, category or length
        #[arg(long)]
        sort: Option<TemplateSortKey>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Create a template
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value_t = TemplateCategory::Other)]
        category: TemplateCategory,

        /// Body, with {{variable}} placeholders
        #[arg(long)]
        content: String,
    },

    /// Change a template's name, category or body
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<TemplateCategory>,

        /// New body, with {{variable}} placeholders
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a template
    #[command(alias = "rm")]
    Delete { id: String },

    /// Toggle a template between active and inactive
    Toggle { id: String },

    /// List the {{variables}} in a text and its SMS length
    Vars { text: String },

    /// Render a template with KEY=VALUE assignments
    Preview {
        id: String,

        /// Values as KEY=VALUE
        values: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// List documents
    #[command(alias = "ls")]
    List {
        /// all, shared-with-me, starred or recent
        #[arg(short, long)]
        tab: Option<DocumentTab>,

        /// report, invoice, quote, contract, photo, plan or other
        #[arg(short, long)]
        kind: Option<DocumentKind>,

        /// name, modified, size or kind
        #[arg(long)]
        sort: Option<DocumentSortKey>,

        #[command(flatten)]
        flags: FlagArgs,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects
    #[command(alias = "ls")]
    List {
        /// all, to-complete, in-progress or completed
        #[arg(short, long)]
        tab: Option<ProjectTab>,

        /// Project status, including cancelled
        #[arg(long)]
        status: Option<ProjectStatus>,

        /// name, modified, due-date or progress
        #[arg(long)]
        sort: Option<ProjectSortKey>,

        /// Only starred projects
        #[arg(long)]
        starred: bool,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the admin profile
    Show,

    /// Update profile fields
    Set {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// New password (at least 8 characters)
        #[arg(long, requires = "confirm")]
        password: Option<String>,

        /// Repeat the new password
        #[arg(long, requires = "password")]
        confirm: Option<String>,
    },
}
