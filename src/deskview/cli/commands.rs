//! # CLI Layer
//!
//! This module is **one possible UI client** for deskview. It is the only place
//! that knows about terminal output, exit codes and argument parsing.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory, loads config, builds the API
//! - `handle_*()`: Per-command handlers that call the API and render the result
//!
//! ## Data Directory
//!
//! `DESKVIEW_HOME` when set, otherwise the platform data directory. It holds
//! `config.json` plus one `<key>.json` blob per dataset.

use super::logging;
use super::render::{
    print_config, print_documents, print_drive, print_inspection, print_json, print_messages,
    print_preview, print_profile, print_projects, print_templates,
};
use super::setup::{
    Cli, Commands, DocumentCommands, DriveCommands, OutputFormat, PageArgs, ProfileCommands,
    ProjectCommands, TemplateCommands,
};
use chrono::Utc;
use clap::Parser;
use deskview::api::{
    CmdMessage, ConfigAction, DeskApi, ListQuery, ProfileChanges, TemplateChanges,
};
use deskview::config::DeskConfig;
use deskview::error::{DeskError, Result};
use deskview::listing::{Direction, Flag, FlagFilter, Listable, SortSpec};
use deskview::model::{Document, DriveEntry, Project, SmsTemplate};
use deskview::profile::InMemoryBackend;
use deskview::sample;
use deskview::store::fs::FileStore;
use deskview::store::KeyValueStore;
use deskview::templates::parse_assignments;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;

const HOME_ENV: &str = "DESKVIEW_HOME";

struct AppContext {
    api: DeskApi<FileStore, InMemoryBackend>,
    output: OutputFormat,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Drive { command }) => handle_drive(&mut ctx, command),
        Some(Commands::Templates { command }) => handle_templates(&mut ctx, command),
        Some(Commands::Documents {
            command:
                DocumentCommands::List {
                    tab,
                    kind,
                    sort,
                    flags,
                    page,
                },
        }) => {
            let mut query = list_query::<Document>(&page, sort, flags.filter());
            query.criteria.tab = tab.unwrap_or_default();
            query.criteria.category = kind;
            let result = ctx.api.list_documents(query)?;
            emit(&ctx, &result, |r| print_documents(r, Utc::now()))
        }
        Some(Commands::Projects {
            command:
                ProjectCommands::List {
                    tab,
                    status,
                    sort,
                    starred,
                    page,
                },
        }) => {
            let flag = if starred {
                FlagFilter::Only(Flag::Starred)
            } else {
                FlagFilter::Any
            };
            let mut query = list_query::<Project>(&page, sort, flag);
            query.criteria.tab = tab.unwrap_or_default();
            query.criteria.category = status;
            let result = ctx.api.list_projects(query)?;
            emit(&ctx, &result, |r| print_projects(r, Utc::now()))
        }
        Some(Commands::Profile { command }) => handle_profile(&mut ctx, command),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_drive(
            &mut ctx,
            DriveCommands::List {
                folder: None,
                tab: None,
                kind: None,
                sort: None,
                flags: Default::default(),
                page: PageArgs {
                    search: None,
                    desc: false,
                    page: 1,
                    page_size: None,
                },
            },
        ),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "deskview", "deskview")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            DeskError::Store(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let dir = data_dir()?;
    tracing::debug!(dir = %dir.display(), "using data directory");

    let config = DeskConfig::load(&dir)?;
    let store = FileStore::new(&dir);

    // No REST client ships with the crate; the in-memory backend is seeded
    // from the cached profile so edits survive between invocations.
    let seed = match store.get(&config.profile_key)? {
        Some(cached) => cached,
        None => serde_json::to_value(sample::profile())?,
    };
    let user_id = seed
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or("1")
        .to_string();
    let backend = InMemoryBackend::new().with_user(&user_id, seed);

    let api = DeskApi::new(store, backend, config).with_config_dir(dir);
    Ok(AppContext {
        api,
        output: cli.output,
    })
}

/// Prints data as JSON or through the given text renderer.
fn emit<T: Serialize>(ctx: &AppContext, data: &T, text: impl FnOnce(&T)) -> Result<()> {
    match ctx.output {
        OutputFormat::Json => print_json(data),
        OutputFormat::Text => {
            text(data);
            Ok(())
        }
    }
}

/// Prints a mutation's data as JSON, or its messages as text.
fn emit_messages<T: Serialize>(ctx: &AppContext, data: &T, messages: &[CmdMessage]) -> Result<()> {
    match ctx.output {
        OutputFormat::Json => print_json(data),
        OutputFormat::Text => {
            print_messages(messages);
            Ok(())
        }
    }
}

fn list_query<L: Listable>(
    page: &PageArgs,
    sort: Option<L::SortKey>,
    flag: FlagFilter,
) -> ListQuery<L> {
    let mut query = ListQuery::<L>::default();
    query.criteria.search = page.search.clone().unwrap_or_default();
    query.criteria.flag = flag;
    query.sort = SortSpec {
        key: sort.unwrap_or_default(),
        direction: if page.desc {
            Direction::Descending
        } else {
            Direction::Ascending
        },
    };
    query.page = page.page;
    query.page_size = page.page_size;
    query
}

fn handle_drive(ctx: &mut AppContext, command: DriveCommands) -> Result<()> {
    match command {
        DriveCommands::List {
            folder,
            tab,
            kind,
            sort,
            flags,
            page,
        } => {
            let mut query = list_query::<DriveEntry>(&page, sort, flags.filter());
            query.criteria.tab = tab.unwrap_or_default();
            query.criteria.category = kind;
            let listing = ctx.api.list_drive(folder.as_deref(), query)?;
            emit(ctx, &listing, |l| print_drive(l, Utc::now()))
        }
        DriveCommands::Mkdir { name, parent } => {
            let result = ctx.api.create_folder(parent.as_deref(), &name)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        DriveCommands::Rename { id, name } => {
            let result = ctx.api.rename_drive_entry(&id, &name)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        DriveCommands::Delete { id } => {
            let result = ctx.api.delete_drive_entry(&id)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        DriveCommands::Star { id } => {
            let result = ctx.api.toggle_star(&id)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        DriveCommands::Share { id, off } => {
            let result = ctx.api.set_shared(&id, !off)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
    }
}

fn handle_templates(ctx: &mut AppContext, command: TemplateCommands) -> Result<()> {
    match command {
        TemplateCommands::List {
            tab,
            category,
            sort,
            page,
        } => {
            let mut query = list_query::<SmsTemplate>(&page, sort, FlagFilter::Any);
            query.criteria.tab = tab.unwrap_or_default();
            query.criteria.category = category;
            let result = ctx.api.list_templates(query)?;
            emit(ctx, &result, |r| print_templates(r, Utc::now()))
        }
        TemplateCommands::Add {
            name,
            category,
            content,
        } => {
            let result = ctx.api.add_template(&name, &content, category)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        TemplateCommands::Edit {
            id,
            name,
            category,
            content,
        } => {
            let changes = TemplateChanges {
                name,
                category,
                content,
            };
            let result = ctx.api.edit_template(&id, changes)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        TemplateCommands::Delete { id } => {
            let result = ctx.api.delete_template(&id)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        TemplateCommands::Toggle { id } => {
            let result = ctx.api.toggle_template(&id)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
        TemplateCommands::Vars { text } => {
            let inspection = ctx.api.inspect_text(&text);
            emit(ctx, &inspection, print_inspection)
        }
        TemplateCommands::Preview { id, values } => {
            let values = parse_assignments(&values)?;
            let result = ctx.api.preview_template(&id, &values)?;
            emit(ctx, &result.data, print_preview)?;
            if ctx.output == OutputFormat::Text {
                print_messages(&result.messages);
            }
            Ok(())
        }
    }
}

fn handle_profile(ctx: &mut AppContext, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Show => {
            let profile = ctx.api.profile()?;
            emit(ctx, &profile, print_profile)
        }
        ProfileCommands::Set {
            first_name,
            last_name,
            email,
            phone,
            password,
            confirm,
        } => {
            let changes = ProfileChanges {
                first_name,
                last_name,
                email,
                phone,
                password,
                confirm_password: confirm,
            };
            let result = ctx.api.update_profile(changes)?;
            emit_messages(ctx, &result.data, &result.messages)
        }
    }
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.configure(action)?;
    if ctx.output == OutputFormat::Json {
        return print_json(&result.data);
    }
    if show_all {
        if let Some(config) = &result.data {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
