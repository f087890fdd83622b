//! # CLI Behavior
//!
//! This is **one possible UI client** for deskview, not the application itself.
//! For the overall architecture, see the library docs.
//!
//! ## Commands
//!
//! - `deskview` with no arguments lists the Drive root.
//! - `drive`, `templates`, `documents`, `projects` each have a `list`
//!   subcommand running the shared filter → sort → paginate pipeline.
//! - Mutations (`drive mkdir`, `templates add`, ...) take ids as full UUIDs or
//!   any unique prefix, like the 8-character ids shown in lists.
//! - `--output json` prints the underlying data instead of the terminal layout.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `render`: Terminal layout (columns, colors, relative dates)
//! - `setup`: Argument parsing via clap
//! - `logging`: tracing subscriber on stderr

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
