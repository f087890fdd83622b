//! # Deskview Architecture
//!
//! Deskview is the **UI-agnostic core of a back-office dashboard**: the admin
//! Drive browser, the SMS template manager, the technician document and project
//! lists, and the admin profile settings. It is a library that happens to have
//! a CLI client, not the other way round.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders pages, handles terminal I/O    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Loads datasets, seeding sample data on first use         │
//! │  - Normalizes inputs (UUID prefixes → ids)                  │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (listing/, drive.rs, templates.rs, profile.rs)        │
//! │  - Pure functions and view-models over Rust values          │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract KeyValueStore trait holding JSON blobs          │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The List Pipeline
//!
//! All four list views share one pipeline, `store → filter → sort → paginate`,
//! described in [`listing`]. Records join it by implementing
//! [`listing::Listable`]; nothing is recomputed behind the caller's back.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular arguments, returns
//! `Result<T>`, and never writes to stdout/stderr. "Now" is always passed in
//! (see [`listing::TabContext`] and [`profile::AutoSave`]) so time-dependent
//! behavior is testable.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`listing`]: Filter, sort and paginate stages plus the `ListView` view-model
//! - [`model`]: Record types (`DriveEntry`, `SmsTemplate`, `Document`, `Project`)
//! - [`drive`]: Folder navigation and mutations for the Drive browser
//! - [`templates`]: `{{var}}` helpers, SMS segment counting, template CRUD
//! - [`profile`]: Profile validation, backend seam, cache and auto-save
//! - [`store`]: Key/value storage abstraction and implementations
//! - [`format`]: File size and date formatting
//! - [`config`]: Configuration management
//! - [`sample`]: Deterministic mock data
//! - [`error`]: Error types
//! - `cli`: Argument parsing and rendering for the binary (not part of the lib API)

pub mod api;
pub mod config;
pub mod drive;
pub mod error;
pub mod format;
pub mod listing;
pub mod model;
pub mod profile;
pub mod sample;
pub mod store;
pub mod templates;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
