//! # Introduction
//!
//! pgpreload discovers the extension modules of an installed PostgreSQL
//! instance and lets an operator pick which of them are loaded at the
//! three preload stages (`shared_preload_libraries`,
//! `session_preload_libraries`, `local_preload_libraries`), editing the
//! three settings as a group in a terminal UI and persisting the result
//! into `postgresql.auto.conf`.
//!
//! ## Pipeline
//!
//! ```text
//! CLI flags / environment → discovery → catalog + field values → TUI → conf
//! ```
//!
//! 1. [`cli`] — command-line flags (directory overrides and the
//!    non-interactive `--info` / `--last` modes).
//! 2. [`discovery`] — locates `pg_config`, the configuration files and
//!    the lib/share directories, then enumerates installed extensions.
//! 3. [`catalog`] — the session data model: extension names with their
//!    inclusion flags, plus the three preload field values.
//! 4. [`conf`] — reads and rewrites the configuration file and keeps a
//!    snapshot of the last save for `--last`.
//! 5. [`ui`] — ratatui-based TUI; not part of the stable library API.
//!
//! Every preload edit keeps one field "active": the grid's checkboxes
//! always mirror the active field's token list, and toggling an entry
//! appends to or rebuilds exactly that list.

pub mod catalog;
pub mod cli;
pub mod conf;
pub mod discovery;
pub mod logging;
pub mod ui;
