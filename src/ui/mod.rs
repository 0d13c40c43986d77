//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]** — application state, keyboard event loop, overlay timers
//! - **[`panes`]** — the screen regions (headers, field lines, toggle grid)
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the
//! discovered catalog, the loaded field values and a
//! [`ConfigStore`], and call [`App::run`] to start the event loop.
//!
//! [`ConfigStore`]: crate::conf::ConfigStore
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
