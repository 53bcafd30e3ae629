//! # Focusdeck Core Library
//!
//! Core business logic for Focusdeck, a terminal productivity dashboard
//! combining a countdown timer, a columned task board, and a derived
//! analytics view, all persisted to local per-user storage. It follows
//! a CLI-first philosophy: every operation is available through the
//! standalone CLI binary, and interactive frontends are thin layers
//! over the same application state object.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a caller-driven countdown state machine; the
//!   frontend fires `tick()` once per second while it runs
//! - **Task Board**: columned tasks with monotonic ids and a read-side
//!   filter that never touches the data
//! - **Analytics**: daily counters derived from completion events,
//!   recorded only while a user is logged in
//! - **Store**: SQLite-backed key-value persistence, one JSON document
//!   per aggregate
//! - **App**: the shared state object owning all of the above; events
//!   are emitted explicitly at the mutation sites that cause them
//!
//! ## Key Components
//!
//! - [`App`]: application state and the mutate/persist/publish loop
//! - [`TimerEngine`]: countdown state machine
//! - [`TaskBoard`]: task collection and column moves
//! - [`Analytics`]: the per-day ledger and trailing-week totals
//! - [`Store`]: key-value persistence

pub mod analytics;
pub mod app;
pub mod board;
pub mod error;
pub mod events;
pub mod store;
pub mod theme;
pub mod timer;
pub mod user;

pub use analytics::{Analytics, DailyStats};
pub use app::App;
pub use board::{Priority, Status, StatusFilter, Task, TaskBoard, TaskFilter};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use store::{Config, Store};
pub use theme::Theme;
pub use timer::{TimerEngine, TimerPhase};
pub use user::User;
