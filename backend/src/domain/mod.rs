//! # Domain Module
//!
//! Business logic for the kid tracker: the domain models and their
//! validation rules, the write commands, the derived activity views, and the
//! [`AppContext`](app_context::AppContext) that presentation code reads from.
//!
//! The domain depends only on the storage traits, never on a concrete store.

pub mod activity_queries;
pub mod app_context;
pub mod commands;
pub mod models;
pub mod selection;

pub use app_context::AppContext;
pub use commands::{ActivityPatch, NewActivity};
pub use selection::resolve_selection;
