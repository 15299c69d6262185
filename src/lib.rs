//! nestlist: a keyboard-driven editor for outlines, i.e. lists of lists.
//!
//! The engine ([`store`], [`node`], [`target`]) is independent of the terminal; the
//! [`codec`] and [`storage`] modules persist it, and [`app_state`], [`keymap`] and
//! [`ui`] drive it interactively.
#![allow(clippy::multiple_crate_versions)]

/// Interactive session state and the commands it exposes.
pub mod app_state;
/// Line-oriented text format for outline files.
pub mod codec;
/// User configuration from nestlist.toml.
pub mod config;
/// Error type shared by the engine and its persistence.
pub mod error;
/// Nested JSON rendering of an outline.
pub mod export;
/// Key bindings for each input mode.
pub mod keymap;
/// Log backend feeding the message pane.
pub mod logging;
/// Node arena.
pub mod node;
/// Outline file loading and atomic saving.
pub mod storage;
/// The outline store with its cursor and targets.
pub mod store;
/// Insertion-point addresses.
pub mod target;
/// Terminal rendering.
pub mod ui;

pub use error::{OutlineError, OutlineResult};
pub use node::{Node, NodeId, Tree};
pub use store::OutlineStore;
pub use target::{Side, Target, TargetSlot};
