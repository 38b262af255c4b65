//! Cursor/selection-aware editing operations for a host text editor.
//!
//! The crate is split into a library of single-selection [editing
//! actions](crate::actions) (insert line, delete line, join, copy, case
//! transform, delimiter expansion, navigation) and the [multi-selection
//! orchestrator](crate::orchestrator) that fans one action out across every
//! active cursor and commits the result as a single atomic [`Transaction`].
//!
//! The host editor is an external collaborator behind the
//! [`HostSurface`](crate::host::HostSurface) trait; a ropey-backed reference
//! implementation, [`Buffer`](crate::host::Buffer), is provided for tests and
//! embedders without a real editor surface.
//!
//! [`Transaction`]: crate::transaction::Transaction

use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod actions;
pub mod case_convention;
pub mod chars;
pub mod host;
pub mod movement;
pub mod orchestrator;
pub mod position;
pub mod search;
pub mod selection;
pub mod surround;
pub mod transaction;

pub type Tendril = SmartString<LazyCompact>;
