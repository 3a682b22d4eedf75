//! Common types shared across the semsim workspace.
//!
//! This crate provides the label vocabulary, the dependency graph model, the
//! corpus container, search configuration and the error types used by the
//! fragment matching engine in `semsim_subgraph`.

mod config;
mod corpus;
mod error;
mod graph;
mod label_index;

pub use crate::config::*;
pub use crate::corpus::*;
pub use crate::error::*;
pub use crate::graph::*;
pub use crate::label_index::*;
