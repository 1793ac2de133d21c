//! # lodnorm-core
//!
//! Core types for normalizing linked data authority responses.
//!
//! This crate defines the foundational types used across all other lodnorm crates:
//! - Graph model ([`Graph`], [`Triple`], [`Node`], [`Literal`], [`Object`])
//! - [`Value`]: a record field value, including the parse error marker
//! - [`FieldMap`]: logical field to predicate path bindings
//! - Authority configuration ([`AuthorityConfig`]) and [`EngineSettings`]
//! - [`UrlTemplate`]: outbound URL construction
//! - [`AuthorityRegistry`]: authorities by name
//! - Error hierarchy ([`LodError`], [`ConfigError`], [`FieldError`])

pub mod config;
pub mod error;
pub mod field_map;
pub mod graph;
pub mod registry;
pub mod template;
pub mod term;

pub use config::{AuthorityConfig, EngineSettings, SearchSection, TermSection};
pub use error::{ConfigError, FieldError, LodError, Result};
pub use field_map::{Field, FieldMap};
pub use graph::Graph;
pub use registry::AuthorityRegistry;
pub use template::{TemplateVariable, UrlTemplate};
pub use term::{Literal, Node, Object, Triple, Value, PARSE_ERROR_MARKER};
