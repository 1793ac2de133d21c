//! # lodnorm-engine
//!
//! Turns authority response graphs into normalized results.
//!
//! Pipeline stages, leaf first:
//! - [`extractor`]: graph + FieldMap to per-field bindings
//! - [`consolidator`]: bindings to one record per subject
//! - [`language`]: language precedence and literal filtering
//! - [`context`]: one-level expansion of reference-valued context fields
//! - [`label`]: display label composition
//! - [`sort`]: numeric-aware, missing-aware result ordering
//! - [`engine`]: the `search` and `find` facade
//! - [`formatter`]: JSON, table, and Markdown rendering

pub mod consolidator;
pub mod context;
pub mod engine;
pub mod extractor;
pub mod formatter;
pub mod label;
pub mod language;
pub mod result;
pub mod sort;

pub use consolidator::{consolidate, ConsolidatedRecord, Selection};
pub use context::{ContextExpander, CONTEXT_DEPTH};
pub use engine::{Engine, FindParams, RequestContext, SearchParams};
pub use extractor::{extract, Binding, CompiledFieldMap, Scope};
pub use formatter::{format_search_results, format_term, OutputFormat};
pub use label::full_label;
pub use language::LanguageSet;
pub use result::{ContextEntry, ContextValue, NestedSummary, SearchResult, TermRecord};
pub use sort::{compare_sort_keys, sort_by_key_values};
