//! # lodnorm-parser
//!
//! Parsers built on a single pest PEG grammar (`src/lod.pest`):
//! - [`parse_ntriples`] turns an N-Triples document into a [`Graph`](lodnorm_core::Graph)
//! - [`parse_path`] compiles a FieldMap predicate into a [`PredicatePath`]

pub mod error;
pub mod ntriples;
pub mod path;

use pest_derive::Parser;

pub use error::ParseError;
pub use ntriples::parse_ntriples;
pub use path::{parse_path, PredicatePath};

#[derive(Parser)]
#[grammar = "lod.pest"]
pub(crate) struct LodParser;
