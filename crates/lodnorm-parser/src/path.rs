//! Predicate path expressions.
//!
//! A FieldMap predicate is one of:
//! - a bare absolute IRI: `http://www.w3.org/2004/02/skos/core#prefLabel`
//! - a bracketed IRI: `<http://www.w3.org/2004/02/skos/core#prefLabel>`
//! - a prefixed name: `skos:prefLabel`
//! - steps joined by `/`: `madsrdf:identifiesRWO/madsrdf:birthDate/schema:label`
//!
//! Evaluation follows each step from the current node set; a multi-step
//! path reaches values on entities linked from the subject.

use std::collections::BTreeMap;
use std::fmt;

use pest::Parser;

use crate::error::ParseError;
use crate::ntriples::iri_text;
use crate::{LodParser, Rule};

/// A compiled predicate path: one fully expanded IRI per step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredicatePath {
    steps: Vec<String>,
}

impl PredicatePath {
    /// A single-step path.
    pub fn single(iri: impl Into<String>) -> Self {
        Self {
            steps: vec![iri.into()],
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.steps.len() == 1
    }
}

impl fmt::Display for PredicatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.steps.iter().map(|s| format!("<{s}>")).collect();
        f.write_str(&parts.join("/"))
    }
}

/// Compile a predicate path, expanding prefixed names with `prefixes`.
///
/// # Errors
///
/// Returns [`ParseError::EmptyPath`] for blank input,
/// [`ParseError::UnknownPrefix`] for an undeclared prefix, and
/// [`ParseError::Syntax`] for anything else malformed.
pub fn parse_path(
    expr: &str,
    prefixes: &BTreeMap<String, String>,
) -> Result<PredicatePath, ParseError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(ParseError::EmptyPath);
    }
    if is_bare_iri(expr) {
        return Ok(PredicatePath::single(expr));
    }

    let parsed = LodParser::parse(Rule::path_expr, expr)?
        .next()
        .ok_or(ParseError::EmptyPath)?;

    let mut steps = Vec::new();
    for step in parsed.into_inner() {
        if step.as_rule() != Rule::path_step {
            continue;
        }
        let Some(inner) = step.into_inner().next() else {
            continue;
        };
        match inner.as_rule() {
            Rule::iri_ref => steps.push(iri_text(inner)),
            Rule::prefixed_name => {
                let mut parts = inner.into_inner();
                let prefix = parts.next().map(|p| p.as_str()).unwrap_or_default();
                let local = parts.next().map(|p| p.as_str()).unwrap_or_default();
                let base = prefixes
                    .get(prefix)
                    .ok_or_else(|| ParseError::UnknownPrefix(prefix.to_string()))?;
                steps.push(format!("{base}{local}"));
            }
            _ => {}
        }
    }

    if steps.is_empty() {
        return Err(ParseError::EmptyPath);
    }
    Ok(PredicatePath { steps })
}

fn is_bare_iri(expr: &str) -> bool {
    !expr.starts_with('<')
        && !expr.chars().any(char::is_whitespace)
        && (expr.contains("://") || expr.starts_with("urn:"))
}
