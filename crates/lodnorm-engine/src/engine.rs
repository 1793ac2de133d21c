//! Engine facade: the `search` and `find` pipelines.
//!
//! ```text
//! graph -> extract -> consolidate -> select -> resolve languages
//!       -> expand context -> format labels -> sort -> results
//! ```
//!
//! Every call captures its language preferences in a [`RequestContext`]
//! before touching the graph. The engine holds no mutable state, so calls
//! on one engine may run concurrently from any number of threads.

use std::collections::BTreeMap;
use std::time::Instant;

use lodnorm_core::{
    AuthorityConfig, ConfigError, EngineSettings, Field, Graph, LodError, Node, Result,
};
use tracing::{debug, info};

use crate::consolidator::{consolidate, ConsolidatedRecord, Selection};
use crate::context::{ContextExpander, CONTEXT_DEPTH};
use crate::extractor::{extract, CompiledFieldMap, Scope};
use crate::label::full_label;
use crate::language::LanguageSet;
use crate::result::{SearchResult, TermRecord};
use crate::sort::sort_by_key_values;

/// Optional inputs to [`Engine::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Highest-precedence language.
    pub language: Option<String>,
    pub subauthority: Option<String>,
    /// Replaces the configured sort predicate.
    pub sort: Option<String>,
    /// Replaces the configured context fields.
    pub context: Option<BTreeMap<String, String>>,
}

/// Optional inputs to [`Engine::find`].
#[derive(Debug, Clone, Default)]
pub struct FindParams {
    /// Highest-precedence language.
    pub language: Option<String>,
    pub subauthority: Option<String>,
    /// The URL the graph was fetched from, reported when the term is missing.
    pub request_url: Option<String>,
}

/// Per-call snapshot of everything that can vary between calls.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub languages: LanguageSet,
}

impl RequestContext {
    fn capture(explicit: Option<&str>, authority: &[String], settings: &EngineSettings) -> Self {
        Self {
            languages: LanguageSet::resolve(explicit, authority, &settings.default_language),
        }
    }
}

/// Normalizes authority graphs into search results and term records.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: EngineSettings,
}

impl Engine {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Replace the engine-wide default languages. Calls already running on
    /// a clone of this engine keep the languages they started with.
    pub fn set_default_language(&mut self, langs: Vec<String>) {
        self.settings.default_language = langs;
    }

    /// Turn a search response graph into ranked results.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::Config`] when the authority has no search
    /// section, names an unknown sub-authority, or lacks a label predicate.
    /// A graph with no matching subjects is an empty result, not an error.
    pub fn search(
        &self,
        authority: &AuthorityConfig,
        graph: &Graph,
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>> {
        let start = Instant::now();
        let section = authority.search_section()?;
        check_subauthority(authority, &section.subauthorities, params.subauthority.as_deref())?;
        let ctx = RequestContext::capture(
            params.language.as_deref(),
            authority.search_languages(),
            &self.settings,
        );
        info!(authority = %authority.name, triples = graph.len(), languages = ?ctx.languages, "search started");

        let mut map = section.results.clone();
        if let Some(sort) = &params.sort {
            map.optional.sort = Some(sort.clone());
        }
        if let Some(context) = &params.context {
            map.context = context.clone();
        }
        let compiled = CompiledFieldMap::compile(&map, &authority.prefixes, "search")?;
        let summary_map = CompiledFieldMap::compile(&map.summary(), &authority.prefixes, "search")?;

        let bindings = extract(graph, &compiled, Scope::AllSubjects);
        debug!(bindings = bindings.len(), "statements extracted");
        let records = consolidate(bindings, &compiled, Selection::ApplySelector);
        let total = records.len();
        let records: Vec<ConsolidatedRecord> = records
            .into_iter()
            .filter(|r| r.is_selected())
            .filter(|r| !compiled.has_sort() || !r.sort().is_empty())
            .collect();
        debug!(consolidated = total, selected = records.len(), "records consolidated");

        let expander = ContextExpander::new(graph, &summary_map, &compiled, &ctx.languages);
        let ranked: Vec<(SearchResult, Vec<String>)> = records
            .iter()
            .map(|record| {
                let result = SearchResult {
                    uri: record.uri(),
                    id: record.id().unwrap_or_else(|| record.uri()),
                    label: full_label(
                        &ctx.languages.lexical(record.label()),
                        &ctx.languages.lexical(record.altlabel()),
                    ),
                    context: map
                        .has_context()
                        .then(|| expander.expand(record, CONTEXT_DEPTH)),
                };
                (result, ctx.languages.lexical(record.sort()))
            })
            .collect();

        let ranked = if compiled.has_sort() {
            sort_by_key_values(ranked, |(_, key)| Some(key.as_slice()))
        } else {
            ranked
        };
        let results: Vec<SearchResult> = ranked.into_iter().map(|(result, _)| result).collect();

        info!(
            authority = %authority.name,
            results = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );
        Ok(results)
    }

    /// Turn a term response graph into a detailed record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::Config`] for configuration problems and
    /// [`LodError::NotFound`] when the graph holds no statements about the
    /// term. The not-found target is the request URL when one is given.
    pub fn find(
        &self,
        authority: &AuthorityConfig,
        graph: &Graph,
        id: &str,
        params: &FindParams,
    ) -> Result<TermRecord> {
        let start = Instant::now();
        let section = authority.term_section()?;
        check_subauthority(authority, &section.subauthorities, params.subauthority.as_deref())?;
        let ctx = RequestContext::capture(
            params.language.as_deref(),
            authority.term_languages(),
            &self.settings,
        );
        let compiled = CompiledFieldMap::compile(&section.results, &authority.prefixes, "term")?;

        let subject = Node::iri(section.subject_for(id));
        info!(authority = %authority.name, subject = %subject, languages = ?ctx.languages, "find started");
        if !graph.has_subject(&subject) {
            return Err(LodError::NotFound {
                target: params.request_url.clone().unwrap_or_else(|| subject.to_string()),
            });
        }

        let record = consolidate(
            extract(graph, &compiled, Scope::Subject(&subject)),
            &compiled,
            Selection::All,
        )
        .into_iter()
        .next();

        let mut predicates: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for triple in graph.triples_for(&subject) {
            predicates
                .entry(triple.predicate.clone())
                .or_default()
                .push(triple.object.lexical());
        }

        let uri = subject.to_string();
        let term = match record {
            Some(record) => TermRecord {
                id: record.id().unwrap_or_else(|| uri.clone()),
                label: ctx.languages.lexical(record.label()),
                altlabel: ctx.languages.lexical(record.altlabel()),
                sameas: record
                    .has_field(&Field::SameAs)
                    .then(|| ctx.languages.lexical(record.values(&Field::SameAs))),
                uri,
                predicates,
            },
            None => TermRecord {
                id: uri.clone(),
                label: Vec::new(),
                altlabel: Vec::new(),
                sameas: section.results.optional.sameas.as_ref().map(|_| Vec::new()),
                uri,
                predicates,
            },
        };

        info!(
            authority = %authority.name,
            predicates = term.predicates.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "find finished"
        );
        Ok(term)
    }
}

fn check_subauthority(
    authority: &AuthorityConfig,
    subauthorities: &BTreeMap<String, String>,
    requested: Option<&str>,
) -> std::result::Result<(), ConfigError> {
    match requested {
        Some(name) if !subauthorities.contains_key(name) => Err(ConfigError::UnknownSubauthority {
            authority: authority.name.clone(),
            subauthority: name.to_string(),
        }),
        _ => Ok(()),
    }
}
