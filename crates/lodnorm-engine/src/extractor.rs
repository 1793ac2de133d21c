//! Statement extraction: filters a graph down to the bindings a FieldMap asks for.
//!
//! Each configured predicate path is compiled independently. A path that
//! fails to compile does not abort the call; every subject matched by some
//! other path gets a single `Err(FieldError)` binding for that field instead.

use std::collections::BTreeMap;

use lodnorm_core::{ConfigError, Field, FieldError, FieldMap, Graph, Node, Object};
use lodnorm_parser::{parse_path, PredicatePath};
use tracing::warn;

/// A FieldMap with every predicate compiled to a path (or a field error).
#[derive(Debug, Clone)]
pub struct CompiledFieldMap {
    fields: Vec<(Field, Result<PredicatePath, FieldError>)>,
    has_sort: bool,
    has_selector: bool,
    context_names: Vec<String>,
}

impl CompiledFieldMap {
    /// Validate and compile a FieldMap.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLabelPredicate`] when the map has no label
    /// predicate. Malformed paths are not errors here; they become per-field
    /// [`FieldError`]s.
    pub fn compile(
        map: &FieldMap,
        prefixes: &BTreeMap<String, String>,
        section: &str,
    ) -> Result<Self, ConfigError> {
        map.validate(section)?;

        let fields = map
            .fields()
            .into_iter()
            .map(|(field, expr)| {
                let path = parse_path(expr, prefixes).map_err(|e| {
                    warn!(%field, expr, error = %e, "predicate path does not compile");
                    FieldError::new(field.to_string(), e.to_string())
                });
                (field, path)
            })
            .collect();

        Ok(Self {
            fields,
            has_sort: map.has_sort(),
            has_selector: map.has_selector(),
            context_names: map.context.keys().cloned().collect(),
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().map(|(f, _)| f)
    }

    #[must_use]
    pub fn has_sort(&self) -> bool {
        self.has_sort
    }

    #[must_use]
    pub fn has_selector(&self) -> bool {
        self.has_selector
    }

    #[must_use]
    pub fn context_names(&self) -> &[String] {
        &self.context_names
    }
}

/// One extracted value for one subject and field.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub subject: Node,
    pub field: Field,
    pub value: Result<Object, FieldError>,
}

/// Which subjects extraction runs over.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// Every non-blank subject of the graph.
    AllSubjects,
    /// A single subject, blank or not.
    Subject(&'a Node),
}

/// Extract bindings for `map` from `graph`.
///
/// Bindings are ordered by subject (first-seen order), then by field in
/// map order, then by graph order of the matching triples.
#[must_use]
pub fn extract(graph: &Graph, map: &CompiledFieldMap, scope: Scope<'_>) -> Vec<Binding> {
    let subjects: Vec<Node> = match scope {
        Scope::AllSubjects => graph
            .subjects()
            .into_iter()
            .filter(|s| !s.is_blank())
            .cloned()
            .collect(),
        Scope::Subject(node) => vec![node.clone()],
    };

    let mut bindings = Vec::new();
    for subject in &subjects {
        let mut matched: Vec<Binding> = Vec::new();
        let mut broken: Vec<Binding> = Vec::new();
        for (field, path) in &map.fields {
            match path {
                Ok(path) => {
                    matched.extend(evaluate(graph, subject, path).into_iter().map(|obj| {
                        Binding {
                            subject: subject.clone(),
                            field: field.clone(),
                            value: Ok(obj.clone()),
                        }
                    }));
                }
                Err(err) => broken.push(Binding {
                    subject: subject.clone(),
                    field: field.clone(),
                    value: Err(err.clone()),
                }),
            }
        }
        // Markers only attach to subjects some path actually matched
        if matched.is_empty() {
            continue;
        }
        bindings.extend(merge_in_field_order(matched, broken, map));
    }
    bindings
}

fn merge_in_field_order(
    matched: Vec<Binding>,
    broken: Vec<Binding>,
    map: &CompiledFieldMap,
) -> Vec<Binding> {
    if broken.is_empty() {
        return matched;
    }
    let mut all = Vec::with_capacity(matched.len() + broken.len());
    let mut matched = matched.into_iter().peekable();
    let mut broken = broken.into_iter().peekable();
    for field in map.fields() {
        while let Some(b) = matched.next_if(|b| &b.field == field) {
            all.push(b);
        }
        while let Some(b) = broken.next_if(|b| &b.field == field) {
            all.push(b);
        }
    }
    all
}

/// Follow `path` from `subject`. Intermediate steps only traverse node
/// objects; literals reached before the last step are dropped.
#[must_use]
pub fn evaluate<'g>(graph: &'g Graph, subject: &Node, path: &PredicatePath) -> Vec<&'g Object> {
    let steps = path.steps();
    let mut frontier = vec![subject.clone()];
    let mut values: Vec<&'g Object> = Vec::new();

    for (i, step) in steps.iter().enumerate() {
        values = frontier
            .iter()
            .flat_map(|node| {
                graph
                    .triples_for(node)
                    .filter(move |t| &t.predicate == step)
                    .map(|t| &t.object)
            })
            .collect();
        if i + 1 < steps.len() {
            frontier = values.iter().filter_map(|o| o.as_node().cloned()).collect();
        }
    }
    values
}
