//! Result consolidation: groups bindings into one multi-valued record per subject.

use std::collections::{BTreeMap, HashMap};

use lodnorm_core::{Field, Node, Value};
use tracing::warn;

use crate::extractor::{Binding, CompiledFieldMap};

/// Whether the selector predicate gates which records are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Records lacking the selector predicate are marked unselected.
    ApplySelector,
    /// Every record is selected (used for scoped lookups).
    All,
}

/// All values found for one subject, per configured field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedRecord {
    pub subject: Node,
    fields: BTreeMap<Field, Vec<Value>>,
    selected: bool,
}

impl ConsolidatedRecord {
    pub(crate) fn new(subject: Node, map: &CompiledFieldMap) -> Self {
        Self {
            subject,
            fields: map.fields().map(|f| (f.clone(), Vec::new())).collect(),
            selected: !map.has_selector(),
        }
    }

    /// Values for `field`, in binding order. Empty for configured fields
    /// with no bindings and for fields the map does not configure.
    #[must_use]
    pub fn values(&self, field: &Field) -> &[Value] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the map configures `field` for this record.
    #[must_use]
    pub fn has_field(&self, field: &Field) -> bool {
        self.fields.contains_key(field)
    }

    #[must_use]
    pub fn label(&self) -> &[Value] {
        self.values(&Field::Label)
    }

    #[must_use]
    pub fn altlabel(&self) -> &[Value] {
        self.values(&Field::AltLabel)
    }

    #[must_use]
    pub fn sort(&self) -> &[Value] {
        self.values(&Field::Sort)
    }

    #[must_use]
    pub fn context(&self, name: &str) -> &[Value] {
        self.values(&Field::Context(name.to_string()))
    }

    /// The first id value, if the subject has one.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.values(&Field::Id).first().map(Value::lexical)
    }

    /// The subject as an identifier string.
    #[must_use]
    pub fn uri(&self) -> String {
        self.subject.to_string()
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Group `bindings` by subject.
///
/// Records appear in first-seen subject order. Unselected records are kept
/// so callers can still see their ids; filter with
/// [`ConsolidatedRecord::is_selected`] before emitting.
#[must_use]
pub fn consolidate(
    bindings: Vec<Binding>,
    map: &CompiledFieldMap,
    selection: Selection,
) -> Vec<ConsolidatedRecord> {
    let mut records: Vec<ConsolidatedRecord> = Vec::new();
    let mut index: HashMap<Node, usize> = HashMap::new();

    for binding in bindings {
        let pos = *index.entry(binding.subject.clone()).or_insert_with(|| {
            records.push(ConsolidatedRecord::new(binding.subject.clone(), map));
            records.len() - 1
        });
        let record = &mut records[pos];

        if binding.field == Field::Selector {
            record.selected = true;
        }
        let value = match binding.value {
            Ok(obj) => Value::from(obj),
            Err(err) => {
                warn!(subject = %binding.subject, error = %err, "field degraded to parse error marker");
                Value::ParseError
            }
        };
        record.fields.entry(binding.field).or_default().push(value);
    }

    if selection == Selection::All {
        for record in &mut records {
            record.selected = true;
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{extract, Scope};
    use lodnorm_core::{FieldError, FieldMap, Graph, Literal, Object, Triple};

    const LABEL: &str = "http://x.org/label";
    const ID: &str = "http://x.org/id";
    const SEL: &str = "http://x.org/selectable";

    fn compiled(selector: bool) -> CompiledFieldMap {
        let mut map = FieldMap::with_label(LABEL);
        map.optional.id = Some(ID.to_string());
        map.optional.altlabel = Some("http://x.org/alt".to_string());
        if selector {
            map.optional.selector = Some(SEL.to_string());
        }
        CompiledFieldMap::compile(&map, &BTreeMap::new(), "search").unwrap()
    }

    fn graph() -> Graph {
        let a = Node::iri("http://x.org/a");
        let b = Node::iri("http://x.org/b");
        vec![
            Triple::new(a.clone(), LABEL, Literal::plain("one")),
            Triple::new(b.clone(), LABEL, Literal::plain("bee")),
            Triple::new(b.clone(), ID, Literal::plain("B")),
            Triple::new(a.clone(), LABEL, Literal::plain("two")),
            Triple::new(a.clone(), LABEL, Literal::plain("one")),
            Triple::new(b, SEL, Literal::plain("true")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn groups_values_in_binding_order_without_dedup() {
        let map = compiled(false);
        let records = consolidate(extract(&graph(), &map, Scope::AllSubjects), &map, Selection::ApplySelector);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].uri(), "http://x.org/a");
        let labels: Vec<String> = records[0].label().iter().map(Value::lexical).collect();
        assert_eq!(labels, vec!["one", "two", "one"]);
        assert!(records.iter().all(ConsolidatedRecord::is_selected));
    }

    #[test]
    fn unbound_fields_are_empty_not_absent() {
        let map = compiled(false);
        let records = consolidate(extract(&graph(), &map, Scope::AllSubjects), &map, Selection::ApplySelector);
        let a = &records[0];
        assert!(a.has_field(&Field::AltLabel));
        assert!(a.altlabel().is_empty());
        assert_eq!(a.id(), None);
        assert_eq!(records[1].id().as_deref(), Some("B"));
    }

    #[test]
    fn selector_marks_records_without_dropping_them() {
        let map = compiled(true);
        let bindings = extract(&graph(), &map, Scope::AllSubjects);
        let records = consolidate(bindings.clone(), &map, Selection::ApplySelector);
        assert_eq!(records.len(), 2);
        assert!(!records[0].is_selected());
        assert!(records[1].is_selected());

        let all = consolidate(bindings, &map, Selection::All);
        assert!(all.iter().all(ConsolidatedRecord::is_selected));
    }

    #[test]
    fn field_errors_become_markers() {
        let map = compiled(false);
        let a = Node::iri("http://x.org/a");
        let bindings = vec![
            Binding {
                subject: a.clone(),
                field: Field::Label,
                value: Ok(Object::Literal(Literal::plain("ok"))),
            },
            Binding {
                subject: a,
                field: Field::AltLabel,
                value: Err(FieldError::new("altlabel", "bad path")),
            },
        ];
        let records = consolidate(bindings, &map, Selection::ApplySelector);
        assert_eq!(records[0].label(), [Value::Literal(Literal::plain("ok"))]);
        assert_eq!(records[0].altlabel(), [Value::ParseError]);
    }
}
