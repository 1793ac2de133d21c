//! RDF terms: nodes, literals, and the triples built from them.
//!
//! A graph returned by an authority is a flat list of [`Triple`]s. Subjects
//! are always [`Node`]s; objects are either a [`Node`] (a reference) or a
//! [`Literal`]. The literal/reference split drives context expansion, so it
//! is encoded in the type rather than inferred from strings.

use std::fmt;

use serde::{Serialize, Serializer};

/// Marker emitted in place of a value whose field could not be extracted.
pub const PARSE_ERROR_MARKER: &str = "PARSE ERROR";

/// A graph node: a concrete IRI or an anonymous (blank) node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(String),
    /// Blank node label, without the `_:` prefix.
    Blank(String),
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Node::Blank(label.into())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    /// The IRI, or `None` for blank nodes.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Blank(_) => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => f.write_str(iri),
            Node::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

/// A literal value with optional language tag and datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    /// A plain literal with neither language nor datatype.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged literal.
    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// A typed literal.
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }
}

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    Node(Node),
    Literal(Literal),
}

impl Object {
    /// Lexical form: the literal value, the IRI, or `_:label`.
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Object::Node(node) => node.to_string(),
            Object::Literal(lit) => lit.value.clone(),
        }
    }

    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Object::Node(node) => Some(node),
            Object::Literal(_) => None,
        }
    }
}

impl From<Literal> for Object {
    fn from(lit: Literal) -> Self {
        Object::Literal(lit)
    }
}

impl From<Node> for Object {
    fn from(node: Node) -> Self {
        Object::Node(node)
    }
}

/// A single subject/predicate/object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Node,
    pub predicate: String,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: Node, predicate: impl Into<String>, object: impl Into<Object>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A value held in a consolidated record field.
///
/// Mirrors [`Object`] but adds the per-field parse error marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Literal(Literal),
    Reference(Node),
    ParseError,
}

impl Value {
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Value::Literal(lit) => lit.value.clone(),
            Value::Reference(node) => node.to_string(),
            Value::ParseError => PARSE_ERROR_MARKER.to_string(),
        }
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    /// Language tag, for language-tagged literals only.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Value::Literal(lit) => lit.language.as_deref(),
            _ => None,
        }
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        match obj {
            Object::Node(node) => Value::Reference(node),
            Object::Literal(lit) => Value::Literal(lit),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.lexical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_nodes_display_with_prefix() {
        assert_eq!(Node::blank("b0").to_string(), "_:b0");
        assert_eq!(Node::iri("http://x.org/a").to_string(), "http://x.org/a");
        assert!(Node::blank("b0").as_iri().is_none());
    }

    #[test]
    fn value_lexical_forms() {
        let lit = Value::from(Object::Literal(Literal::tagged("Babeurre", "fr")));
        assert_eq!(lit.lexical(), "Babeurre");
        assert_eq!(lit.language(), Some("fr"));

        let reference = Value::from(Object::Node(Node::iri("http://x.org/a")));
        assert!(reference.is_reference());
        assert_eq!(reference.language(), None);

        assert_eq!(Value::ParseError.lexical(), PARSE_ERROR_MARKER);
    }

    #[test]
    fn value_serializes_as_plain_string() {
        let json = serde_json::to_string(&Value::ParseError).expect("serialize");
        assert_eq!(json, "\"PARSE ERROR\"");
        let json =
            serde_json::to_string(&Value::Literal(Literal::plain("Cornell"))).expect("serialize");
        assert_eq!(json, "\"Cornell\"");
    }
}
