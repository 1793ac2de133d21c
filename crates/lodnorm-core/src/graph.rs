//! In-memory graph: an ordered list of triples with lookup helpers.
//!
//! Triple order is preserved exactly as received. Every multi-valued field
//! downstream keeps first-seen order, so lookups here never reorder.
//! Subject lookups go through an index kept in step with the triple list.

use std::collections::{HashMap, HashSet};

use crate::term::{Node, Object, Triple};

/// An ordered set of triples returned by one authority fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: Vec<Triple>,
    by_subject: HashMap<Node, Vec<usize>>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triple: Triple) {
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(self.triples.len());
        self.triples.push(triple);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects in first-seen order, blank nodes included.
    #[must_use]
    pub fn subjects(&self) -> Vec<&Node> {
        let mut seen: HashSet<&Node> = HashSet::new();
        self.triples
            .iter()
            .map(|t| &t.subject)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// All triples whose subject is `subject`, in graph order.
    pub fn triples_for<'a>(&'a self, subject: &Node) -> impl Iterator<Item = &'a Triple> + 'a {
        self.by_subject
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.triples[i])
    }

    /// Objects of `subject predicate ?o`, in graph order.
    pub fn objects<'a>(
        &'a self,
        subject: &Node,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Object> + 'a {
        self.triples_for(subject)
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    #[must_use]
    pub fn has_subject(&self, subject: &Node) -> bool {
        self.by_subject.contains_key(subject)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.push(triple);
        }
    }
}
