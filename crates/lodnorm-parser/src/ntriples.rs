//! N-Triples document parsing.

use lodnorm_core::{Graph, Literal, Node, Object, Triple};
use pest::iterators::Pair;
use pest::Parser;

use crate::error::ParseError;
use crate::{LodParser, Rule};

/// Parse an N-Triples document into a [`Graph`], keeping statement order.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] for malformed input and
/// [`ParseError::InvalidEscape`] for a bad string escape.
pub fn parse_ntriples(input: &str) -> Result<Graph, ParseError> {
    let doc = LodParser::parse(Rule::ntriples_doc, input)?
        .next()
        .ok_or_else(|| ParseError::Syntax("empty document".to_string()))?;

    let mut graph = Graph::new();
    for pair in doc.into_inner() {
        if pair.as_rule() == Rule::triple {
            graph.push(build_triple(pair)?);
        }
    }
    Ok(graph)
}

fn build_triple(pair: Pair<Rule>) -> Result<Triple, ParseError> {
    let mut parts = pair.into_inner();
    let subject = first_inner(parts.next())?;
    let predicate = first_inner(parts.next())?;
    let object = first_inner(parts.next())?;

    let object = match object.as_rule() {
        Rule::literal => Object::Literal(build_literal(object)?),
        _ => Object::Node(build_node(object)),
    };
    Ok(Triple::new(build_node(subject), iri_text(predicate), object))
}

fn first_inner(pair: Option<Pair<Rule>>) -> Result<Pair<Rule>, ParseError> {
    pair.and_then(|p| p.into_inner().next())
        .ok_or_else(|| ParseError::Syntax("incomplete triple".to_string()))
}

fn build_node(pair: Pair<Rule>) -> Node {
    match pair.as_rule() {
        Rule::blank_node => Node::Blank(
            pair.into_inner()
                .next()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
        ),
        _ => Node::Iri(iri_text(pair)),
    }
}

pub(crate) fn iri_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

fn build_literal(pair: Pair<Rule>) -> Result<Literal, ParseError> {
    let mut literal = Literal::plain(String::new());
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::string_literal => {
                let raw = part.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                literal.value = unescape(raw)?;
            }
            Rule::lang_tag => {
                literal.language = Some(part.as_str().trim_start_matches('@').to_string());
            }
            Rule::datatype => {
                literal.datatype = part.into_inner().next().map(iri_text);
            }
            _ => {}
        }
    }
    Ok(literal)
}

fn unescape(raw: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next() {
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some('u') => hex_char(&mut chars, 4)?,
            Some('U') => hex_char(&mut chars, 8)?,
            Some(other) => return Err(ParseError::InvalidEscape(format!("\\{other}"))),
            None => return Err(ParseError::InvalidEscape("\\".to_string())),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, len: usize) -> Result<char, ParseError> {
    let digits: String = chars.by_ref().take(len).collect();
    let invalid = || ParseError::InvalidEscape(format!("\\u{digits}"));
    if digits.len() != len {
        return Err(invalid());
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(invalid)
}
