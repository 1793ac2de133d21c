//! Language resolution for multi-lingual literal lists.
//!
//! Precedence, highest first:
//! 1. language passed explicitly to the call
//! 2. language(s) configured on the authority
//! 3. engine-wide default language(s)
//! 4. no filtering
//!
//! The resolved [`LanguageSet`] is computed once at the start of a call and
//! then only read, so later changes to engine settings cannot affect a call
//! already in flight.

use lodnorm_core::Value;

/// The languages a call keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSet {
    /// Keep every value.
    Any,
    /// Keep values in these languages, in this order.
    Only(Vec<String>),
}

impl LanguageSet {
    /// Resolve the effective languages from the three configuration tiers.
    #[must_use]
    pub fn resolve(explicit: Option<&str>, authority: &[String], default: &[String]) -> Self {
        if let Some(lang) = explicit.map(str::trim).filter(|l| !l.is_empty()) {
            return LanguageSet::Only(vec![lang.to_string()]);
        }
        for tier in [authority, default] {
            let langs: Vec<String> = tier
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            if !langs.is_empty() {
                return LanguageSet::Only(langs);
            }
        }
        LanguageSet::Any
    }

    /// Filter a value list.
    ///
    /// Literals tagged with a resolved language are kept, grouped in
    /// resolved-language order. Untagged literals, references, and parse
    /// error markers are never filtered and follow the tagged matches. If
    /// nothing survives, the list is returned unfiltered.
    #[must_use]
    pub fn filter(&self, values: &[Value]) -> Vec<Value> {
        let LanguageSet::Only(langs) = self else {
            return values.to_vec();
        };

        let untagged_rank = langs.len();
        let mut ranked: Vec<(usize, &Value)> = values
            .iter()
            .filter_map(|v| match v.language() {
                None => Some((untagged_rank, v)),
                Some(tag) => langs
                    .iter()
                    .position(|lang| tag_matches(tag, lang))
                    .map(|rank| (rank, v)),
            })
            .collect();

        if ranked.is_empty() {
            return values.to_vec();
        }
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked.into_iter().map(|(_, v)| v.clone()).collect()
    }

    /// Filter, then take lexical forms.
    #[must_use]
    pub fn lexical(&self, values: &[Value]) -> Vec<String> {
        self.filter(values).iter().map(Value::lexical).collect()
    }
}

/// `en` matches `en`, `EN`, and `en-US`; `en-US` matches only `en-US`.
fn tag_matches(tag: &str, lang: &str) -> bool {
    if tag.eq_ignore_ascii_case(lang) {
        return true;
    }
    tag.len() > lang.len()
        && tag.as_bytes()[lang.len()] == b'-'
        && tag[..lang.len()].eq_ignore_ascii_case(lang)
}
