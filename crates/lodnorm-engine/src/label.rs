//! Display label composition.

/// Labels longer than this (in characters) are truncated.
pub const MAX_LABEL_CHARS: usize = 98;
const TRUNCATED_CHARS: usize = 96;
const ELLIPSIS: &str = "...";

/// Compose the display label from language-resolved label and altlabel lists.
///
/// ```
/// use lodnorm_engine::full_label;
///
/// let labels = vec!["buttermilk".to_string(), "Babeurre".to_string()];
/// let alts = vec!["yummy".to_string(), "délicieux".to_string()];
/// assert_eq!(full_label(&labels, &alts), "[buttermilk, Babeurre] (yummy, délicieux)");
/// ```
#[must_use]
pub fn full_label(labels: &[String], altlabels: &[String]) -> String {
    let mut label = match labels {
        [] => String::new(),
        [only] => only.clone(),
        many => format!("[{}]", many.join(", ")),
    };
    if !altlabels.is_empty() {
        label.push_str(&format!(" ({})", altlabels.join(", ")));
    }
    if label.chars().count() > MAX_LABEL_CHARS {
        label = label.chars().take(TRUNCATED_CHARS).collect::<String>() + ELLIPSIS;
    }
    label.trim().to_string()
}
