//! Identifier conversions used to derive trigger slugs and display names.

use std::sync::LazyLock;

use regex::Regex;

static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("static regex"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("static regex"));

/// Convert a CamelCase identifier into lowercase `snake_case`.
///
/// Runs of capitals are kept together, so `HTTPServer` becomes `http_server`.
/// No uniqueness checking happens here; the registry rejects collisions.
pub fn snake_case(name: &str) -> String {
    let partial = WORD_START.replace_all(name, "${1}_${2}");
    CASE_BOUNDARY
        .replace_all(&partial, "${1}_${2}")
        .to_lowercase()
}

/// Human-readable form of a snake_case name: `new_article` → `New article`.
pub fn display_name(trigger_name: &str) -> String {
    let spaced = trigger_name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
