//! `${name}` placeholder scanning.
//!
//! A placeholder is the shortest single-line, non-empty run between `${` and the next `}`.
use std::sync::LazyLock;

use regex::{Captures, Regex};
use relay_model::VarPool;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.+?)\}").expect("placeholder pattern is valid"));

/// Names referenced via `${name}` in `text`, in order of appearance (duplicates kept).
pub fn placeholder_names(text: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Replace each `${name}` with the value of the first pool entry called `name`.
///
/// Placeholders without a matching entry are left untouched.
pub fn render_placeholders(text: &str, values: &VarPool) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(p) => p.value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_model::Property;

    #[test]
    fn finds_names_in_order() {
        let text = r#"{"sql": "select * from ${table} where dt = '${dt}'", "again": "${table}"}"#;
        assert_eq!(placeholder_names(text), vec!["table", "dt", "table"]);
    }

    #[test]
    fn no_placeholders_yields_nothing() {
        assert!(placeholder_names("plain $text {braces} $ {x}").is_empty());
        assert!(placeholder_names("").is_empty());
    }

    #[test]
    fn unterminated_placeholder_ends_scan() {
        assert_eq!(placeholder_names("${a} and ${b"), vec!["a"]);
    }

    #[test]
    fn name_is_shortest_match() {
        assert_eq!(placeholder_names("${a}}"), vec!["a"]);
        assert_eq!(placeholder_names("${x.y[0]}"), vec!["x.y[0]"]);
    }

    #[test]
    fn names_do_not_span_lines() {
        assert_eq!(placeholder_names("${a\nb} ${c}"), vec!["c"]);
    }

    #[test]
    fn empty_braces_absorb_next_brace_like_a_lazy_match() {
        assert_eq!(placeholder_names("${}}"), vec!["}"]);
    }

    #[test]
    fn render_substitutes_known_names_only() {
        let pool: VarPool = vec![
            Property::input("table", "orders"),
            Property::input("dt", "2024-01-01"),
        ]
        .into();
        let out = render_placeholders("from ${table} at ${dt} by ${user}", &pool);
        assert_eq!(out, "from orders at 2024-01-01 by ${user}");
    }

    #[test]
    fn render_inserts_values_literally() {
        let pool: VarPool = vec![Property::input("price", "$1 ${price}")].into();
        assert_eq!(render_placeholders("cost: ${price}", &pool), "cost: $1 ${price}");
    }

    #[test]
    fn render_without_placeholders_is_identity() {
        let pool = VarPool::new();
        assert_eq!(render_placeholders("nothing here", &pool), "nothing here");
    }
}
