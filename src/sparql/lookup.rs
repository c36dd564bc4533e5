//! Lookup helpers over raw result rows
//!
//! These work on [`BindingRow`]s as returned by `QueryResult::rows`, matching
//! on the lexical value of a binding. Most are meant for `?s ?p ?o` shaped
//! results, hence the `s`/`p` defaults.

use super::results::BindingRow;
use indexmap::IndexMap;

/// Variable name conventionally used for subjects
pub const SUBJECT_VAR: &str = "s";
/// Variable name conventionally used for predicates
pub const PREDICATE_VAR: &str = "p";

/// First row whose `?p` value contains `needle`
pub fn find_by_predicate<'a>(needle: &str, rows: &'a [BindingRow]) -> Option<&'a BindingRow> {
    find_by_variable(needle, PREDICATE_VAR, rows)
}

/// First row whose value for `variable` contains `needle`
pub fn find_by_variable<'a>(
    needle: &str,
    variable: &str,
    rows: &'a [BindingRow],
) -> Option<&'a BindingRow> {
    rows.iter().find(|row| {
        row.get(variable)
            .map_or(false, |binding| binding.value.contains(needle))
    })
}

/// Value of `variable` in the first row
pub fn first_value<'a>(variable: &str, rows: &'a [BindingRow]) -> Option<&'a str> {
    rows.first()
        .and_then(|row| row.get(variable))
        .map(|binding| binding.value.as_str())
}

/// Rows grouped by their `?s` value, groups in first-seen order
pub fn group_by_subject(rows: &[BindingRow]) -> IndexMap<&str, Vec<&BindingRow>> {
    group_by(rows, SUBJECT_VAR)
}

/// Rows grouped by their value for `variable`; rows without it are left out
pub fn group_by<'a>(rows: &'a [BindingRow], variable: &str) -> IndexMap<&'a str, Vec<&'a BindingRow>> {
    let mut groups: IndexMap<&str, Vec<&BindingRow>> = IndexMap::new();
    for row in rows {
        if let Some(binding) = row.get(variable) {
            groups.entry(binding.value.as_str()).or_default().push(row);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::Binding;

    fn row(pairs: &[(&str, Binding)]) -> BindingRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn spo() -> Vec<BindingRow> {
        vec![
            row(&[
                ("s", Binding::uri("http://example.org/alice")),
                ("p", Binding::uri("http://xmlns.com/foaf/0.1/name")),
                ("o", Binding::literal("Alice")),
            ]),
            row(&[
                ("s", Binding::uri("http://example.org/bob")),
                ("p", Binding::uri("http://xmlns.com/foaf/0.1/knows")),
                ("o", Binding::uri("http://example.org/alice")),
            ]),
            row(&[
                ("s", Binding::uri("http://example.org/alice")),
                ("p", Binding::uri("http://xmlns.com/foaf/0.1/age")),
                ("o", Binding::typed_literal("30", "http://www.w3.org/2001/XMLSchema#integer")),
            ]),
            row(&[("o", Binding::literal("orphan"))]),
        ]
    }

    #[test]
    fn test_find_by_predicate() {
        let rows = spo();
        let found = find_by_predicate("knows", &rows).unwrap();
        assert_eq!(found["s"].value, "http://example.org/bob");

        assert!(find_by_predicate("homepage", &rows).is_none());
    }

    #[test]
    fn test_find_by_variable() {
        let rows = spo();
        let found = find_by_variable("example.org/alice", "o", &rows).unwrap();
        assert_eq!(found["p"].value, "http://xmlns.com/foaf/0.1/knows");

        assert!(find_by_variable("alice", "missing", &rows).is_none());
    }

    #[test]
    fn test_first_value() {
        let rows = spo();
        assert_eq!(first_value("o", &rows), Some("Alice"));
        assert_eq!(first_value("x", &rows), None);
        assert_eq!(first_value("o", &[]), None);
    }

    #[test]
    fn test_group_by_subject() {
        let rows = spo();
        let groups = group_by_subject(&rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), ["http://example.org/alice", "http://example.org/bob"]);
        assert_eq!(groups["http://example.org/alice"].len(), 2);
        assert_eq!(groups["http://example.org/bob"].len(), 1);
    }

    #[test]
    fn test_group_by_variable() {
        let rows = spo();
        let groups = group_by(&rows, "o");
        assert_eq!(groups.len(), 4);
        assert_eq!(groups["orphan"].len(), 1);
    }
}
