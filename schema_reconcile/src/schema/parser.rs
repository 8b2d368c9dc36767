//! Column definition parser
//!
//! Turns a raw declared column list (the text between the parentheses of a
//! `CREATE TABLE`) into an ordered list of [`ColumnSpec`], dropping
//! table-level constraint clauses such as `PRIMARY KEY(id)`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::spec::ColumnSpec;

/// Matches the leading token of a table-level constraint clause
/// (`PRIMARY`, `UNIQUE`, `FOREIGN_KEY`, ...): uppercase letters and
/// underscores only. Column names, by convention, are not written this way.
static CONSTRAINT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_]+$").unwrap());

/// Parse a raw column list into ordered column specs.
///
/// Segments are split on top-level commas only, so parameterized types such
/// as `DECIMAL(10,2)` stay in one piece. Output order matches declared order,
/// minus the filtered constraint clauses.
pub fn parse_column_definitions(raw_schema: &str) -> Vec<ColumnSpec> {
    split_top_level(raw_schema)
        .into_iter()
        .filter_map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }

            let (name, definition) = match segment.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim()),
                None => (segment, ""),
            };

            if CONSTRAINT_TOKEN.is_match(name) {
                return None;
            }

            Some(ColumnSpec {
                name: name.to_string(),
                definition: definition.to_string(),
            })
        })
        .collect()
}

/// Split a string on commas, ignoring commas nested inside parentheses.
pub fn split_top_level(input: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;

    for ch in input.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        segments.push(current);
    }

    segments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn parameterized_types_are_not_split() {
        let columns = parse_column_definitions("price DECIMAL(10,2) NOT NULL, qty INT");

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "price");
        assert_eq!(columns[0].definition, "DECIMAL(10,2) NOT NULL");
        assert_eq!(columns[1].name, "qty");
        assert_eq!(columns[1].definition, "INT");
    }

    #[test]
    fn constraint_clauses_are_filtered() {
        let columns = parse_column_definitions("id INT, PRIMARY KEY(id)");

        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "id");
    }

    #[rstest]
    #[case("UNIQUE KEY uq_email (email)")]
    #[case("FOREIGN_KEY fk_user (user_id)")]
    #[case("CONSTRAINT chk CHECK (qty > 0)")]
    fn uppercase_leading_tokens_mark_constraints(#[case] clause: &str) {
        let raw = format!("id INT, {}", clause);
        let columns = parse_column_definitions(&raw);

        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "id");
    }

    #[test]
    fn declared_order_is_preserved() {
        let columns = parse_column_definitions(
            "id INT, name VARCHAR(64), PRIMARY KEY(id), email VARCHAR(255) NOT NULL",
        );

        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email"]);
    }

    #[test]
    fn bare_column_name_gets_empty_definition() {
        let columns = parse_column_definitions("flags");

        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "flags");
        assert_eq!(columns[0].definition, "");
    }

    #[test]
    fn empty_input_yields_no_columns() {
        assert!(parse_column_definitions("").is_empty());
        assert!(parse_column_definitions("  ,  , ").is_empty());
    }

    #[test]
    fn nested_parentheses_stay_in_one_segment() {
        let segments = split_top_level("a ENUM('x','y'), b SET('p,q','r')");

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].trim(), "b SET('p,q','r')");
    }
}
