//! Delimited list and `key=value` block parsers
//!
//! Both formats come from flat data-source property sets: a value list is a
//! single string like `"SET ROLE app;SET TIME ZONE 'UTC'"`, a property block
//! is a single string like `"ssl=true;loginTimeout=10"`.

use std::collections::BTreeMap;

use crate::error::{PropertiesError, PropertiesResult};

/// Splits a delimited string into its non-empty tokens.
///
/// Tokens are not trimmed; runs of consecutive delimiters collapse, so empty
/// tokens never appear in the output. The empty string yields an empty
/// vector. There is no escaping mechanism, so a delimiter character cannot
/// occur inside a token.
pub fn parse_list(value: &str, delimiter: char) -> Vec<String> {
    value
        .split(delimiter)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a `key=value` property block into a map.
///
/// Entries are separated by semicolons or newlines. Each non-empty entry is
/// trimmed, then split at its first `=`; key and value are trimmed
/// independently. Later entries overwrite earlier ones for the same key.
/// An empty input yields an empty map.
///
/// # Errors
///
/// Returns [`PropertiesError::MalformedEntry`] for any entry with no `=`, or
/// with `=` as the very first or very last character; the error names both
/// the offending entry and the full original input.
pub fn parse_properties(text: &str) -> PropertiesResult<BTreeMap<String, String>> {
    let mut properties = BTreeMap::new();
    for entry in text.split(|c| c == ';' || c == '\n') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((key, value)) = entry.split_once('=') else {
            return Err(malformed(entry, text));
        };
        if key.is_empty() || value.is_empty() {
            return Err(malformed(entry, text));
        }
        properties.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(properties)
}

fn malformed(entry: &str, input: &str) -> PropertiesError {
    PropertiesError::MalformedEntry {
        entry: entry.to_string(),
        input: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_splits_on_delimiter() {
        assert_eq!(parse_list("a;b;c", ';'), vec!["a", "b", "c"]);
        assert_eq!(parse_list("08003,08004", ','), vec!["08003", "08004"]);
    }

    #[test]
    fn test_parse_list_empty_input_yields_empty_list() {
        assert!(parse_list("", ',').is_empty());
        assert!(parse_list(";;;", ';').is_empty());
    }

    #[test]
    fn test_parse_list_skips_empty_tokens() {
        assert_eq!(parse_list("a;;b;", ';'), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_list_does_not_trim_tokens() {
        assert_eq!(parse_list("a ; b", ';'), vec!["a ", " b"]);
    }

    #[test]
    fn test_parse_properties_basic_block() {
        let props = parse_properties("a=1;b=2").expect("valid block");
        assert_eq!(props.get("a").map(String::as_str), Some("1"));
        assert_eq!(props.get("b").map(String::as_str), Some("2"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_parse_properties_trims_keys_and_values() {
        let props = parse_properties(" ssl = true ; loginTimeout = 10 ").expect("valid block");
        assert_eq!(props.get("ssl").map(String::as_str), Some("true"));
        assert_eq!(props.get("loginTimeout").map(String::as_str), Some("10"));
    }

    #[test]
    fn test_parse_properties_accepts_newline_separators() {
        let props = parse_properties("a=1\nb=2").expect("valid block");
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_parse_properties_empty_input_yields_empty_map() {
        assert!(parse_properties("").expect("empty is valid").is_empty());
        assert!(parse_properties(";;").expect("blank entries skipped").is_empty());
    }

    #[test]
    fn test_parse_properties_value_may_contain_equals() {
        let props = parse_properties("options=-c search_path=app").expect("valid block");
        assert_eq!(
            props.get("options").map(String::as_str),
            Some("-c search_path=app")
        );
    }

    #[test]
    fn test_parse_properties_rejects_entry_without_equals() {
        let err = parse_properties("a=1;bad").expect_err("malformed entry");
        let PropertiesError::MalformedEntry { entry, input } = err;
        assert_eq!(entry, "bad");
        assert_eq!(input, "a=1;bad");
    }

    #[test]
    fn test_parse_properties_rejects_equals_at_start_or_end() {
        assert!(parse_properties("=1").is_err());
        assert!(parse_properties("a=").is_err());
    }

    #[test]
    fn test_parse_properties_last_entry_wins_for_duplicate_keys() {
        let props = parse_properties("a=1;a=2").expect("valid block");
        assert_eq!(props.get("a").map(String::as_str), Some("2"));
    }
}
