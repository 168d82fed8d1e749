//! Comma-separated list codec
//!
//! Keywords and expertise are ordered string lists. They are stored as
//! native arrays, but still arrive as one comma-joined string from the
//! summarizer and from older clients, so both directions live here.
//!
//! Items are not escaped: an item that itself contains a comma is split
//! into several items on the way back. Empty items are dropped, so
//! `split("")` is `[]`, never `[""]`.

use serde::{Deserialize, Deserializer};

/// Separator used when joining lists.
pub const SEPARATOR: char = ',';

/// Join items into one comma-separated string.
pub fn join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<&str>>()
        .join(",")
}

/// Split a comma-separated string, trimming each item and dropping empties.
pub fn split(encoded: &str) -> Vec<String> {
    encoded
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Trim every item and drop the empty ones, keeping order.
pub fn normalize<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListRepr {
    Items(Vec<String>),
    Joined(String),
}

impl ListRepr {
    fn into_items(self) -> Vec<String> {
        match self {
            Self::Items(items) => normalize(items),
            Self::Joined(joined) => split(&joined),
        }
    }
}

/// Serde helper accepting a JSON array, a comma-separated string or null.
///
/// Use with `#[serde(default, deserialize_with = "list::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<ListRepr>::deserialize(deserializer)?;
    Ok(repr.map(ListRepr::into_items).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient")]
        keywords: Vec<String>,
    }

    fn items(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_is_empty_list() {
        assert!(split("").is_empty());
        assert!(split("   ").is_empty());
        assert_eq!(join::<String>(&[]), "");
    }

    #[test]
    fn split_trims_whitespace() {
        assert_eq!(
            split("traffic , infrastructure,urban planning "),
            items(&["traffic", "infrastructure", "urban planning"])
        );
    }

    #[test]
    fn split_drops_empty_items() {
        assert_eq!(split("a,,b,"), items(&["a", "b"]));
    }

    #[test]
    fn embedded_commas_do_not_survive() {
        let original = items(&["roads, bridges", "transit"]);
        let back = split(&join(&original));
        assert_eq!(back, items(&["roads", "bridges", "transit"]));
        assert_ne!(back, original);
    }

    #[test]
    fn lenient_accepts_array_string_and_null() {
        let h: Holder = serde_json::from_str(r#"{"keywords": [" a ", "", "b"]}"#).unwrap();
        assert_eq!(h.keywords, items(&["a", "b"]));

        let h: Holder = serde_json::from_str(r#"{"keywords": "a, b"}"#).unwrap();
        assert_eq!(h.keywords, items(&["a", "b"]));

        let h: Holder = serde_json::from_str(r#"{"keywords": null}"#).unwrap();
        assert!(h.keywords.is_empty());

        let h: Holder = serde_json::from_str("{}").unwrap();
        assert!(h.keywords.is_empty());
    }

    proptest! {
        #[test]
        fn round_trip_without_commas(
            list in prop::collection::vec("[a-z0-9][a-z0-9 ]{0,10}[a-z0-9]", 0..8)
        ) {
            prop_assert_eq!(split(&join(&list)), list);
        }
    }
}
