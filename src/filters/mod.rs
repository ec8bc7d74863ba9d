//! URL query state for listing pages.
//!
//! A [`FilterState`] is the set of active filters of a listing page. It is
//! parsed from, and written back to, the URL query string; absence of a key
//! means the filter is not applied.

use std::collections::BTreeMap;

use serde::Serialize;

pub mod query;
#[cfg(feature = "server")]
pub mod sync;

/// Query key carrying the requested page.
pub const PAGE_KEY: &str = "page";

/// Value of one filter key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Multi(Vec<String>),
}

impl FilterValue {
    /// Drops blank entries and collapses one-element lists.
    ///
    /// Returns `None` when nothing non-empty remains.
    pub fn normalize(self) -> Option<FilterValue> {
        match self {
            FilterValue::Single(value) => {
                (!value.trim().is_empty()).then_some(FilterValue::Single(value))
            }
            FilterValue::Multi(values) => {
                let mut values: Vec<String> = values
                    .into_iter()
                    .filter(|value| !value.trim().is_empty())
                    .collect();
                match values.len() {
                    0 => None,
                    1 => values.pop().map(FilterValue::Single),
                    _ => Some(FilterValue::Multi(values)),
                }
            }
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            FilterValue::Single(value) => Some(value.as_str()),
            FilterValue::Multi(values) => values.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(value) => vec![value.as_str()],
            FilterValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.values().contains(&candidate)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Multi(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}

/// Active filters keyed by query parameter name.
///
/// Every stored value is non-empty, so encoding a state and parsing it back
/// yields the same state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, FilterValue>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without the leading `?`.
    ///
    /// Repeated keys become multi values; malformed input yields an empty state.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_html_form::from_str(query).unwrap_or_default();
        Self::from_pairs(pairs)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in pairs {
            grouped.entry(key.into()).or_default().push(value.into());
        }

        let mut state = Self::new();
        for (key, values) in grouped {
            state.set(key, FilterValue::Multi(values));
        }
        state
    }

    /// Sets `key`, removing it when the value is empty.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        match value.into().normalize() {
            Some(value) => {
                self.0.insert(key, value);
            }
            None => {
                self.0.remove(&key);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FilterValue::first)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Copy of this state without `key`.
    pub fn without(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.remove(key);
        next
    }

    /// Copy of this state with `key` replaced.
    pub fn with(&self, key: &str, value: impl Into<FilterValue>) -> Self {
        let mut next = self.clone();
        next.set(key, value);
        next
    }

    /// Keeps only the keys accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|key, _| keep(key));
    }

    /// Flattens the state into query pairs, one pair per value.
    pub fn to_pairs(&self) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .flat_map(|(key, value)| {
                value
                    .values()
                    .into_iter()
                    .map(move |value| (key.as_str(), value))
            })
            .collect()
    }

    /// Encodes the state as a query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        serde_html_form::to_string(self.to_pairs()).unwrap_or_default()
    }

    /// `path` followed by the encoded query, or the bare path when empty.
    pub fn to_url(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.to_query_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_groups_repeated_keys() {
        let state = FilterState::parse("?status=active&course_id=1&course_id=2&search=");

        assert_eq!(state.first("status"), Some("active"));
        assert_eq!(
            state.get("course_id"),
            Some(&FilterValue::Multi(vec!["1".into(), "2".into()]))
        );
        assert!(!state.contains_key("search"));
    }

    #[test]
    fn empty_values_are_removed_on_set() {
        let mut state = FilterState::parse("search=Dhaka");
        state.set("search", "");
        assert!(state.is_empty());

        state.set("course_id", Vec::<String>::new());
        assert!(state.is_empty());
    }

    #[test]
    fn single_element_lists_collapse() {
        let mut state = FilterState::new();
        state.set("course_id", vec!["3", " "]);
        assert_eq!(state.get("course_id"), Some(&FilterValue::Single("3".into())));
    }

    #[test]
    fn encoding_then_parsing_reproduces_the_state() {
        let mut state = FilterState::new();
        state.set("search", "Dhaka North & South");
        state.set("course_id", vec!["1", "2", "3"]);
        state.set("sort_order", "desc");

        let encoded = state.to_query_string();
        assert_eq!(FilterState::parse(&encoded), state);
        assert_eq!(
            FilterState::parse(&FilterState::parse(&encoded).to_query_string()),
            state
        );
    }

    #[test]
    fn empty_state_renders_bare_path() {
        assert_eq!(FilterState::new().to_url("/dashboard/districts"), "/dashboard/districts");
        assert_eq!(
            FilterState::parse("search=Dhaka").to_url("/dashboard/districts"),
            "/dashboard/districts?search=Dhaka"
        );
    }
}
