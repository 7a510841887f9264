use std::collections::BTreeMap;

use serde_json::Value;

use super::params::PAGE_KEY;

/// Scalar filter criteria, keyed by field name. Ordered so the serialized
/// form is a stable cache key.
pub type FilterSet = BTreeMap<String, Value>;

/// Per-field routing rule. The two flags replace the source dashboard's
/// separate "excluded from query filter" and "not shown in search params"
/// lists: one controls the server payload, the other URL persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub send_to_server: bool,
    pub persist_in_url: bool,
}

impl Default for FieldRule {
    fn default() -> Self {
        Self {
            send_to_server: true,
            persist_in_url: true,
        }
    }
}

impl FieldRule {
    pub fn internal() -> Self {
        Self {
            send_to_server: false,
            persist_in_url: true,
        }
    }

    pub fn transient() -> Self {
        Self {
            send_to_server: true,
            persist_in_url: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterRules {
    rules: BTreeMap<String, FieldRule>,
}

impl FilterRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, rule: FieldRule) -> Self {
        self.rules.insert(field.to_string(), rule);
        self
    }

    pub fn rule(&self, field: &str) -> FieldRule {
        self.rules.get(field).copied().unwrap_or_default()
    }
}

/// The three filter layers, later layers override earlier on key collision.
#[derive(Debug, Clone, Default)]
pub struct FilterLayers {
    pub defaults: FilterSet,
    pub url: FilterSet,
    pub hidden: FilterSet,
}

impl FilterLayers {
    /// Merged view of all three layers. Null values act as deletions.
    pub fn merged(&self) -> FilterSet {
        let mut merged = self.defaults.clone();
        for (key, value) in self.url.iter().chain(self.hidden.iter()) {
            if value.is_null() {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged.remove(PAGE_KEY);
        merged
    }

    /// Server-bound parameter map: merged layers minus fields not routed to
    /// the server, plus the 0-based page and the fixed page size.
    pub fn canonical_query(&self, rules: &FilterRules, display_page: u32, page_size: u32) -> FilterSet {
        let mut query: FilterSet = self
            .merged()
            .into_iter()
            .filter(|(key, _)| rules.rule(key).send_to_server)
            .collect();
        query.insert(PAGE_KEY.to_string(), Value::from(display_page.saturating_sub(1)));
        query.insert("size".to_string(), Value::from(page_size));
        query
    }
}

/// Renders a filter map as URL write instructions, dropping fields whose rule
/// keeps them out of the address bar.
pub fn url_partial(filters: &FilterSet, rules: &FilterRules) -> BTreeMap<String, Option<String>> {
    filters
        .iter()
        .filter(|(key, _)| rules.rule(key).persist_in_url)
        .map(|(key, value)| (key.clone(), scalar_to_string(value)))
        .collect()
}

/// Query-pair form of a canonical query, for the transport layer.
pub fn query_pairs(query: &FilterSet) -> Vec<(String, String)> {
    query
        .iter()
        .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key.clone(), v)))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layers() -> FilterLayers {
        FilterLayers {
            defaults: FilterSet::from([("status".to_string(), json!(1))]),
            url: FilterSet::from([("name".to_string(), json!("abc"))]),
            hidden: FilterSet::from([("movieId".to_string(), json!("m-1"))]),
        }
    }

    #[test]
    fn later_layers_override_earlier() {
        let mut layers = layers();
        layers.url.insert("status".to_string(), json!(2));
        layers.hidden.insert("status".to_string(), json!(3));
        assert_eq!(layers.merged().get("status"), Some(&json!(3)));
    }

    #[test]
    fn canonical_query_translates_page_and_size() {
        let query = layers().canonical_query(&FilterRules::new(), 1, 20);
        assert_eq!(query.get("status"), Some(&json!(1)));
        assert_eq!(query.get("name"), Some(&json!("abc")));
        assert_eq!(query.get("movieId"), Some(&json!("m-1")));
        assert_eq!(query.get("page"), Some(&json!(0)));
        assert_eq!(query.get("size"), Some(&json!(20)));

        let page_three = layers().canonical_query(&FilterRules::new(), 3, 20);
        assert_eq!(page_three.get("page"), Some(&json!(2)));
    }

    #[test]
    fn internal_fields_never_reach_the_server() {
        let rules = FilterRules::new().with("tab", FieldRule::internal());
        let mut layers = layers();
        layers.url.insert("tab".to_string(), json!("pending"));
        let query = layers.canonical_query(&rules, 1, 20);
        assert!(!query.contains_key("tab"));
    }

    #[test]
    fn transient_fields_never_reach_the_url() {
        let rules = FilterRules::new().with("movieId", FieldRule::transient());
        let filters = FilterSet::from([
            ("movieId".to_string(), json!("m-1")),
            ("name".to_string(), json!("abc")),
        ]);
        let partial = url_partial(&filters, &rules);
        assert!(!partial.contains_key("movieId"));
        assert_eq!(partial.get("name"), Some(&Some("abc".to_string())));
    }

    #[test]
    fn null_values_delete_defaults() {
        let mut layers = layers();
        layers.url.insert("status".to_string(), Value::Null);
        assert!(!layers.merged().contains_key("status"));
    }

    #[test]
    fn page_key_in_url_layer_is_ignored() {
        let mut layers = layers();
        layers.url.insert("page".to_string(), json!("4"));
        let query = layers.canonical_query(&FilterRules::new(), 2, 10);
        assert_eq!(query.get("page"), Some(&json!(1)));
    }
}
