use std::collections::BTreeMap;
use url::form_urlencoded;

/// Reserved query key for the 1-based display page. Omitted from the URL when
/// the value is 1 so page-one URLs stay canonical.
pub const PAGE_KEY: &str = "page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Merge the partial into the current params, dropping keys set to `None`.
    Merge,
    /// Discard the current params entirely before applying the partial.
    Replace,
}

/// The page's address-bar query string, held in memory. The host view layer
/// is expected to mirror writes into the real location without a navigation.
#[derive(Debug, Clone, Default)]
pub struct QueryBridge {
    params: BTreeMap<String, String>,
}

impl QueryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query_string(raw: &str) -> Self {
        let params = form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { params }
    }

    pub fn read(&self) -> BTreeMap<String, String> {
        self.params.clone()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn write(&mut self, partial: BTreeMap<String, Option<String>>, mode: WriteMode) {
        if mode == WriteMode::Replace {
            self.params.clear();
        }
        for (key, value) in partial {
            match value {
                Some(v) => {
                    self.params.insert(key, v);
                }
                None => {
                    self.params.remove(&key);
                }
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.params.remove(key);
    }

    /// 1-based display page, defaulting to 1 when absent or unparseable.
    pub fn display_page(&self) -> u32 {
        self.get(PAGE_KEY)
            .and_then(|v| v.parse::<u32>().ok())
            .map(|p| p.max(1))
            .unwrap_or(1)
    }

    pub fn set_display_page(&mut self, page: u32) {
        if page <= 1 {
            self.params.remove(PAGE_KEY);
        } else {
            self.params.insert(PAGE_KEY.to_string(), page.to_string());
        }
    }

    pub fn serialize(&self) -> String {
        let mut encoder = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            encoder.append_pair(key, value);
        }
        encoder.finish()
    }
}
