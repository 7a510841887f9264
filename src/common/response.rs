use serde::{Deserialize, Serialize};

/// One page of a resource collection as returned by the back office API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListData<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
}

/// Envelope for list endpoints. `data` is only meaningful when `result` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ListData<T>>,
}

impl<T> ListEnvelope<T> {
    pub fn success(data: ListData<T>) -> Self {
        Self {
            result: true,
            code: None,
            data: Some(data),
        }
    }

    pub fn failure(code: &str) -> Self {
        Self {
            result: false,
            code: Some(code.to_string()),
            data: None,
        }
    }
}

/// Envelope for mutation endpoints (delete, reorder commit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationEnvelope {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl MutationEnvelope {
    pub fn success() -> Self {
        Self {
            result: true,
            code: None,
            data: None,
        }
    }

    pub fn failure(code: &str) -> Self {
        Self {
            result: false,
            code: Some(code.to_string()),
            data: None,
        }
    }
}
