use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for populating a widget from an external HTTP call. The
/// engine never performs the call itself; a host-supplied
/// [`DataFetcher`](super::DataFetcher) does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub url: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mapping: Option<ResponseMapping>,
    // Testing/mocking support
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_response: Option<Value>,
    #[serde(default)]
    pub use_mock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
}

/// How a raw response maps onto a widget: exactly one of the three sections
/// is expected to be set; they are tried in order (options, value, table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_data: Option<TableDataMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsMapping {
    /// Dot path to the array of option records.
    pub path: String,
    pub value_field: String,
    pub label_field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMapping {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDataMapping {
    /// Dot path to the array of row records.
    pub path: String,
    /// Column id -> dot path within each row record.
    pub columns: IndexMap<String, String>,
}

/// Per-widget binding options carried on the widget itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBindingOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_config: Option<ApiConfig>,
    #[serde(default)]
    pub load_on_render: bool,
    /// Fields whose changes should re-run this widget's binding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refresh_triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_state: Option<LoadingState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_handling: Option<ErrorHandling>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub show: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHandling {
    pub show_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_config_round_trips() {
        let raw = json!({
            "url": "https://rates.example.com/v1/makes",
            "method": "GET",
            "responseMapping": {
                "options": {
                    "path": "data.makes",
                    "valueField": "code",
                    "labelField": "name"
                }
            },
            "useMock": false
        });
        let config: ApiConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(config.method, HttpMethod::Get);
        assert_eq!(
            config.response_mapping.as_ref().unwrap().options.as_ref().unwrap().path,
            "data.makes"
        );
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }
}
