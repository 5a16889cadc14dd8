use serde::{Deserialize, Serialize};

use super::model::ScreenConfig;

/// Persisted envelope for a screen: the [`ScreenConfig`] plus storage
/// identity. `config` is serialized with no additional wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenDocument {
    pub id: String,
    /// Stable lookup key, unique at the storage boundary.
    pub screen_key: String,
    pub screen_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub config: ScreenConfig,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}
