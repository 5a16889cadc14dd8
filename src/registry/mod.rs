use std::fmt;

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{ScreenDocument, generate_id};
use crate::schema::{load_screen_config, validate};

/// Rejections at the persistence boundary. Validation failures carry the
/// validator's complete error list so the editor can display it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateKey(String),
    NotFound(String),
    InvalidConfig(Vec<String>),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateKey(key) => {
                write!(f, "screen key '{key}' already exists")
            }
            RegistryError::NotFound(id) => write!(f, "screen '{id}' not found"),
            RegistryError::InvalidConfig(errors) => {
                write!(f, "screen configuration is invalid: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Payload for creating or updating a screen. The config arrives as raw JSON
/// and is validated before it is accepted.
#[derive(Debug, Clone)]
pub struct ScreenDraft {
    pub screen_key: String,
    pub screen_name: String,
    pub description: Option<String>,
    pub config: Value,
    pub is_active: bool,
}

/// CRUD surface for screen documents. `screenKey` uniqueness is enforced
/// here, at the storage boundary; updates follow last-write-wins.
pub trait ScreenRegistry {
    fn list(&self) -> Vec<ScreenDocument>;
    fn get(&self, id: &str) -> Option<ScreenDocument>;
    fn get_by_key(&self, screen_key: &str) -> Option<ScreenDocument>;
    fn create(&mut self, draft: ScreenDraft) -> Result<ScreenDocument, RegistryError>;
    fn update(&mut self, id: &str, draft: ScreenDraft) -> Result<ScreenDocument, RegistryError>;
    fn delete(&mut self, id: &str) -> Result<(), RegistryError>;
}

/// In-memory registry, primarily for previews and tests. Preserves insertion
/// order for listing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    documents: IndexMap<String, ScreenDocument>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn checked_config(draft: &ScreenDraft) -> Result<crate::domain::ScreenConfig, RegistryError> {
        let report = validate(&draft.config);
        if !report.valid {
            return Err(RegistryError::InvalidConfig(report.errors));
        }
        load_screen_config(&draft.config)
            .map_err(|err| RegistryError::InvalidConfig(vec![err.to_string()]))
    }
}

impl ScreenRegistry for InMemoryRegistry {
    fn list(&self) -> Vec<ScreenDocument> {
        self.documents.values().cloned().collect()
    }

    fn get(&self, id: &str) -> Option<ScreenDocument> {
        self.documents.get(id).cloned()
    }

    fn get_by_key(&self, screen_key: &str) -> Option<ScreenDocument> {
        self.documents
            .values()
            .find(|document| document.screen_key == screen_key)
            .cloned()
    }

    fn create(&mut self, draft: ScreenDraft) -> Result<ScreenDocument, RegistryError> {
        if self.get_by_key(&draft.screen_key).is_some() {
            return Err(RegistryError::DuplicateKey(draft.screen_key));
        }
        let config = Self::checked_config(&draft)?;
        let now = timestamp();
        let document = ScreenDocument {
            id: generate_id(),
            screen_key: draft.screen_key,
            screen_name: draft.screen_name,
            description: draft.description,
            config,
            is_active: draft.is_active,
            created_at: now.clone(),
            updated_at: now,
        };
        self.documents.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    fn update(&mut self, id: &str, draft: ScreenDraft) -> Result<ScreenDocument, RegistryError> {
        if !self.documents.contains_key(id) {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        // The key may move, but not onto another document.
        if let Some(existing) = self.get_by_key(&draft.screen_key)
            && existing.id != id
        {
            return Err(RegistryError::DuplicateKey(draft.screen_key));
        }
        let config = Self::checked_config(&draft)?;
        let document = self
            .documents
            .get_mut(id)
            .expect("presence checked above");
        document.screen_key = draft.screen_key;
        document.screen_name = draft.screen_name;
        document.description = draft.description;
        document.config = config;
        document.is_active = draft.is_active;
        document.updated_at = timestamp();
        Ok(document.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), RegistryError> {
        self.documents
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
