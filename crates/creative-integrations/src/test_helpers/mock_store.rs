use async_trait::async_trait;
use creative_core::AppError;
use creative_db::{ActivityLog, CredentialStore};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockCredentialStore {
    credentials: Arc<Mutex<HashMap<String, JsonValue>>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, service: &str, credentials: JsonValue) {
        self.credentials
            .lock()
            .unwrap()
            .insert(service.to_string(), credentials);
    }

    pub fn get(&self, service: &str) -> Option<JsonValue> {
        self.credentials.lock().unwrap().get(service).cloned()
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn get_credentials(&self, service: &str) -> Result<Option<JsonValue>, AppError> {
        Ok(self.get(service))
    }

    async fn save_credentials(
        &self,
        service: &str,
        credentials: JsonValue,
    ) -> Result<(), AppError> {
        self.insert(service, credentials);
        Ok(())
    }
}

/// Records every action in order
#[derive(Clone, Default)]
pub struct MockActivityLog {
    entries: Arc<Mutex<Vec<(String, JsonValue)>>>,
}

impl MockActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(action, _)| action.clone())
            .collect()
    }

    pub fn last(&self) -> Option<(String, JsonValue)> {
        self.entries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ActivityLog for MockActivityLog {
    async fn record(&self, action: &str, metadata: JsonValue) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap()
            .push((action.to_string(), metadata));
        Ok(())
    }
}
