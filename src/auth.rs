//! Session credential storage.
//!
//! The bearer credential is exchanged once from the platform-issued init
//! payload, held for the session, attached to every gateway call, and
//! cleared on the first 401. Nothing is persisted.

use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct CredentialStore {
    token: Mutex<Option<String>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: String) {
        let mut slot = self.token.lock().expect("credential lock");
        *slot = Some(token);
    }

    pub fn get(&self) -> Option<String> {
        self.token.lock().expect("credential lock").clone()
    }

    pub fn clear(&self) {
        let mut slot = self.token.lock().expect("credential lock");
        if slot.take().is_some() {
            tracing::warn!("bearer credential cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().expect("credential lock").is_some()
    }
}
