use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::services::auth::identity::{Identity, IdentityLookup, LookupError};

/// In-memory identity lookup that also counts how often it was asked.
#[derive(Debug, Default)]
pub struct InMemoryIdentityLookup {
    identities: HashMap<String, Identity>,
    calls: AtomicUsize,
}

impl InMemoryIdentityLookup {
    pub fn new(identities: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            identities: identities
                .into_iter()
                .map(|id| (id.username.clone(), id))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityLookup for InMemoryIdentityLookup {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn load_identity(&self, subject: &str) -> Result<Identity, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identities
            .get(subject)
            .cloned()
            .ok_or_else(|| LookupError::UnknownSubject(subject.to_string()))
    }
}
