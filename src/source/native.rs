// src/source/native.rs
//! Standalone-mode source: messages authored as host-native content objects.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;

use crate::message::Message;
use crate::source::{sanitize_batch, FetchError, MessageSource};

/// One host-native content object of the message content type. Hosts map
/// whatever their storage returns into this shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NativeContent {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: u64,
    #[serde(default)]
    pub expires_at: Option<u64>,
}

/// The entire query capability `NativeSource` depends on. The host registers
/// the content type and owns its storage; we only list it.
pub trait ContentStore: Send + Sync {
    fn list_content(&self, type_id: &str) -> anyhow::Result<Vec<NativeContent>>;
}

pub struct NativeSource {
    store: Option<Arc<dyn ContentStore>>,
    content_type: String,
}

impl NativeSource {
    pub fn new(store: Option<Arc<dyn ContentStore>>, content_type: impl Into<String>) -> Self {
        Self {
            store,
            content_type: content_type.into(),
        }
    }
}

#[async_trait]
impl MessageSource for NativeSource {
    async fn fetch(&self) -> Result<Vec<Message>, FetchError> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| FetchError::StorageUnavailable("no content store wired".into()))?;

        let items = store.list_content(&self.content_type).map_err(|e| {
            counter!("relay_fetch_errors_total").increment(1);
            FetchError::StorageUnavailable(e.to_string())
        })?;

        counter!("relay_fetch_total").increment(1);
        Ok(sanitize_batch(
            items
                .into_iter()
                .map(|c| Message {
                    id: c.id,
                    title: c.title,
                    body: c.body,
                    created_at: c.created_at,
                    expires_at: c.expires_at,
                })
                .collect(),
        ))
    }

    fn name(&self) -> &'static str {
        "native"
    }

    fn source_key(&self) -> String {
        format!("native:{}", self.content_type)
    }
}
