// src/pipeline.rs
//! The process-wide pipeline: mode resolution, source selection, cache.
//!
//! A host may reach the entry point more than once (directly, and again via a
//! vendoring dependency). The first call constructs; every later call returns
//! the same pipeline and ignores its argument. Construction cannot fail —
//! source trouble surfaces at fetch time, where the cache absorbs it.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::cache::MessageCache;
use crate::config::RelayConfig;
use crate::message::Message;
use crate::mode::{self, Mode};
use crate::source::native::NativeSource;
use crate::source::remote::{RemoteConfig, RemoteSource};
use crate::source::MessageSource;

pub struct Pipeline {
    mode: Mode,
    source: Arc<dyn MessageSource>,
    source_key: String,
    cache: MessageCache,
}

static PIPELINE: OnceCell<Arc<Pipeline>> = OnceCell::new();

impl Pipeline {
    /// Process-wide entry point. The first caller constructs (single winner
    /// under concurrent initialization); later configs are ignored.
    pub fn instance(config: RelayConfig) -> Arc<Pipeline> {
        PIPELINE
            .get_or_init(move || Arc::new(Self::assemble(config)))
            .clone()
    }

    /// Build a pipeline from a config. Resolves (and thereby pins) the
    /// operating mode.
    pub(crate) fn assemble(config: RelayConfig) -> Pipeline {
        let mode = mode::current_mode();
        Self::assemble_with_mode(mode, config)
    }

    pub(crate) fn assemble_with_mode(mode: Mode, config: RelayConfig) -> Pipeline {
        let source: Arc<dyn MessageSource> = match mode {
            Mode::Standalone => Arc::new(NativeSource::new(
                config.content_store.clone(),
                config.content_type.clone(),
            )),
            Mode::Embedded => Arc::new(RemoteSource::new(RemoteConfig {
                url: config.url.clone(),
                timeout_ms: config.timeout_ms,
                max_retries: config.max_retries,
            })),
        };
        let source_key = source.source_key();

        tracing::debug!(?mode, source = source.name(), %source_key, "pipeline assembled");

        Pipeline {
            mode,
            source,
            source_key,
            cache: MessageCache::new(Duration::from_secs(config.ttl_seconds)),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Current message set: fresh, stale, or empty; never an error.
    pub async fn messages(&self) -> Vec<Message> {
        self.cache
            .get_or_fetch(self.source.as_ref(), &self.source_key)
            .await
    }
}
