// src/lib.rs
// Public library surface for hosts, vendoring extensions, and integration tests.

pub mod cache;
pub mod config;
pub mod message;
pub mod metrics;
pub mod mode;
pub mod pipeline;
pub mod render;
pub mod source;

// ---- Re-exports for stable public API ----
pub use crate::config::RelayConfig;
pub use crate::message::Message;
pub use crate::mode::{current_mode, set_mode, Mode};
pub use crate::pipeline::Pipeline;
pub use crate::render::{render, Notice};
pub use crate::source::{FetchError, MessageSource};

/// Convenience entry point mirroring the host-facing boot shape: resolve (or
/// reuse) the process pipeline and return it.
///
/// ```ignore
/// notice_relay::set_mode(notice_relay::Mode::Standalone);
/// let pipeline = notice_relay::init(config);
/// let notices = notice_relay::render(&pipeline).await;
/// ```
pub fn init(config: RelayConfig) -> std::sync::Arc<Pipeline> {
    Pipeline::instance(config)
}
