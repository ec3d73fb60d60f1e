// src/render.rs
//! Host-facing boundary: the admin-notice widget consumes exactly this.

use crate::message::{unix_now, Message};
use crate::pipeline::Pipeline;

/// One notice ready for the host UI. The host owns presentation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

/// Pull the current message set and hand back the active notices. Total
/// failure with no history renders as an empty list, indistinguishable from
/// "no active messages".
pub async fn render(pipeline: &Pipeline) -> Vec<Notice> {
    to_notices(pipeline.messages().await, unix_now())
}

pub(crate) fn to_notices(messages: Vec<Message>, now: u64) -> Vec<Notice> {
    messages
        .into_iter()
        .filter(|m| m.is_active(now))
        .map(|m| Notice {
            title: m.title,
            body: m.body,
        })
        .collect()
}
