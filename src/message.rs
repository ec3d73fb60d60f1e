// src/message.rs
//! The message unit distributed to the host admin surface.
//!
//! Wire shape (remote endpoint and host storage alike):
//! `{id, title, body, created_at, expires_at?}` with unix-second timestamps.

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Stable identifier, unique within its source.
    pub id: String,
    pub title: String,
    pub body: String,
    /// Source-assigned creation time, unix seconds.
    pub created_at: u64,
    /// Absent means the message never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl Message {
    /// A message stays active until its expiry instant (inclusive start,
    /// exclusive end).
    pub fn is_active(&self, now: u64) -> bool {
        match self.expires_at {
            Some(t) => now < t,
            None => true,
        }
    }
}

pub(crate) fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
