// src/source/mod.rs
pub mod native;
pub mod remote;

use std::collections::HashSet;

use crate::message::Message;

/// Why a fetch produced no messages. Callers above the cache never see these;
/// the cache absorbs them and degrades to stale-or-empty.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no endpoint url configured")]
    EmptyConfig,
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("fetch timed out after {0}ms")]
    Timeout(u64),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("host storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Where messages come from. The variance between a content-owning host and a
/// content-consuming embedded library lives entirely behind this trait;
/// caching and rendering policy never change with the variant.
#[async_trait::async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Message>, FetchError>;
    fn name(&self) -> &'static str;
    /// Stable cache identity for this source.
    fn source_key(&self) -> String;
}

/// Normalize text: decode HTML entities, strip tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // Length cap: 2000 chars. Admin notices are short by nature.
    if out.chars().count() > 2000 {
        out = out.chars().take(2000).collect();
    }

    out
}

/// Shared sanitation pass both sources run after mapping raw items:
/// normalize title/body, drop items that end up blank, and collapse duplicate
/// ids (first occurrence wins; ids are unique within a source, so a duplicate
/// is feed noise). Input order is preserved otherwise.
pub fn sanitize_batch(raw: Vec<Message>) -> Vec<Message> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(raw.len());

    for mut m in raw {
        m.title = normalize_text(&m.title);
        m.body = normalize_text(&m.body);
        if m.title.is_empty() && m.body.is_empty() {
            continue;
        }
        if !seen_ids.insert(m.id.clone()) {
            continue;
        }
        keep.push(m);
    }

    keep
}
