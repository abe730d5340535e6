//! Durable classification cache
//!
//! Two maps keyed by truncated SHA-256 digests of the classified input,
//! persisted as a single JSON document. Writes go through after every
//! new classification so a crashed run never loses a model call that was
//! already paid for. The cache is an optimization, not a correctness
//! dependency: a missing or corrupt file degrades to an empty cache.

use crate::alignment::{RelationshipEvidence, StatedAlignment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Characters of content hashed for entity cache keys. Enough to make
/// keys stable and unique without digesting whole documents.
const CONTENT_HASH_CHARS: usize = 2000;
/// Characters of relationship context included in the key.
const CONTEXT_HASH_CHARS: usize = 500;
/// Hex digest prefix length used as the cache key.
const KEY_LEN: usize = 16;

/// Errors from cache persistence.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A cached entity classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEntry {
    pub alignment: StatedAlignment,
    pub timestamp: DateTime<Utc>,
    pub title: String,
}

/// A cached relationship classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipEntry {
    pub result: RelationshipEvidence,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub target: String,
}

/// The cache document: entity and relationship maps, loaded whole and
/// persisted whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignmentCache {
    #[serde(default)]
    pub entities: HashMap<String, EntityEntry>,
    #[serde(default)]
    pub relationships: HashMap<String, RelationshipEntry>,
}

impl AlignmentCache {
    /// Load the cache from disk.
    ///
    /// A missing file is normal (first run). A malformed file is warned
    /// about and replaced with an empty cache; never fatal.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read alignment cache, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cache) => cache,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not parse alignment cache, starting empty");
                Self::default()
            }
        }
    }

    /// Persist the whole document, creating parent directories as needed.
    pub fn persist(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

/// First `limit` characters of `s` (characters, not bytes — content is
/// arbitrary unicode).
pub(crate) fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn digest_key(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut key = String::with_capacity(KEY_LEN);
    for byte in digest.iter().take(KEY_LEN / 2) {
        let _ = write!(key, "{:02x}", byte);
    }
    key
}

/// Cache key for an entity, derived from its (truncated) content.
pub fn content_hash(content: &str) -> String {
    digest_key(truncate_chars(content, CONTENT_HASH_CHARS))
}

/// Cache key for a relationship, derived from both titles and the
/// (truncated) context it was classified from.
pub fn relationship_hash(source_title: &str, target_title: &str, context: &str) -> String {
    let key = format!(
        "{}:{}:{}",
        source_title,
        target_title,
        truncate_chars(context, CONTEXT_HASH_CHARS)
    );
    digest_key(&key)
}
