//! Prompt and command metadata
//!
//! The `meta` block of a prompt or generated command is open-ended. The keys
//! slash-man itself reads and writes are typed fields; anything else is kept
//! in `extra` so files round-trip without losing data.

use crate::types::MetadataMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Value of `managed_by` on files this tool generates
pub const MANAGED_BY: &str = "slash-man";

/// Source types written into generated files
pub const SOURCE_TYPE_LOCAL: &str = "local";
pub const SOURCE_TYPE_GITHUB: &str = "github";

/// Typed view of a `meta` mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptMeta {
    pub managed_by: Option<String>,
    /// Logical prompt name a generated file was produced from
    pub source_prompt: Option<String>,
    pub version: Option<String>,
    pub updated_at: Option<String>,
    pub source_type: Option<String>,
    pub source_dir: Option<String>,
    pub source_path: Option<String>,
    pub source_repo: Option<String>,
    pub source_branch: Option<String>,
    pub source_url: Option<String>,
    /// Keys without a typed field
    pub extra: BTreeMap<String, Value>,
}

impl PromptMeta {
    /// Build from a decoded mapping.
    ///
    /// Well-known keys holding scalars are stored as strings (`version: 1.0`
    /// becomes `"1.0"`). Well-known keys holding non-scalars or null are kept
    /// in `extra` untouched, so the key stays present.
    #[must_use]
    pub fn from_map(map: MetadataMap) -> Self {
        let mut meta = Self::default();
        for (key, value) in map {
            meta.insert(key, value);
        }
        meta
    }

    /// Insert a key, replacing any previous value
    pub fn insert(&mut self, key: String, value: Value) {
        if self.field(&key).is_none() {
            self.extra.insert(key, value);
            return;
        }
        self.extra.remove(&key);
        let scalar = scalar_to_string(&value);
        let keep_raw = scalar.is_none();
        if let Some(slot) = self.field_mut(&key) {
            *slot = scalar;
        }
        if keep_raw {
            self.extra.insert(key, value);
        }
    }

    /// Merge `other` into `self`; keys in `other` win
    pub fn merge(&mut self, other: MetadataMap) {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    /// Look up any key as a string
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.field(key) {
            return value.as_deref();
        }
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Whether `key` is present, typed or extra
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        match self.field(key) {
            Some(value) => value.is_some() || self.extra.contains_key(key),
            None => self.extra.contains_key(key),
        }
    }

    /// `managed_by == "slash-man"`
    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.managed_by.as_deref() == Some(MANAGED_BY)
    }

    /// Looser marker used by cleanup: files from releases that predate
    /// `managed_by` still carry `source_prompt` or `version`.
    #[must_use]
    pub fn has_generated_marker(&self) -> bool {
        self.contains_key("source_prompt") || self.contains_key("version")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known_fields().all(|(_, value)| value.is_none()) && self.extra.is_empty()
    }

    /// Flatten back into a sorted mapping
    #[must_use]
    pub fn to_map(&self) -> MetadataMap {
        let mut map: MetadataMap = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, value) in self.known_fields() {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        map
    }

    /// One-line description of where a generated file came from.
    ///
    /// `local: <dir>`, `github: owner/repo@branch:path`, or `Unknown`.
    #[must_use]
    pub fn source_info(&self) -> String {
        fn non_empty(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        match self.source_type.as_deref() {
            Some(SOURCE_TYPE_LOCAL) => non_empty(self.source_dir.as_deref())
                .or_else(|| non_empty(self.source_path.as_deref()))
                .map_or_else(|| "Unknown".to_string(), |dir| format!("local: {dir}")),
            Some(SOURCE_TYPE_GITHUB) => {
                let Some(repo) = non_empty(self.source_repo.as_deref()) else {
                    return "Unknown".to_string();
                };
                let mut info = format!("github: {repo}");
                if let Some(branch) = non_empty(self.source_branch.as_deref()) {
                    info.push('@');
                    info.push_str(branch);
                }
                if let Some(path) = non_empty(self.source_path.as_deref()) {
                    info.push(':');
                    info.push_str(path);
                }
                info
            }
            _ => "Unknown".to_string(),
        }
    }

    fn known_fields(&self) -> impl Iterator<Item = (&'static str, &Option<String>)> {
        [
            ("managed_by", &self.managed_by),
            ("source_prompt", &self.source_prompt),
            ("version", &self.version),
            ("updated_at", &self.updated_at),
            ("source_type", &self.source_type),
            ("source_dir", &self.source_dir),
            ("source_path", &self.source_path),
            ("source_repo", &self.source_repo),
            ("source_branch", &self.source_branch),
            ("source_url", &self.source_url),
        ]
        .into_iter()
    }

    fn field(&self, key: &str) -> Option<&Option<String>> {
        self.known_fields()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "managed_by" => &mut self.managed_by,
            "source_prompt" => &mut self.source_prompt,
            "version" => &mut self.version,
            "updated_at" => &mut self.updated_at,
            "source_type" => &mut self.source_type,
            "source_dir" => &mut self.source_dir,
            "source_path" => &mut self.source_path,
            "source_repo" => &mut self.source_repo,
            "source_branch" => &mut self.source_branch,
            "source_url" => &mut self.source_url,
            _ => return None,
        };
        Some(slot)
    }
}

impl Serialize for PromptMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
