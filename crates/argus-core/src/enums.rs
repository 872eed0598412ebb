//! Enum registry: the allowed vocabulary for audit events.
//!
//! Four categories (event types, event actions, actor types, target types)
//! each hold a set of allowed tokens. The registry is built once at startup
//! by merging the built-in defaults with an optional YAML override file and
//! is read-only afterwards, so it can be shared behind an `Arc` without
//! locking.
//!
//! Override file shape:
//!
//! ```yaml
//! enums:
//!   eventTypes: [MANAGEMENT_EVENT, BILLING]
//!   actorTypes: [SERVICE, ADMIN]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_EVENT_TYPES: &[&str] = &["MANAGEMENT_EVENT", "USER_MANAGEMENT", "DATA_FETCH"];
const DEFAULT_EVENT_ACTIONS: &[&str] = &["CREATE", "READ", "UPDATE", "DELETE"];
const DEFAULT_ACTOR_TYPES: &[&str] = &["SERVICE", "ADMIN", "MEMBER", "SYSTEM"];
const DEFAULT_TARGET_TYPES: &[&str] = &["SERVICE", "RESOURCE"];

/// One of the four vocabulary categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumCategory {
    EventType,
    EventAction,
    ActorType,
    TargetType,
}

impl EnumCategory {
    pub const ALL: [EnumCategory; 4] = [
        EnumCategory::EventType,
        EnumCategory::EventAction,
        EnumCategory::ActorType,
        EnumCategory::TargetType,
    ];

    /// Key used for this category in the override file
    pub fn key(&self) -> &'static str {
        match self {
            EnumCategory::EventType => "eventTypes",
            EnumCategory::EventAction => "eventActions",
            EnumCategory::ActorType => "actorTypes",
            EnumCategory::TargetType => "targetTypes",
        }
    }
}

impl fmt::Display for EnumCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw per-category token lists, as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumValues {
    pub event_types: Vec<String>,
    pub event_actions: Vec<String>,
    pub actor_types: Vec<String>,
    pub target_types: Vec<String>,
}

impl EnumValues {
    /// The built-in vocabulary
    pub fn defaults() -> Self {
        let owned = |values: &[&str]| values.iter().map(|s| s.to_string()).collect();
        Self {
            event_types: owned(DEFAULT_EVENT_TYPES),
            event_actions: owned(DEFAULT_EVENT_ACTIONS),
            actor_types: owned(DEFAULT_ACTOR_TYPES),
            target_types: owned(DEFAULT_TARGET_TYPES),
        }
    }

    fn get(&self, category: EnumCategory) -> &[String] {
        match category {
            EnumCategory::EventType => &self.event_types,
            EnumCategory::EventAction => &self.event_actions,
            EnumCategory::ActorType => &self.actor_types,
            EnumCategory::TargetType => &self.target_types,
        }
    }
}

/// Top-level document of the override file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnumFile {
    enums: EnumValues,
}

/// Fatal problems with the enum override file
#[derive(Debug, Error)]
pub enum EnumConfigError {
    /// The file exists but does not have the expected shape
    #[error("Malformed enum configuration at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Merged, immutable vocabulary with O(1) membership checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRegistry {
    event_types: HashSet<String>,
    event_actions: HashSet<String>,
    actor_types: HashSet<String>,
    target_types: HashSet<String>,
}

impl EnumRegistry {
    /// Registry containing exactly the given values (no defaults merged in)
    pub fn from_values(values: &EnumValues) -> Self {
        Self::merge(values, &EnumValues::default())
    }

    /// Registry containing only the built-in defaults
    pub fn defaults() -> Self {
        Self::from_values(&EnumValues::defaults())
    }

    /// Per-category set union of `defaults` and `overrides`
    ///
    /// Duplicates collapse and empty tokens are dropped. Categories with no
    /// overrides keep their defaults unchanged.
    pub fn merge(defaults: &EnumValues, overrides: &EnumValues) -> Self {
        let union = |category: EnumCategory| -> HashSet<String> {
            defaults
                .get(category)
                .iter()
                .chain(overrides.get(category))
                .filter(|value| !value.is_empty())
                .cloned()
                .collect()
        };

        Self {
            event_types: union(EnumCategory::EventType),
            event_actions: union(EnumCategory::EventAction),
            actor_types: union(EnumCategory::ActorType),
            target_types: union(EnumCategory::TargetType),
        }
    }

    /// Parse the override file contents
    pub fn parse(content: &str) -> Result<EnumValues, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(EnumValues::default());
        }
        let file: EnumFile = serde_yaml::from_str(content)?;
        Ok(file.enums)
    }

    /// Keys in the override file that are not part of its shape
    ///
    /// Such keys are ignored by [`EnumRegistry::parse`]; nested keys are
    /// reported as `enums.<key>`.
    pub fn ignored_keys(content: &str) -> Vec<String> {
        let Ok(serde_yaml::Value::Mapping(root)) = serde_yaml::from_str(content) else {
            return Vec::new();
        };

        let mut ignored = Vec::new();
        for (key, value) in &root {
            let key = yaml_key(key);
            if key != "enums" {
                ignored.push(key);
                continue;
            }
            if let serde_yaml::Value::Mapping(enums) = value {
                for nested in enums.keys() {
                    let nested = yaml_key(nested);
                    if !EnumCategory::ALL.iter().any(|c| c.key() == nested) {
                        ignored.push(format!("enums.{nested}"));
                    }
                }
            }
        }
        ignored
    }

    /// Build the registry from the defaults and an optional override file
    ///
    /// A missing or unreadable file is not an error: the registry falls
    /// back to the defaults. A file that is readable but malformed is.
    /// Unknown keys are ignored with a warning.
    pub fn load(override_path: Option<&Path>) -> Result<Self, EnumConfigError> {
        let defaults = EnumValues::defaults();

        let Some(path) = override_path else {
            tracing::debug!("No enum override file configured, using defaults");
            return Ok(Self::from_values(&defaults));
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Enum override file not found, using defaults");
                return Ok(Self::from_values(&defaults));
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Enum override file unreadable, using defaults"
                );
                return Ok(Self::from_values(&defaults));
            }
        };

        let overrides = Self::parse(&content).map_err(|source| EnumConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        let ignored = Self::ignored_keys(&content);
        if !ignored.is_empty() {
            tracing::warn!(
                path = %path.display(),
                keys = %ignored.join(", "),
                "Ignoring unknown keys in enum override file"
            );
        }

        let registry = Self::merge(&defaults, &overrides);
        tracing::info!(
            path = %path.display(),
            event_types = registry.event_types.len(),
            event_actions = registry.event_actions.len(),
            actor_types = registry.actor_types.len(),
            target_types = registry.target_types.len(),
            "Loaded enum registry"
        );
        Ok(registry)
    }

    fn set(&self, category: EnumCategory) -> &HashSet<String> {
        match category {
            EnumCategory::EventType => &self.event_types,
            EnumCategory::EventAction => &self.event_actions,
            EnumCategory::ActorType => &self.actor_types,
            EnumCategory::TargetType => &self.target_types,
        }
    }

    /// Strict membership: the empty string is never a member
    pub fn contains(&self, category: EnumCategory, value: &str) -> bool {
        self.set(category).contains(value)
    }

    /// Membership check for nullable fields: the empty string is always valid
    pub fn is_valid(&self, category: EnumCategory, value: &str) -> bool {
        value.is_empty() || self.contains(category, value)
    }

    /// Allowed values for a category, sorted
    pub fn values(&self, category: EnumCategory) -> Vec<&str> {
        let mut values: Vec<&str> = self.set(category).iter().map(String::as_str).collect();
        values.sort_unstable();
        values
    }
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl Default for EnumRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io::Write;

    use super::*;

    fn test_values() -> EnumValues {
        EnumValues {
            event_types: vec!["MANAGEMENT_EVENT".into(), "USER_MANAGEMENT".into()],
            event_actions: vec!["CREATE".into(), "READ".into()],
            actor_types: vec!["SERVICE".into(), "ADMIN".into()],
            target_types: vec!["SERVICE".into(), "RESOURCE".into()],
        }
    }

    fn as_set(values: Vec<&str>) -> HashSet<String> {
        values.into_iter().map(String::from).collect()
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let registry = EnumRegistry::load(None).unwrap();
        assert_eq!(registry, EnumRegistry::defaults());
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let registry = EnumRegistry::load(Some(Path::new("/nonexistent/path/enums.yaml"))).unwrap();

        for category in EnumCategory::ALL {
            assert!(!registry.values(category).is_empty(), "{category} empty");
        }
        assert!(registry.contains(EnumCategory::EventType, "DATA_FETCH"));
        assert!(registry.contains(EnumCategory::ActorType, "SYSTEM"));
    }

    #[test]
    fn load_valid_yaml_merges_with_defaults() {
        let yaml = r#"
enums:
  eventTypes:
    - MANAGEMENT_EVENT
    - USER_MANAGEMENT
  eventActions:
    - CREATE
    - READ
  actorTypes:
    - SERVICE
    - ADMIN
  targetTypes:
    - SERVICE
    - RESOURCE
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let registry = EnumRegistry::load(Some(tmp.path())).expect("load enums");
        assert!(registry.contains(EnumCategory::EventType, "MANAGEMENT_EVENT"));
        assert!(registry.contains(EnumCategory::EventType, "USER_MANAGEMENT"));
        // merged in from the defaults
        assert!(registry.contains(EnumCategory::EventType, "DATA_FETCH"));
        assert_eq!(registry.values(EnumCategory::EventType).len(), 3);
    }

    #[test]
    fn load_single_category_leaves_others_untouched() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"enums:\n  eventTypes: [FOO]\n").unwrap();
        tmp.flush().unwrap();

        let registry = EnumRegistry::load(Some(tmp.path())).unwrap();
        let defaults = EnumRegistry::defaults();

        let mut expected = as_set(defaults.values(EnumCategory::EventType));
        expected.insert("FOO".to_string());
        assert_eq!(as_set(registry.values(EnumCategory::EventType)), expected);

        for category in [
            EnumCategory::EventAction,
            EnumCategory::ActorType,
            EnumCategory::TargetType,
        ] {
            assert_eq!(registry.values(category), defaults.values(category));
        }
    }

    #[test]
    fn load_malformed_yaml_is_an_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"enums:\n  eventTypes: {not: [a list\n").unwrap();
        tmp.flush().unwrap();

        let err = EnumRegistry::load(Some(tmp.path())).unwrap_err();
        assert!(matches!(err, EnumConfigError::Malformed { .. }));
        assert!(err.to_string().contains("Malformed enum configuration"));
    }

    #[test]
    fn load_wrong_shape_is_an_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"enums:\n  eventTypes: 42\n").unwrap();
        tmp.flush().unwrap();

        assert!(EnumRegistry::load(Some(tmp.path())).is_err());
    }

    #[test]
    fn load_unknown_keys_are_ignored() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"enums:\n  evenTypes: [FOO]\n").unwrap();
        tmp.flush().unwrap();

        let registry = EnumRegistry::load(Some(tmp.path())).unwrap();
        assert_eq!(registry, EnumRegistry::defaults());
    }

    #[test]
    fn load_unknown_top_level_key_still_merges() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"version: 1\nenums:\n  eventTypes: [FOO]\n").unwrap();
        tmp.flush().unwrap();

        let registry = EnumRegistry::load(Some(tmp.path())).unwrap();
        assert!(registry.contains(EnumCategory::EventType, "FOO"));
        assert!(registry.contains(EnumCategory::EventType, "DATA_FETCH"));
    }

    #[test]
    fn ignored_keys_lists_top_level_and_nested() {
        let content = "version: 1\nenums:\n  eventTypes: [FOO]\n  evenActions: [X]\n";
        assert_eq!(
            EnumRegistry::ignored_keys(content),
            vec!["version".to_string(), "enums.evenActions".to_string()]
        );
        assert!(EnumRegistry::ignored_keys("enums:\n  actorTypes: [A]\n").is_empty());
        assert!(EnumRegistry::ignored_keys("").is_empty());
    }

    #[test]
    fn load_empty_file_returns_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let registry = EnumRegistry::load(Some(tmp.path())).unwrap();
        assert_eq!(registry, EnumRegistry::defaults());
    }

    #[test]
    fn merge_collapses_duplicates() {
        let defaults = EnumValues {
            event_types: vec!["A".into(), "B".into()],
            ..Default::default()
        };
        let overrides = EnumValues {
            event_types: vec!["B".into(), "C".into(), "C".into(), "".into()],
            ..Default::default()
        };

        let registry = EnumRegistry::merge(&defaults, &overrides);
        assert_eq!(registry.values(EnumCategory::EventType), vec!["A", "B", "C"]);
        assert!(registry.values(EnumCategory::ActorType).is_empty());
    }

    #[test]
    fn membership_checks() {
        let registry = EnumRegistry::from_values(&test_values());

        assert!(registry.is_valid(EnumCategory::EventType, "MANAGEMENT_EVENT"));
        assert!(registry.is_valid(EnumCategory::EventAction, "CREATE"));
        assert!(registry.is_valid(EnumCategory::ActorType, "SERVICE"));
        assert!(registry.is_valid(EnumCategory::TargetType, "RESOURCE"));

        for category in EnumCategory::ALL {
            assert!(!registry.is_valid(category, "INVALID"));
        }

        // not merged with defaults
        assert!(!registry.is_valid(EnumCategory::EventType, "DATA_FETCH"));
    }

    #[test]
    fn empty_value_is_valid_but_not_contained() {
        let registry = EnumRegistry::from_values(&EnumValues::default());

        for category in EnumCategory::ALL {
            assert!(registry.is_valid(category, ""));
            assert!(!registry.contains(category, ""));
        }
    }

    #[test]
    fn category_keys() {
        let keys: Vec<_> = EnumCategory::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["eventTypes", "eventActions", "actorTypes", "targetTypes"]);
    }
}
