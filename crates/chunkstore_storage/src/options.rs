//! Backend options for filesystem stores.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Options applied when a filesystem store is opened.
///
/// Options can be set with the builder methods or parsed from string pairs,
/// which is how they usually arrive from a connection configuration. They
/// also deserialize from a configuration document; missing fields take their
/// defaults and unknown fields are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageOptions {
    /// Create the root directory when the store is opened.
    pub auto_mkdir: bool,

    /// Sync file contents to durable storage after every write (local disk only).
    pub sync_on_write: bool,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            auto_mkdir: false,
            sync_on_write: false,
        }
    }
}

impl StorageOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the root directory on open.
    #[must_use]
    pub const fn auto_mkdir(mut self, value: bool) -> Self {
        self.auto_mkdir = value;
        self
    }

    /// Sets whether to sync after every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Parses options from `name = value` pairs.
    ///
    /// Boolean values accept `true`/`false` and `1`/`0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownOption`] for an unrecognised name and
    /// [`StoreError::InvalidOption`] for a value that does not parse.
    pub fn from_pairs<I, K, V>(pairs: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                "auto_mkdir" => options.auto_mkdir = parse_bool(name, value)?,
                "sync_on_write" => options.sync_on_write = parse_bool(name, value)?,
                _ => {
                    return Err(StoreError::UnknownOption {
                        name: name.to_string(),
                    })
                }
            }
        }
        Ok(options)
    }
}

fn parse_bool(name: &str, value: &str) -> StoreResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(StoreError::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = StorageOptions::default();
        assert!(!options.auto_mkdir);
        assert!(!options.sync_on_write);
    }

    #[test]
    fn builder_pattern() {
        let options = StorageOptions::new().auto_mkdir(true).sync_on_write(true);
        assert!(options.auto_mkdir);
        assert!(options.sync_on_write);
    }

    #[test]
    fn parses_pairs() {
        let options =
            StorageOptions::from_pairs([("auto_mkdir", "true"), ("sync_on_write", "0")]).unwrap();
        assert_eq!(options, StorageOptions::new().auto_mkdir(true));
    }

    #[test]
    fn rejects_unknown_option() {
        let err = StorageOptions::from_pairs([("anon", "true")]).unwrap_err();
        assert!(matches!(err, StoreError::UnknownOption { ref name } if name == "anon"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let options: StorageOptions = serde_json::from_str(r#"{"auto_mkdir": true}"#).unwrap();
        assert_eq!(options, StorageOptions::new().auto_mkdir(true));

        assert!(serde_json::from_str::<StorageOptions>(r#"{"anon": true}"#).is_err());
    }

    #[test]
    fn rejects_bad_value() {
        let err = StorageOptions::from_pairs([("auto_mkdir", "maybe")]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidOption { .. }));
    }
}
