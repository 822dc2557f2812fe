///
/// # Backend Configuration
///
/// Settings for one backend run, read from a TOML file.
///
/// ## Example jsbind.toml
///
/// ```toml
/// genre = "library"
/// coroutine_strategy = "translate-to-generator"
///
/// [libraries]
/// jsbind-core = "@jsbind/core"
///
/// [host]
/// node = ">=18"
/// npm = ">=9"
/// ```
///
/// Libraries missing from `[libraries]` are imported by their id.
///

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::BackendError;
use crate::ir::{CoroutineStrategy, Genre};
use crate::support::LibraryId;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub coroutine_strategy: CoroutineStrategy,
    #[serde(default)]
    pub libraries: IndexMap<String, String>,
    #[serde(default)]
    pub host: HostConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    #[serde(default = "default_node")]
    pub node: String,
    #[serde(default = "default_npm")]
    pub npm: String,
}

fn default_node() -> String {
    ">=18".to_string()
}

fn default_npm() -> String {
    ">=9".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { node: default_node(), npm: default_npm() }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            genre: Genre::Library,
            coroutine_strategy: CoroutineStrategy::TranslateToGenerator,
            libraries: IndexMap::new(),
            host: HostConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, BackendError> {
        let config: BackendConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, BackendError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Module specifier used in `import` declarations for `library`.
    pub fn specifier(&self, library: LibraryId) -> &str {
        self.libraries.get(library.as_str()).map(String::as_str).unwrap_or(library.as_str())
    }

    fn validate(&self) -> Result<(), BackendError> {
        for (id, specifier) in &self.libraries {
            if specifier.trim().is_empty() {
                return Err(BackendError::Config(format!("library '{}' has an empty specifier", id)));
            }
        }
        semver::VersionReq::parse(&self.host.node)?;
        semver::VersionReq::parse(&self.host.npm)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::from_toml_str("").unwrap();
        assert_eq!(config.genre, Genre::Library);
        assert_eq!(config.coroutine_strategy, CoroutineStrategy::TranslateToGenerator);
        assert_eq!(config.host.node, ">=18");
        assert_eq!(config.host.npm, ">=9");
        assert_eq!(config.specifier(LibraryId::CORE), "jsbind-core");
    }

    #[test]
    fn test_full_config() {
        let config = BackendConfig::from_toml_str(
            r#"
genre = "documentation"
coroutine_strategy = "adapt-generators"

[libraries]
jsbind-core = "@jsbind/core"

[host]
node = ">=20"
"#,
        )
        .unwrap();
        assert_eq!(config.genre, Genre::Documentation);
        assert_eq!(config.coroutine_strategy, CoroutineStrategy::AdaptGenerators);
        assert_eq!(config.specifier(LibraryId::CORE), "@jsbind/core");
        assert_eq!(config.specifier(LibraryId::ASSERT), "assert");
        assert_eq!(config.host.node, ">=20");
        assert_eq!(config.host.npm, ">=9");
    }

    #[test]
    fn test_rejects_unknown_genre() {
        let err = BackendConfig::from_toml_str(r#"genre = "preview""#).unwrap_err();
        assert!(matches!(err, BackendError::Toml(_)));
    }

    #[test]
    fn test_rejects_bad_version_requirement() {
        let err = BackendConfig::from_toml_str("[host]\nnode = \"eighteen\"\n").unwrap_err();
        assert!(matches!(err, BackendError::Version(_)));
    }

    #[test]
    fn test_rejects_empty_specifier() {
        let err = BackendConfig::from_toml_str("[libraries]\njsbind-core = \"  \"\n").unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jsbind.toml");
        std::fs::write(&path, "genre = \"documentation\"\n").unwrap();
        let config = BackendConfig::load(&path).unwrap();
        assert_eq!(config.genre, Genre::Documentation);

        let missing = BackendConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, BackendError::Io(_)));
    }
}
