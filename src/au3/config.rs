//! Parser and output settings
//!
//!     Two tables, `[parser]` and `[output]`. Their defaults ship inside the crate
//!     (`defaults/au3.default.toml`); a [Loader] stacks user TOML and dotted-key overrides
//!     over them and deserializes the result into an [Au3Config].

use config::builder::DefaultState;
use config::{
    Config, ConfigBuilder, ConfigError, File, FileFormat, FileSourceFile, Source, ValueKind,
};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/au3.default.toml");

/// Default recursion ceiling, mirrored by the embedded defaults.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Au3Config {
    pub parser: ParserSettings,
    pub output: OutputSettings,
}

/// Knobs consumed by the parser itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ParserSettings {
    /// Deepest allowed nesting of parens, brackets, calls, `Not` chains, operator chains
    /// and `If` blocks.
    pub max_nesting_depth: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputSettings {
    pub default_format: String,
    pub show_line_numbers: bool,
    pub label_width: usize,
}

/// Builds an [Au3Config] from the embedded defaults plus whatever layers the caller adds.
///
/// Later layers win key by key, so a user file only needs the settings it changes.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

fn toml_file(path: &Path, required: bool) -> File<FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(required)
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// `build` fails if `path` does not exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(toml_file(path.as_ref(), true))
    }

    /// Like [Loader::with_file], but a missing file is skipped.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(toml_file(path.as_ref(), false))
    }

    /// Inline TOML, e.g. `[parser]\nmax_nesting_depth = 32`.
    pub fn with_toml(self, text: &str) -> Self {
        self.layer(File::from_str(text, FileFormat::Toml))
    }

    /// Set one dotted key, such as `parser.max_nesting_depth`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Au3Config, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn layer<S>(mut self, source: S) -> Self
    where
        S: Source + Send + Sync + 'static,
    {
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in settings with no user layers.
pub fn load_defaults() -> Result<Au3Config, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser, ParserSettings::default());
        assert_eq!(config.output.default_format, "treeviz");
        assert!(!config.output.show_line_numbers);
        assert_eq!(config.output.label_width, 40);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("parser.max_nesting_depth", 8)
            .expect("override to apply")
            .set_override("output.show_line_numbers", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.parser.max_nesting_depth, 8);
        assert!(config.output.show_line_numbers);
    }

    #[test]
    fn layers_toml_text() {
        let config = Loader::new()
            .with_toml("[output]\ndefault_format = \"json\"\n")
            .build()
            .expect("config to build");
        assert_eq!(config.output.default_format, "json");
        assert_eq!(config.output.label_width, 40);
    }

    #[test]
    fn optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/au3.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.parser.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn required_file_must_exist() {
        assert!(Loader::new().with_file("/nonexistent/au3.toml").build().is_err());
    }
}
