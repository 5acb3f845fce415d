//! Configuration for the query builder
//!
//! Provides a builder pattern for configuring text layout and value binding.

use serde::{Deserialize, Serialize};

/// How key-based WHERE/SET clauses carry entity values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyBinding {
    /// Values are bound through `@n` placeholders
    #[default]
    Parameterized,
    /// Values are quoted directly into the SQL text
    Literal,
}

/// Configuration for the query builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Separator placed between clauses and select items (default: "\n")
    pub line_separator: String,
    /// Binding mode for entity values in UPDATE/DELETE statements
    pub key_binding: KeyBinding,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BuilderConfig {
    /// Create a new configuration builder
    pub fn builder() -> BuilderConfigBuilder {
        BuilderConfigBuilder::new()
    }
}

/// Builder for BuilderConfig
#[derive(Debug)]
pub struct BuilderConfigBuilder {
    line_separator: String,
    key_binding: KeyBinding,
}

impl Default for BuilderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderConfigBuilder {
    pub fn new() -> Self {
        Self {
            line_separator: "\n".to_string(),
            key_binding: KeyBinding::default(),
        }
    }

    /// Set the clause separator (default: "\n")
    pub fn line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    /// Lay the whole statement out on one line
    pub fn single_line(mut self) -> Self {
        self.line_separator = " ".to_string();
        self
    }

    /// Set the binding mode for entity values (default: parameterized)
    pub fn key_binding(mut self, binding: KeyBinding) -> Self {
        self.key_binding = binding;
        self
    }

    /// Embed entity values as literals in UPDATE/DELETE statements
    pub fn literal_keys(mut self) -> Self {
        self.key_binding = KeyBinding::Literal;
        self
    }

    /// Build the configuration
    pub fn build(self) -> BuilderConfig {
        BuilderConfig {
            line_separator: self.line_separator,
            key_binding: self.key_binding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Default Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = BuilderConfig::default();

        assert_eq!(config.line_separator, "\n");
        assert_eq!(config.key_binding, KeyBinding::Parameterized);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let built = BuilderConfig::builder().build();
        let default = BuilderConfig::default();

        assert_eq!(built.line_separator, default.line_separator);
        assert_eq!(built.key_binding, default.key_binding);
    }

    // =========================================================================
    // Layout Tests
    // =========================================================================

    #[test]
    fn test_custom_line_separator() {
        let config = BuilderConfig::builder().line_separator("\r\n").build();
        assert_eq!(config.line_separator, "\r\n");
    }

    #[test]
    fn test_single_line() {
        let config = BuilderConfig::builder().single_line().build();
        assert_eq!(config.line_separator, " ");
    }

    // =========================================================================
    // Key Binding Tests
    // =========================================================================

    #[test]
    fn test_literal_keys() {
        let config = BuilderConfig::builder().literal_keys().build();
        assert_eq!(config.key_binding, KeyBinding::Literal);
    }

    #[test]
    fn test_key_binding_explicit() {
        let config = BuilderConfig::builder()
            .literal_keys()
            .key_binding(KeyBinding::Parameterized)
            .build();

        assert_eq!(config.key_binding, KeyBinding::Parameterized);
    }

    #[test]
    fn test_key_binding_serde() {
        let json = serde_json::to_string(&KeyBinding::Literal).unwrap();
        assert_eq!(json, "\"literal\"");

        let parsed: KeyBinding = serde_json::from_str("\"parameterized\"").unwrap();
        assert_eq!(parsed, KeyBinding::Parameterized);
    }

    #[test]
    fn test_config_clone() {
        let config1 = BuilderConfig::builder().single_line().literal_keys().build();
        let config2 = config1.clone();

        assert_eq!(config1.line_separator, config2.line_separator);
        assert_eq!(config1.key_binding, config2.key_binding);
    }
}
