//! Render configuration that callers can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces per nesting level in PolyAlg text.
    pub indent: usize,

    /// Attach `PlanNodeMetadata` to serialized JSON nodes.
    pub include_metadata: bool,

    /// Omit keyword arguments whose rendering equals their default.
    pub elide_default_keywords: bool,

    /// Tolerance when deciding whether a node holds a global maximum.
    pub badge_epsilon: f64,

    /// Make concatenated input field names unique before rendering.
    pub uniquify_input_names: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            include_metadata: true,
            elide_default_keywords: true,
            badge_epsilon: 1e-7,
            uniquify_input_names: true,
        }
    }
}

impl RenderConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `POLYALG_INDENT`: spaces per nesting level
    /// - `POLYALG_INCLUDE_METADATA`: `true`/`false`
    /// - `POLYALG_ELIDE_DEFAULTS`: `true`/`false`
    /// - `POLYALG_BADGE_EPSILON`: float tolerance
    /// - `POLYALG_UNIQUIFY_INPUTS`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("POLYALG_INDENT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.indent = v;
            }
        }

        if let Ok(s) = std::env::var("POLYALG_INCLUDE_METADATA") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.include_metadata = v;
            }
        }

        if let Ok(s) = std::env::var("POLYALG_ELIDE_DEFAULTS") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.elide_default_keywords = v;
            }
        }

        if let Ok(s) = std::env::var("POLYALG_BADGE_EPSILON") {
            if let Ok(v) = s.parse::<f64>() {
                cfg.badge_epsilon = v;
            }
        }

        if let Ok(s) = std::env::var("POLYALG_UNIQUIFY_INPUTS") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.uniquify_input_names = v;
            }
        }

        cfg
    }

    /// Parse a YAML document; absent keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.badge_epsilon.is_finite() || self.badge_epsilon < 0.0 {
            return Err(Error::Config(format!(
                "badge_epsilon must be a non-negative finite number, got {}",
                self.badge_epsilon
            )));
        }
        if self.indent > 16 {
            return Err(Error::Config(format!(
                "indent of {} spaces is too wide (max 16)",
                self.indent
            )));
        }
        Ok(())
    }

    pub fn indent_str(&self, depth: usize) -> String {
        " ".repeat(self.indent * depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_only_given_keys() {
        let cfg = RenderConfig::from_yaml_str("indent: 4\ninclude_metadata: false\n").unwrap();
        assert_eq!(cfg.indent, 4);
        assert!(!cfg.include_metadata);
        assert!(cfg.elide_default_keywords);
        assert_eq!(cfg.badge_epsilon, 1e-7);
    }

    #[test]
    fn negative_epsilon_is_rejected() {
        let err = RenderConfig::from_yaml_str("badge_epsilon: -1.0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_yaml_maps_to_config_error() {
        let err = RenderConfig::from_yaml_str("indent: [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
