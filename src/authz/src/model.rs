//! Authorization model definitions
//!
//! A model describes how access decisions are evaluated: the shape of a
//! request, the shape of a stored policy rule, the effect rule, and the
//! matcher expression. Models arrive either as inline text or as a file
//! path; inline text wins when both are configured, which avoids a file
//! read entirely.
//!
//! The format is the classic sectioned INI dialect:
//!
//! ```text
//! [request_definition]
//! r = sub, obj, act
//!
//! [policy_definition]
//! p = sub, obj, act
//!
//! [policy_effect]
//! e = some(where (p.eft == allow))
//!
//! [matchers]
//! m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
//! ```

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{AuthzError, Result};

/// Section holding the request shape (`r = sub, obj, act`)
pub const SECTION_REQUEST: &str = "request_definition";
/// Section holding the policy rule shape (`p = sub, obj, act`)
pub const SECTION_POLICY: &str = "policy_definition";
/// Section holding the effect rule
pub const SECTION_EFFECT: &str = "policy_effect";
/// Section holding the matcher expression
pub const SECTION_MATCHERS: &str = "matchers";

/// Sections a model must define to be structurally valid
const REQUIRED_SECTIONS: [&str; 4] = [
    SECTION_REQUEST,
    SECTION_POLICY,
    SECTION_EFFECT,
    SECTION_MATCHERS,
];

/// Parsed in-memory model definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    sections: HashMap<String, HashMap<String, String>>,
}

impl Model {
    /// Parse a model from inline text.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let Some(name) = rest.strip_suffix(']') else {
                    return Err(AuthzError::ModelParse(format!(
                        "line {}: unterminated section header '{}'",
                        line_no, line
                    )));
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(AuthzError::ModelParse(format!(
                        "line {}: empty section name",
                        line_no
                    )));
                }
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let Some(section) = &current else {
                return Err(AuthzError::ModelParse(format!(
                    "line {}: assignment outside of any section",
                    line_no
                )));
            };

            // The first '=' is the assignment; matcher expressions keep
            // their own '==' operators intact on the value side.
            let Some((key, value)) = line.split_once('=') else {
                return Err(AuthzError::ModelParse(format!(
                    "line {}: expected 'key = value', got '{}'",
                    line_no, line
                )));
            };
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                return Err(AuthzError::ModelParse(format!(
                    "line {}: empty key",
                    line_no
                )));
            }

            sections
                .entry(section.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }

        let model = Self { sections };
        model.validate()?;
        Ok(model)
    }

    /// Load and parse a model from a file on disk.
    ///
    /// A missing or unreadable file is a model error, same as bad syntax.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading model from {}", path.display());

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AuthzError::ModelParse(format!("failed to read model file {}: {}", path.display(), e))
        })?;

        Self::from_text(&text)
    }

    fn validate(&self) -> Result<()> {
        for section in REQUIRED_SECTIONS {
            let Some(entries) = self.sections.get(section) else {
                return Err(AuthzError::ModelParse(format!(
                    "missing required section [{}]",
                    section
                )));
            };
            if entries.is_empty() {
                return Err(AuthzError::ModelParse(format!(
                    "section [{}] has no entries",
                    section
                )));
            }
        }
        Ok(())
    }

    /// Look up a single value, e.g. `value(SECTION_MATCHERS, "m")`.
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Tokens of the request definition `r`, e.g. `["sub", "obj", "act"]`.
    pub fn request_tokens(&self) -> Vec<&str> {
        self.tokens(SECTION_REQUEST, "r")
    }

    /// Tokens of the policy definition `p`.
    pub fn policy_tokens(&self) -> Vec<&str> {
        self.tokens(SECTION_POLICY, "p")
    }

    fn tokens(&self, section: &str, key: &str) -> Vec<&str> {
        self.value(section, key)
            .map(|v| v.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASIC_MODEL: &str = r#"
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
"#;

    #[test]
    fn test_parse_basic_model() {
        let model = Model::from_text(BASIC_MODEL).unwrap();
        assert_eq!(model.request_tokens(), vec!["sub", "obj", "act"]);
        assert_eq!(model.policy_tokens(), vec!["sub", "obj", "act"]);
        assert_eq!(
            model.value(SECTION_MATCHERS, "m"),
            Some("r.sub == p.sub && r.obj == p.obj && r.act == p.act")
        );
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let text = "# leading comment\n\n[request_definition]\nr = sub, obj, act\n\
                    [policy_definition]\np = sub, obj, act\n# trailing\n\
                    [policy_effect]\ne = some(where (p.eft == allow))\n\
                    [matchers]\nm = r.sub == p.sub\n";
        assert!(Model::from_text(text).is_ok());
    }

    #[test]
    fn test_missing_section_rejected() {
        let text = "[request_definition]\nr = sub, obj, act\n";
        let err = Model::from_text(text).unwrap_err();
        assert!(matches!(err, AuthzError::ModelParse(_)));
        assert!(err.to_string().contains("policy_definition"));
    }

    #[test]
    fn test_assignment_outside_section_rejected() {
        let err = Model::from_text("r = sub, obj, act\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_unterminated_header_rejected() {
        let err = Model::from_text("[request_definition\nr = sub\n").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_missing_equals_rejected() {
        let text = "[request_definition]\njust some words\n";
        let err = Model::from_text(text).unwrap_err();
        assert!(err.to_string().contains("key = value"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file_is_model_error() {
        let err = Model::from_path("/nonexistent/model.conf").await.unwrap_err();
        assert!(matches!(err, AuthzError::ModelParse(_)));
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.conf");
        tokio::fs::write(&path, BASIC_MODEL).await.unwrap();

        let model = Model::from_path(&path).await.unwrap();
        assert_eq!(model.request_tokens(), vec!["sub", "obj", "act"]);
    }

    proptest! {
        // The parser must reject junk with an error, never panic.
        #[test]
        fn test_parser_never_panics(input in ".*") {
            let _ = Model::from_text(&input);
        }
    }
}
