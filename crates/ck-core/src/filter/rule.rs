use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Pattern;
use crate::config::ConfigWarning;

fn default_enabled() -> bool {
    true
}

/// Rule excluding clipboard changes made by a given application.
///
/// Title and class patterns are optional; when present they must match too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    pub process_name: String,
    #[serde(default)]
    pub window_title: Option<String>,
    #[serde(default)]
    pub window_class: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ApplicationFilter {
    pub fn process(name: impl Into<String>) -> Self {
        Self {
            process_name: name.into(),
            window_title: None,
            window_class: None,
            enabled: true,
        }
    }

    pub fn with_title(mut self, pattern: impl Into<String>) -> Self {
        self.window_title = Some(pattern.into());
        self
    }

    pub fn with_class(mut self, pattern: impl Into<String>) -> Self {
        self.window_class = Some(pattern.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    process: Pattern,
    title: Option<Pattern>,
    class: Option<Pattern>,
}

impl CompiledRule {
    fn compile(rule: &ApplicationFilter) -> Result<Self, regex::Error> {
        Ok(Self {
            process: Pattern::parse(&rule.process_name)?,
            title: rule.window_title.as_deref().map(Pattern::parse).transpose()?,
            class: rule.window_class.as_deref().map(Pattern::parse).transpose()?,
        })
    }

    fn matches(&self, process: &str, title: Option<&str>, class: Option<&str>) -> bool {
        if !self.process.is_match(process) {
            return false;
        }
        let optional = |pattern: &Option<Pattern>, value: Option<&str>| match pattern {
            // A window we could not read cannot satisfy a title/class constraint.
            Some(p) => value.is_some_and(|v| p.is_match(v)),
            None => true,
        };
        optional(&self.title, title) && optional(&self.class, class)
    }
}

/// Compiled, ordered set of enabled application filters.
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    rules: Vec<CompiledRule>,
    warnings: Vec<ConfigWarning>,
}

impl SourceFilter {
    /// Compile rules in configured order. Disabled rules are skipped;
    /// malformed rules are skipped with a warning.
    pub fn new(rules: &[ApplicationFilter]) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut warnings = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            if !rule.enabled {
                continue;
            }
            match CompiledRule::compile(rule) {
                Ok(c) => compiled.push(c),
                Err(err) => {
                    warn!(index, process = %rule.process_name, error = %err, "Skipping malformed application filter");
                    warnings.push(ConfigWarning::MalformedFilter {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Self {
            rules: compiled,
            warnings,
        }
    }

    /// `false` when the first matching rule excludes the source.
    pub fn should_capture(
        &self,
        process_name: &str,
        window_title: Option<&str>,
        window_class: Option<&str>,
    ) -> bool {
        !self
            .rules
            .iter()
            .any(|r| r.matches(process_name, window_title, window_class))
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
