//! Placeholder substitution for generated project files.

use std::collections::BTreeMap;

use crate::domain::context::PipelineContext;

/// Context for template rendering.
///
/// A flat, string-keyed variable map. Rendering replaces every
/// `{{key}}` (surrounding whitespace inside the braces is allowed) whose key
/// is defined, and leaves every other brace sequence untouched.
///
/// ## Variables provided by [`RenderContext::for_pipeline`]
///
/// | Variable | Example |
/// |----------|---------|
/// | `account_id` | "123456789012" |
/// | `project_region` | "eu-west-1" |
/// | `project_name` | "demo-app" |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    // BTreeMap keeps debug output stable.
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The variables every pipeline template may reference.
    pub fn for_pipeline(ctx: &PipelineContext) -> Self {
        Self::new()
            .with_variable("account_id", ctx.account_id().as_str())
            .with_variable("project_region", ctx.region().as_str())
            .with_variable("project_name", ctx.project_name().as_str())
    }

    /// Add a variable, consuming self and returning the extended context.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Render a template string.
    ///
    /// Single left-to-right scan: substituted values are never rescanned, so
    /// a value that itself contains `{{...}}` is emitted literally.
    ///
    /// - `{{unknown}}` stays as literal `{{unknown}}`
    /// - `{{ project_name }}` is replaced like `{{project_name}}`
    /// - an unterminated `{{` is copied through
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];

            let Some(close) = after_open.find("}}") else {
                out.push_str(&rest[open..]);
                return out;
            };

            let key = after_open[..close].trim();
            match self.variables.get(key) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[open..open + 2 + close + 2]),
            }
            rest = &after_open[close + 2..];
        }

        out.push_str(rest);
        out
    }
}
