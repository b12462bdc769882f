//! Templates compiled into the binary.

use cdkpipe_core::application::{IoFailure, ports::TemplateLibrary};

const TEMPLATES: [(&str, &str); 4] = [
    (
        "bin/pipeline.ts",
        include_str!("../../templates/bin/pipeline.ts"),
    ),
    (
        "lib/pipeline-stack.ts",
        include_str!("../../templates/lib/pipeline-stack.ts"),
    ),
    (
        "lib/scheduled-lambda-stack.ts",
        include_str!("../../templates/lib/scheduled-lambda-stack.ts"),
    ),
    (
        "lib/scheduled-lambda-stack.lambda.ts",
        include_str!("../../templates/lib/scheduled-lambda-stack.lambda.ts"),
    ),
];

/// The built-in pipeline templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Library paths of every built-in template.
    pub fn names() -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|(name, _)| *name)
    }
}

impl TemplateLibrary for EmbeddedTemplates {
    fn load(&self, name: &str) -> Result<String, IoFailure> {
        TEMPLATES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, content)| (*content).to_string())
            .ok_or_else(|| IoFailure::TemplateUnreadable {
                template: name.to_string(),
                reason: "no built-in template with this name".into(),
            })
    }
}
