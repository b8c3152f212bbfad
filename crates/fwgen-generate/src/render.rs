//! Template rendering.

use std::fmt;
use std::path::{Path, PathBuf};

use minijinja::{Environment, UndefinedBehavior};

use crate::context::GenerationContext;
use crate::error::{GenerateError, Result};

/// Renders one named template against a generation context.
///
/// Object-safe so callers can hold a `&dyn TemplateRenderer`.
pub trait TemplateRenderer: fmt::Debug + Send + Sync {
    fn render(&self, template: &str, context: &GenerationContext) -> Result<String>;
}

/// Renders Jinja-syntax templates from a pack's `templates/` directory.
///
/// Undefined references are errors, never empty strings, and a template's
/// trailing newline is kept.
pub struct MiniJinjaRenderer {
    templates_dir: PathBuf,
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        let templates_dir = templates_dir.into();
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&templates_dir));
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self { templates_dir, env }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

impl fmt::Debug for MiniJinjaRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaRenderer")
            .field("templates_dir", &self.templates_dir)
            .finish_non_exhaustive()
    }
}

fn describe(err: &minijinja::Error) -> String {
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        detail.push_str(": ");
        detail.push_str(&inner.to_string());
        source = inner.source();
    }
    detail
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &GenerationContext) -> Result<String> {
        let to_error = |err: minijinja::Error| {
            if err.kind() == minijinja::ErrorKind::TemplateNotFound {
                GenerateError::MissingTemplate {
                    template: template.to_string(),
                    dir: self.templates_dir.clone(),
                }
            } else {
                GenerateError::Render {
                    template: template.to_string(),
                    detail: describe(&err),
                }
            }
        };
        let tmpl = self.env.get_template(template).map_err(to_error)?;
        let text = tmpl.render(context).map_err(to_error)?;
        tracing::debug!(template, bytes = text.len(), "rendered template");
        Ok(text)
    }
}
