//! Template rendering against the normalized configuration.

use std::path::Path;

use minijinja::Environment;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(templates_dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(templates_dir));
        Renderer { env }
    }

    pub fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, RenderError> {
        let template = self.env.get_template(template)?;
        Ok(template.render(context)?)
    }
}
