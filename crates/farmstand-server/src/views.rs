//! Template rendering.
//!
//! Views are addressed by logical names such as `products/index.html` and
//! loaded from a directory through minijinja's path loader, so layouts can
//! be shared with `{% extends %}`. HTML templates are auto-escaped.

use std::path::Path;

use farmstand_core::{CatalogError, CatalogResult};
use minijinja::{path_loader, Environment, Value};

use crate::error::ServerError;

/// Renders named views.
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    env: Environment<'static>,
}

impl ViewRenderer {
    /// Loads templates lazily from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = base_environment();
        env.set_loader(path_loader(dir.as_ref()));
        Self { env }
    }

    /// Registers in-memory templates, mainly for tests.
    pub fn from_templates<I, N, S>(templates: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = base_environment();
        for (name, source) in templates {
            let name = name.into();
            env.add_template_owned(name.clone(), source.into())
                .map_err(|source| ServerError::View { name, source })?;
        }
        Ok(Self { env })
    }

    /// A renderer with no templates; every render fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            env: base_environment(),
        }
    }

    /// Renders `name` with `context`.
    pub fn render(&self, name: &str, context: &Value) -> CatalogResult<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| CatalogError::internal_with_source(format!("view '{name}' not found"), e))?;
        template
            .render(context)
            .map_err(|e| CatalogError::internal_with_source(format!("failed to render view '{name}'"), e))
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("money", money);
    env
}

/// Formats a price with two decimals.
fn money(value: f64) -> String {
    format!("{value:.2}")
}
