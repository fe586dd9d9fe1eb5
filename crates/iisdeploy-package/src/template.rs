use crate::{Environment, Error, Result};
use std::fs;
use std::path::Path;

/// Renders a configuration template for one environment.
pub trait TemplateConfigurer {
    /// Render `template` with `environment` and write the result to
    /// `destination`, replacing its contents.
    fn configure(&self, template: &Path, environment: &Environment, destination: &Path)
        -> Result<()>;
}

impl<T: TemplateConfigurer + ?Sized> TemplateConfigurer for &T {
    fn configure(
        &self,
        template: &Path,
        environment: &Environment,
        destination: &Path,
    ) -> Result<()> {
        (**self).configure(template, environment, destination)
    }
}

/// Template engine replacing `{{ key }}` placeholders with environment values.
///
/// Unresolved keys and missing templates fail with
/// [`Error::ExternalToolFailure`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderConfigurer;

impl TemplateConfigurer for PlaceholderConfigurer {
    fn configure(
        &self,
        template: &Path,
        environment: &Environment,
        destination: &Path,
    ) -> Result<()> {
        let text = fs::read_to_string(template).map_err(|e| {
            Error::ExternalToolFailure(format!("cannot read {}: {}", template.display(), e))
        })?;

        let rendered = render(&text, environment).map_err(|key| {
            Error::ExternalToolFailure(format!(
                "unresolved key `{}` in {}",
                key,
                template.display()
            ))
        })?;

        fs::write(destination, rendered)?;
        Ok(())
    }
}

/// Substitute placeholders, returning the first unknown key on failure.
fn render(text: &str, environment: &Environment) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let key = rest[open + 2..open + 2 + close].trim();
        let value = environment.get(key).ok_or_else(|| key.to_string())?;

        out.push_str(&rest[..open]);
        out.push_str(value);
        rest = &rest[open + 2 + close + 2..];
    }

    out.push_str(rest);
    Ok(out)
}
