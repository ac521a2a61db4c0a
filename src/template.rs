//! Option template rendering.
//!
//! Templates use Jinja syntax and receive four string variables: `key`,
//! `type`, `description` and `default`. The `template` setting selects the
//! built-in template (`"default"`) or a template file; for a file, its
//! directory becomes the search path and its file name the template name.
//! Templates are loaded lazily, so a missing or broken template is only
//! reported when a marker actually needs it.

use std::path::Path;

use minijinja::{AutoEscape, Environment, ErrorKind, Template};
use tracing::error;

use crate::config::schema::DEFAULT_TEMPLATE;
use crate::error::TemplateError;
use crate::options::OptionFields;

/// Built-in option template: a heading, a Nix snippet and a one-row table.
pub const DEFAULT_TEMPLATE_SOURCE: &str = "
## `{{ key }}`

**Snippet**

```nix
{{ key }}
```

**Parameter**

| Type       | Description       | Default       |
| ---------- | ----------------- | ------------- |
| {{ type }} | {{ description }} | {{ default }} |

";

/// Renders option records through the configured template.
///
/// Holds a template environment built once from configuration; it is never
/// mutated after construction.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
    name: String,
}

impl TemplateRenderer {
    /// Builds a renderer for a `template` setting value.
    ///
    /// `"default"` selects the built-in template. Any other value naming an
    /// existing file loads templates from that file's directory. Anything
    /// else leaves only the built-in template available, and the configured
    /// name fails to resolve when first used.
    #[must_use]
    pub fn new(template: &str) -> Self {
        let mut env = Environment::new();
        // Output is Markdown, never HTML.
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let path = Path::new(template);
        if template != DEFAULT_TEMPLATE && path.is_file() {
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map_or_else(|| template.to_string(), |n| n.to_string_lossy().into_owned());
            env.set_loader(minijinja::path_loader(dir));
            return Self { env, name };
        }

        env.set_loader(|name| {
            Ok((name == DEFAULT_TEMPLATE).then(|| DEFAULT_TEMPLATE_SOURCE.to_string()))
        });
        Self {
            env,
            name: template.to_string(),
        }
    }

    /// Renderer for the built-in template.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }

    /// Name the configured template is looked up under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loads (and parses) the configured template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::NotFound` if no template exists under the
    /// configured name, `TemplateError::Syntax` if it fails to parse, and
    /// `TemplateError::Load` for any other loader failure.
    pub fn template(&self) -> Result<OptionTemplate<'_>, TemplateError> {
        let inner = self.env.get_template(&self.name).map_err(|e| {
            let err = match e.kind() {
                ErrorKind::TemplateNotFound => TemplateError::NotFound {
                    name: self.name.clone(),
                },
                ErrorKind::SyntaxError => TemplateError::Syntax {
                    name: self.name.clone(),
                    message: e.to_string(),
                },
                _ => TemplateError::Load {
                    name: self.name.clone(),
                    message: e.to_string(),
                },
            };
            error!(template = %self.name, "{err}");
            err
        })?;
        Ok(OptionTemplate { inner })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A loaded template, ready to render option records.
#[derive(Debug)]
pub struct OptionTemplate<'env> {
    inner: Template<'env, 'env>,
}

impl OptionTemplate<'_> {
    /// Renders one option.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Render` if evaluation of the template fails.
    pub fn render(&self, fields: &OptionFields) -> Result<String, TemplateError> {
        self.inner.render(fields).map_err(|e| {
            error!(key = %fields.key, "Failed to render the template: {e}");
            TemplateError::Render {
                key: fields.key.clone(),
                message: e.to_string(),
            }
        })
    }
}
