//! Marker expansion.
//!
//! Finds every `::nixos-options::<module_path>::` marker in a Markdown page,
//! evaluates the module, renders each of its options through the template,
//! and splices the rendered text in place of the marker.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::schema::PluginConfig;
use crate::error::Result;
use crate::evaluator::{ModuleEvaluator, NixEvaluator};
use crate::template::TemplateRenderer;

/// Prefix every marker starts with; its absence short-circuits expansion.
pub const MARKER_PREFIX: &str = "::nixos-options::";

/// Matches a marker, capturing the shortest module path up to the next `::`.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"::nixos-options::(?P<module_path>.*?)::").expect("valid regex")
});

/// Expands every marker in `text`.
///
/// Returns `text` unchanged, without touching the evaluator or template, when
/// `enabled` is false or no marker prefix occurs. Otherwise markers are
/// processed in order of appearance; each one's rendered options replace
/// the first remaining occurrence of that exact marker text.
///
/// Options whose type is `"unknown"` are skipped.
///
/// # Errors
///
/// The first evaluator or template failure aborts the whole expansion.
pub fn expand(
    text: &str,
    enabled: bool,
    evaluator: &dyn ModuleEvaluator,
    renderer: &TemplateRenderer,
) -> Result<String> {
    if !enabled || !text.contains(MARKER_PREFIX) {
        return Ok(text.to_string());
    }

    let mut output = text.to_string();

    for captures in MARKER_RE.captures_iter(text) {
        let marker = &captures[0];
        let module_path = &captures["module_path"];

        let response = evaluator.evaluate(module_path)?;
        let template = renderer.template()?;

        let mut rendered = String::new();
        for (key, record) in &response {
            debug!(key = %key, record = ?record, "processing option");
            if record.is_unknown() {
                continue;
            }
            rendered.push_str(&template.render(&record.fields(key))?);
        }

        output = output.replacen(marker, &rendered, 1);
    }

    Ok(output)
}

/// Marker expander bound to one configuration.
///
/// Built once; the configuration and the template environment derived from
/// it never change afterwards.
pub struct Expander {
    config: PluginConfig,
    renderer: TemplateRenderer,
    evaluator: Box<dyn ModuleEvaluator>,
}

impl Expander {
    /// Creates an expander that evaluates modules with `nix`.
    #[must_use]
    pub fn new(config: PluginConfig) -> Self {
        let evaluator = NixEvaluator::from_config(&config);
        Self::with_evaluator(config, evaluator)
    }

    /// Creates an expander with a custom evaluator.
    pub fn with_evaluator(config: PluginConfig, evaluator: impl ModuleEvaluator + 'static) -> Self {
        let renderer = TemplateRenderer::new(&config.template);
        Self {
            config,
            renderer,
            evaluator: Box::new(evaluator),
        }
    }

    /// The configuration this expander was built from.
    #[must_use]
    pub const fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Expands every marker in `text`. See [`expand`].
    ///
    /// # Errors
    ///
    /// Returns the first evaluator or template error encountered.
    pub fn expand(&self, text: &str) -> Result<String> {
        expand(text, self.config.enable, self.evaluator.as_ref(), &self.renderer)
    }
}

impl std::fmt::Debug for Expander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expander")
            .field("config", &self.config)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}
