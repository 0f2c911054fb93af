//! One-pass `{{var}}` substitution for prompt templates.
//!
//! Deliberately not a template engine: no expressions, no nesting, no
//! recursion. Substituted values are never rescanned, and placeholders
//! without a binding stay in the output untouched so a typo is visible in
//! the prompt rather than silently evaluated.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_\-]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Renders a template by substituting `{{name}}` placeholders from `vars`.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |captures: &Captures| {
            match vars.get(&captures[1]) {
                Some(value) => value.clone(),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}
