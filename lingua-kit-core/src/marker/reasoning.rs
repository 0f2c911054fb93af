//! Removal of model-emitted reasoning spans from step output.

use log::warn;
use regex::Regex;

/// Tag names stripped by default, covering the common English and Chinese
/// reasoning wrappers.
pub fn default_reasoning_tags() -> Vec<String> {
    ["reasoning", "think", "thinking", "思考", "推理"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Removes every `<tag>...</tag>` span for the configured tag set, then
/// trims the result.
///
/// Applied to provider output before it is propagated to the next step or
/// cached, so reasoning never contaminates downstream prompts.
pub fn strip_reasoning(text: &str, tags: &[String]) -> String {
    let mut stripped = text.to_string();
    for tag in tags {
        let escaped = regex::escape(tag);
        let pattern = format!(r"(?is)<{escaped}>.*?</{escaped}>");
        match Regex::new(&pattern) {
            Ok(re) => stripped = re.replace_all(&stripped, "").into_owned(),
            Err(e) => warn!("skipping unusable reasoning tag '{tag}': {e}"),
        }
    }
    stripped.trim().to_string()
}
