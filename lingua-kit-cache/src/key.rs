use sha2::{Digest, Sha256};

/// Derives the content-addressed cache key for one pipeline step.
///
/// The key binds the language pair, the pipeline, the step name, and the
/// exact step input (prompt plus any upstream outputs baked into it), so a
/// change to any of them produces a different key. The digest is SHA-256,
/// lower hex — also used verbatim as the on-disk filename.
pub fn cache_key(
    source_lang: &str,
    target_lang: &str,
    pipeline_id: &str,
    step_name: &str,
    input: &str,
) -> String {
    let mut hasher = Sha256::new();
    // NUL separators keep adjacent components from aliasing each other.
    for part in [source_lang, target_lang, pipeline_id, step_name, input] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
