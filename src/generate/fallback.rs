use lazy_static::lazy_static;
use regex::Regex;

use crate::config::DEFAULT_MODEL;

/// Build the ordered list of models to try for one generation request.
///
/// `-latest` aliases are not available on every API version, so they expand
/// into pinned (`-001`) and bare variants before the guaranteed
/// `gemini-1.5-flash` tail. Order-preserving, deduplicated, no empties.
pub fn build_fallback_chain(requested: &str) -> Vec<String> {
    let trimmed = requested.trim();
    let primary = if trimmed.is_empty() {
        DEFAULT_MODEL
    } else {
        trimmed
    };

    let mut candidates = vec![primary.to_string()];

    if primary.to_ascii_lowercase().ends_with("-latest") {
        let base = &primary[..primary.len() - "-latest".len()];
        candidates.push(format!("{base}-001"));
        candidates.push(base.to_string());
    }

    if !candidates.iter().any(|c| c == DEFAULT_MODEL) {
        candidates.push(DEFAULT_MODEL.to_string());
    }

    let mut chain: Vec<String> = Vec::with_capacity(candidates.len());
    for c in candidates {
        if !c.is_empty() && !chain.contains(&c) {
            chain.push(c);
        }
    }
    chain
}

/// Strip markdown code-fence markers from generated markup and trim it.
/// Idempotent on fence-free text.
pub fn sanitize_html(text: &str) -> String {
    lazy_static! {
        static ref FENCE_RE: Regex = Regex::new(r"(?i)```html?").unwrap();
    }
    FENCE_RE
        .replace_all(text, "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Whether an upstream failure means "this model does not exist here" and the
/// next candidate is worth trying.
pub fn is_missing_model(status: Option<u16>, message: &str) -> bool {
    lazy_static! {
        static ref MISSING_RE: Regex = Regex::new(r"(?i)not found|not supported").unwrap();
    }
    status == Some(404) || MISSING_RE.is_match(message)
}
