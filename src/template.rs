//! Caption text for the image.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

use crate::target::SubmissionState;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Replace `{total}`, `{target}`, `{needed}` and `{percentage}` with their
/// values. Unknown placeholders are kept as written.
pub fn render_text(template: &str, state: &SubmissionState) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match state.field(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Sentence used when no `text` parameter is given.
pub fn default_text(state: &SubmissionState) -> String {
    format!(
        "{} people have taken action so far. We need {} more to reach {}.",
        state.total, state.needed, state.target
    )
}

/// Caption for a request: the default sentence, or the user template after
/// one more round of percent-decoding (templates are often encoded twice).
pub fn resolve_text(template: Option<&str>, state: &SubmissionState) -> String {
    match template {
        None => default_text(state),
        Some(raw) => {
            let decoded = percent_decode_str(raw)
                .decode_utf8()
                .map(|text| text.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            render_text(&decoded, state)
        }
    }
}
