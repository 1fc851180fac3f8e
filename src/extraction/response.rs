// src/extraction/response.rs
//! Strips markdown code fences from model output.
//!
//! Grammar, applied to the trimmed response:
//!
//! ```text
//! response := fence_open? body fence_close?
//! fence_open := "```" lang_tag? [ \t]* ("\n" | end)
//! lang_tag := [A-Za-z0-9_+-]+
//! fence_close := "```"            (only as the final three characters)
//! ```
//!
//! A closing fence is only removed when an opening fence was. Backticks
//! anywhere inside the body are left alone.

const FENCE: &str = "```";

pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = skip_fence_header(after_open);
    let body = body.strip_suffix(FENCE).unwrap_or(body);
    body.trim()
}

fn skip_fence_header(after_open: &str) -> &str {
    let tag_len = after_open
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')))
        .unwrap_or(after_open.len());
    let rest = &after_open[tag_len..];
    let rest = rest.trim_start_matches([' ', '\t']);

    if let Some(stripped) = rest.strip_prefix("\r\n") {
        stripped
    } else if let Some(stripped) = rest.strip_prefix('\n') {
        stripped
    } else {
        rest
    }
}
