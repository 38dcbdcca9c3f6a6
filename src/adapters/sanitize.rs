//! Log sanitization for health data.
//!
//! Self-reported health values are sensitive; they must never land in log
//! files verbatim. The primary protection is to keep feature values out of
//! logging calls entirely — this writer is the defense-in-depth fallback,
//! scrubbing anything that slips through:
//!
//! - Named indicator values (`BMI=34.2`, `"Age": 10`)
//! - Full feature vectors (long numeric arrays)
//! - Common secret formats (bearer tokens, long hex tokens)
//!
//! Scanning untrusted text is not free, so input per write is capped (see
//! `GLUCORA_SANITIZE_MAX_BYTES`); oversized lines are truncated before
//! scrubbing.

use std::io;
use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of bytes sanitized per write; defaults to 16 KiB.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Patterns {
    named_values: Regex,
    vectors: Regex,
    bearer: Regex,
    hex_tokens: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        named_values: Regex::new(
            r#"(?i)["']?(BMI|Age|GenHlth|MentHlth|PhysHlth)["']?\s*[:=]\s*-?\d+(?:\.\d+)?"#,
        )
        .expect("Static regex must compile"),
        vectors: Regex::new(r"\[\s*(?:-?\d+(?:\.\d+)?\s*,\s*){8,}-?\d+(?:\.\d+)?\s*\]")
            .expect("Static regex must compile"),
        bearer: Regex::new(r"(?i)bearer\s+[A-Za-z0-9._~+/=-]+").expect("Static regex must compile"),
        hex_tokens: Regex::new(r"\b[0-9a-fA-F]{32,}\b").expect("Static regex must compile"),
    })
}

fn max_bytes() -> usize {
    std::env::var("GLUCORA_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, limit: usize) -> (&str, bool) {
    if input.len() <= limit {
        return (input, false);
    }

    let mut end = limit.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Scrub sensitive values from a block of text.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let (input, truncated) = truncate_to_char_boundary(input, max_bytes());

    let p = patterns();
    let text = p.named_values.replace_all(input, "$1=[redacted]");
    let text = p.vectors.replace_all(&text, "[redacted-vector]");
    let text = p.bearer.replace_all(&text, "Bearer [redacted]");
    let text = p.hex_tokens.replace_all(&text, "[redacted-token]");

    if truncated {
        format!("{text}…[truncated]")
    } else {
        text.into_owned()
    }
}

/// A `MakeWriter` wrapper that sanitizes every write.
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
        }
    }
}

/// Writer that scrubs each buffer before forwarding it.
pub struct SanitizingWriter<W: io::Write> {
    inner: W,
}

impl<W: io::Write> io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(sanitize(&text).as_bytes())?;
        // Report the original length so tracing never re-sends a suffix.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_values_redacted() {
        let line = r#"encoded answers: "BMI": 34.2, "Age": 10, note=ok"#;
        let clean = sanitize(line);
        assert!(!clean.contains("34.2"));
        assert!(!clean.contains("10"));
        assert!(clean.contains("BMI=[redacted]"));
        assert!(clean.contains("note=ok"));
    }

    #[test]
    fn test_feature_vector_redacted() {
        let line = "invoking with [1.0, 0.0, 1.0, 35.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0]";
        let clean = sanitize(line);
        assert!(!clean.contains("35.0"));
        assert!(clean.contains("[redacted-vector]"));
    }

    #[test]
    fn test_tokens_redacted() {
        let clean = sanitize("auth: Bearer abc.def-ghi");
        assert_eq!(clean, "auth: Bearer [redacted]");

        let clean = sanitize("key 0123456789abcdef0123456789abcdef attached");
        assert!(clean.contains("[redacted-token]"));
    }

    #[test]
    fn test_plain_lines_untouched() {
        let line = "Loaded model \"diabetes-gbdt\" v2 (10 trees, 21 features)";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_short_arrays_untouched() {
        let line = "probabilities [0.2, 0.8]";
        assert_eq!(sanitize(line), line);
    }
}
