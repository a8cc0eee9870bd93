//! Log sanitization for questionnaire answers and stray identifiers.
//!
//! The screening service never logs input values, but formatted messages can
//! still pick up user text through error strings or third-party crates. Every
//! line written by the log sink passes through `sanitize()`, which redacts:
//! - Blood-pressure readings (`120/80`)
//! - `occupation=...` / `occupation: ...` pairs
//! - Email addresses
//! - Long hex tokens (digests, keys)
//!
//! # Performance
//!
//! `sanitize()` caps its input (see `SOMNUS_SANITIZE_MAX_BYTES`) and only
//! applies the rules that a single `RegexSet` scan reports as matching.

use regex::{Regex, RegexSet};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Default per-call limit: 16 KiB.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// `(pattern, replacement)`; applied in order.
const RULES: &[(&str, &str)] = &[
    (
        r"(?i)\b(?:occupation|pekerjaan)\b\s*[:=]\s*(?:'[^']*'|\x22[^\x22]*\x22|[^\s,;]+)",
        "occupation=[REDACTED]",
    ),
    (r"\b\d{2,3}\s*/\s*\d{2,3}\b", "[REDACTED-BP]"),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (r"\b[0-9a-fA-F]{32,}\b", "[REDACTED-HEX]"),
];

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("SOMNUS_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        // The rule table is a compile-time constant; a bad pattern is a programming error.
        let set = RegexSet::new(RULES.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = RULES
            .iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();
        Patterns { set, rules }
    })
}

/// Redact sensitive values from `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let matched = patterns.set.matches(prefix);
    let mut result = prefix.to_string();
    for idx in matched.iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).to_string();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// `MakeWriter` for the log sink: each writer it hands out is a
/// [`LineRedactor`] over the wrapped writer.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
    limit: usize,
}

impl<M> RedactingMakeWriter<M> {
    /// Wrap `inner`, reading the line limit from `SOMNUS_SANITIZE_MAX_BYTES`.
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self::with_limit(inner, max_sanitize_bytes())
    }

    #[must_use]
    pub fn with_limit(inner: M, limit: usize) -> Self {
        Self {
            inner,
            limit: limit.max(1),
        }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = LineRedactor<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        LineRedactor::new(self.inner.make_writer(), self.limit)
    }
}

/// Holds bytes until a full line is available, then writes it redacted.
///
/// A line that grows past `limit` without a newline is cut off and written
/// as its own truncated line. Whatever is still pending on drop is emitted.
pub struct LineRedactor<W: Write> {
    inner: W,
    pending: Vec<u8>,
    limit: usize,
}

impl<W: Write> LineRedactor<W> {
    fn new(inner: W, limit: usize) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            limit,
        }
    }

    fn emit(&mut self, line: &[u8]) -> io::Result<()> {
        let (body, newline) = match line.strip_suffix(b"\n") {
            Some(body) => (body, true),
            None => (line, false),
        };
        let redacted = sanitize_with_limit(&String::from_utf8_lossy(body), self.limit);
        self.inner.write_all(redacted.as_bytes())?;
        if newline {
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    fn emit_complete_lines(&mut self) -> io::Result<()> {
        let Some(end) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        let complete: Vec<u8> = self.pending.drain(..=end).collect();
        for line in complete.split_inclusive(|&b| b == b'\n') {
            self.emit(line)?;
        }
        Ok(())
    }

    fn drain(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let rest = std::mem::take(&mut self.pending);
        self.emit(&rest)
    }
}

impl<W: Write> Write for LineRedactor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.emit_complete_lines()?;

        if self.pending.len() > self.limit {
            self.drain()?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit_complete_lines()?;
        self.drain()?;
        self.inner.flush()
    }
}

impl<W: Write> Drop for LineRedactor<W> {
    fn drop(&mut self) {
        let _ = self.drain();
    }
}
