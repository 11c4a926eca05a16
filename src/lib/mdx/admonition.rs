//! GitHub-style callouts.
//!
//! ```text
//! > [!NOTE]
//! > Body
//! ```
//!
//! becomes a `:::note` container directive holding the unquoted body, so
//! callouts and hand-written directives render the same way.

use crate::utils::FenceTracker;

/// Callout kinds GitHub recognises, as directive names.
pub const CALLOUT_KINDS: &[&str] = &["note", "tip", "important", "warning", "caution"];

pub fn rewrite(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence = FenceTracker::new();
    let mut lines = body.lines().peekable();

    while let Some(line) = lines.next() {
        if fence.is_code(line) {
            push_line(&mut out, line);
            continue;
        }

        let Some(kind) = callout_kind(line) else {
            push_line(&mut out, line);
            continue;
        };

        out.push_str(":::");
        push_line(&mut out, kind);
        while let Some(content) = lines.peek().copied().and_then(quoted) {
            push_line(&mut out, content);
            lines.next();
        }
        push_line(&mut out, ":::");
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Content of a blockquote line, with the marker and one space removed.
fn quoted(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn callout_kind(line: &str) -> Option<&'static str> {
    let marker = quoted(line)?.trim();
    let kind = marker.strip_prefix("[!")?.strip_suffix(']')?;
    CALLOUT_KINDS
        .iter()
        .copied()
        .find(|k| k.eq_ignore_ascii_case(kind))
}
