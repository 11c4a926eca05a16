use std::collections::HashMap;

mod fence;

pub use fence::FenceTracker;

/// HTML-escape text content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// HTML-escape attribute values (same rules as text for this codebase).
pub fn escape_attr(s: &str) -> String {
    escape_text(s)
}

/// One piece of a line split by [`code_spans`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(&'a str),
    /// An inline code span, backticks included.
    Code(&'a str),
}

/// Split a line into prose and inline code spans. A backtick run without a
/// matching closing run is prose. Escaped backticks never open a span.
pub fn code_spans(line: &str) -> Vec<Segment<'_>> {
    let bytes = line.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let run = backtick_run(&bytes[i..]);
                match closing_run(&bytes[i + run..], run) {
                    Some(offset) => {
                        let end = i + run + offset + run;
                        if start < i {
                            segments.push(Segment::Prose(&line[start..i]));
                        }
                        segments.push(Segment::Code(&line[i..end]));
                        start = end;
                        i = end;
                    }
                    None => i += run,
                }
            }
            _ => i += 1,
        }
    }

    if start < line.len() {
        segments.push(Segment::Prose(&line[start..]));
    }
    segments
}

fn backtick_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| b == b'`').count()
}

fn closing_run(bytes: &[u8], len: usize) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = backtick_run(&bytes[i..]);
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Compute the base anchor for a heading text.
///
/// Lower-cases letters, keeps letters, digits, `-` and `_`, drops other
/// punctuation and turns each whitespace run into one `-`. May return an
/// empty string when nothing survives.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            pending_dash = true;
            continue;
        }

        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            for lc in ch.to_lowercase() {
                out.push(lc);
            }
        }
    }

    out
}

/// Produces unique anchors within one document.
///
/// Repeats of an anchor get `-1`, `-2`, … appended. A candidate suffix that
/// collides with an anchor produced earlier is skipped. Use one `Slugger`
/// per document.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique anchor for `text`, or `None` if the text has no anchor
    /// characters at all.
    pub fn slug(&mut self, text: &str) -> Option<String> {
        let base = slugify(text);
        if base.is_empty() {
            return None;
        }

        let mut candidate = base.clone();
        while self.occurrences.contains_key(&candidate) {
            let n = self.occurrences.entry(base.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{base}-{n}");
        }

        self.occurrences.insert(candidate.clone(), 0);
        Some(candidate)
    }

    pub fn reset(&mut self) {
        self.occurrences.clear();
    }
}
