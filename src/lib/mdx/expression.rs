//! MDX expressions.
//!
//! Expressions are not evaluated. `{/* comments */}` are removed, and every
//! other `{` outside code must have a matching `}`; an unmatched brace would
//! make the document unparsable as MDX.

use crate::{
    error::CompileError,
    utils::{FenceTracker, Segment, code_spans},
};

const COMMENT_OPEN: &str = "{/*";
const COMMENT_CLOSE: &str = "*/}";

#[derive(Default)]
struct Scan {
    depth: usize,
    /// Line of the outermost open brace.
    opened_on: usize,
    /// Line a comment started on, while inside one.
    comment_from: Option<usize>,
}

pub fn strip(text: &str) -> Result<String, CompileError> {
    let mut out = String::with_capacity(text.len());
    let mut fence = FenceTracker::new();
    let mut scan = Scan::default();

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;

        let idle = scan.depth == 0 && scan.comment_from.is_none();
        if idle && fence.is_code(line) {
            out.push_str(line);
            continue;
        }

        for segment in code_spans(line) {
            match segment {
                Segment::Code(code) if scan.comment_from.is_none() => out.push_str(code),
                Segment::Code(_) => {}
                Segment::Prose(prose) => scan.prose(prose, line_no, &mut out)?,
            }
        }
    }

    if let Some(line) = scan.comment_from {
        return Err(CompileError::UnbalancedExpression { line });
    }
    if scan.depth > 0 {
        return Err(CompileError::UnbalancedExpression {
            line: scan.opened_on,
        });
    }

    Ok(out)
}

impl Scan {
    fn prose(&mut self, prose: &str, line_no: usize, out: &mut String) -> Result<(), CompileError> {
        let mut rest = prose;

        while let Some(ch) = rest.chars().next() {
            if self.comment_from.is_some() {
                match rest.find(COMMENT_CLOSE) {
                    Some(end) => {
                        rest = &rest[end + COMMENT_CLOSE.len()..];
                        self.comment_from = None;
                    }
                    None => {
                        // Keep line structure so later line numbers hold.
                        if rest.ends_with('\n') {
                            out.push('\n');
                        }
                        rest = "";
                    }
                }
                continue;
            }

            if rest.starts_with(COMMENT_OPEN) {
                self.comment_from = Some(line_no);
                rest = &rest[COMMENT_OPEN.len()..];
                continue;
            }

            let len = ch.len_utf8();
            match ch {
                '\\' => {
                    let escaped = rest[len..].chars().next().map_or(0, char::len_utf8);
                    out.push_str(&rest[..len + escaped]);
                    rest = &rest[len + escaped..];
                    continue;
                }
                '{' => {
                    if self.depth == 0 {
                        self.opened_on = line_no;
                    }
                    self.depth += 1;
                }
                '}' => {
                    if self.depth == 0 {
                        return Err(CompileError::UnbalancedExpression { line: line_no });
                    }
                    self.depth -= 1;
                }
                _ => {}
            }
            out.push(ch);
            rest = &rest[len..];
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::strip;
    use crate::error::CompileError;

    #[test]
    fn comments_are_removed() {
        assert_eq!(
            strip("Keep {/* hidden */}this.\n").unwrap(),
            "Keep this.\n"
        );
        assert_eq!(
            strip("a {/* spans\nlines */} b\nnext\n").unwrap(),
            "a \n b\nnext\n"
        );
    }

    #[test]
    fn balanced_expressions_are_kept() {
        let body = "Total: {props.count} items {a: {b: 1}}\n";
        assert_eq!(strip(body).unwrap(), body);
    }

    #[test]
    fn code_is_exempt() {
        let body = "Use `}` or `{`.\n\n```js\nfunction f() {\n```\n";
        assert_eq!(strip(body).unwrap(), body);
    }

    #[test]
    fn escaped_braces_are_literal() {
        let body = "Literal \\{ brace\n";
        assert_eq!(strip(body).unwrap(), body);
    }

    #[test]
    fn unbalanced_braces_are_errors() {
        assert_eq!(
            strip("ok\nstray }\n"),
            Err(CompileError::UnbalancedExpression { line: 2 })
        );
        assert_eq!(
            strip("ok\n{never closed\nmore\n"),
            Err(CompileError::UnbalancedExpression { line: 2 })
        );
        assert_eq!(
            strip("{/* open comment\n"),
            Err(CompileError::UnbalancedExpression { line: 1 })
        );
    }
}
