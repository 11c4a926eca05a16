/// Tracks fenced code blocks while scanning markdown line by line, so
/// text-level passes can leave code untouched.
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` when the line is code: an opening
    /// or closing fence, or anything between them.
    pub fn is_code(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some((ch, len)) => {
                let run = trimmed.chars().take_while(|&c| c == ch).count();
                if run >= len && trimmed[run * ch.len_utf8()..].trim().is_empty() {
                    self.open = None;
                }
                true
            }
            None => match fence_marker(trimmed) {
                Some(marker) => {
                    self.open = Some(marker);
                    true
                }
                None => false,
            },
        }
    }
}

fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let run = trimmed.chars().take_while(|&c| c == first).count();
    // Backtick fences may not carry backticks in their info string.
    if first == '`' && trimmed[run..].contains('`') {
        return None;
    }
    (run >= 3).then_some((first, run))
}

#[cfg(test)]
mod tests {
    use super::FenceTracker;

    #[test]
    fn backtick_fence_is_code() {
        let mut fence = FenceTracker::new();
        assert!(!fence.is_code("text"));
        assert!(fence.is_code("```rust"));
        assert!(fence.in_fence());
        assert!(fence.is_code("# not a heading"));
        assert!(fence.is_code("```"));
        assert!(!fence.in_fence());
        assert!(!fence.is_code("after"));
    }

    #[test]
    fn shorter_run_does_not_close() {
        let mut fence = FenceTracker::new();
        assert!(fence.is_code("~~~~"));
        assert!(fence.is_code("~~~"));
        assert!(fence.in_fence());
        assert!(fence.is_code("~~~~~"));
        assert!(!fence.in_fence());
    }

    #[test]
    fn inline_code_is_not_a_fence() {
        let mut fence = FenceTracker::new();
        assert!(!fence.is_code("``` inline ``` code"));
        assert!(!fence.in_fence());
    }
}
