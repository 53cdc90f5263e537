//! Code fence tracking for line-oriented directive scanning.
//!
//! Directive markers inside fenced code blocks are literal text.

/// Tracks fenced code block state while walking lines.
///
/// Fences use three or more backticks or tildes, indented by at most three
/// spaces. A closing fence uses the same character, is at least as long as
/// the opening one, and carries nothing but whitespace after it.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the last processed line left us inside a fence.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let Some(trimmed) = strip_fence_indent(line) else {
            return false;
        };

        match self.open {
            Some((ch, len)) => {
                if is_closing_fence(trimmed, ch, len) {
                    self.open = None;
                    true
                } else {
                    false
                }
            }
            None => match detect_fence(trimmed) {
                Some(fence) => {
                    self.open = Some(fence);
                    true
                }
                None => false,
            },
        }
    }
}

/// Strip up to three leading spaces; deeper indentation is an indented code
/// block, not a fence.
fn strip_fence_indent(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        None
    } else {
        Some(&line[indent..])
    }
}

/// Detect an opening fence, returning its character and length.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    // Backtick fence info strings may not contain backticks
    if count < 3 || (first == '`' && trimmed[count..].contains('`')) {
        return None;
    }
    Some((first, count))
}

fn is_closing_fence(trimmed: &str, expected: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected) {
        return false;
    }
    let count = trimmed.chars().take_while(|&c| c == expected).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.in_fence());

        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());
        assert!(!tracker.update(":::toggle"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("~~~"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
        assert!(tracker.update("~~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_shorter_fence_does_not_close() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("````"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
        assert!(tracker.update("````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_with_info_does_not_close() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```"));
        assert!(!tracker.update("```rust"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_indented_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("   ```"));
        assert!(tracker.update("  ```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_four_space_indent_is_not_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("    ```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_inline_code_is_not_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``inline``"));
        assert!(!tracker.update("```inline``` code"));
        assert!(!tracker.in_fence());
    }
}
