//! Code fence detection.
//!
//! Only triple-backtick fences are recognised. The opening fence may carry a
//! language tag; any line whose trimmed form starts with the fence closes it.

const FENCE: &str = "```";

/// Check whether a line opens or closes a fenced code block.
pub(crate) fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

/// Extract the language tag from an opening fence line.
///
/// Returns `None` for a bare fence or a line that is not a fence at all.
pub(crate) fn fence_language(line: &str) -> Option<String> {
    let info = line.trim().strip_prefix(FENCE)?.trim();
    if info.is_empty() {
        None
    } else {
        Some(info.to_owned())
    }
}

/// Fence transition reported by [`FenceTracker::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FenceEvent {
    /// An opening fence, with its language tag.
    Open(Option<String>),
    /// The closing fence of the current block.
    Close,
    /// Not a fence line.
    None,
}

/// Tracks fenced code block state during line-by-line processing.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: bool,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open
    }

    /// Update fence state based on a line and report the transition.
    pub(crate) fn update(&mut self, line: &str) -> FenceEvent {
        if !is_fence(line) {
            return FenceEvent::None;
        }
        if self.open {
            self.open = false;
            FenceEvent::Close
        } else {
            self.open = true;
            FenceEvent::Open(fence_language(line))
        }
    }

    pub(crate) fn reset(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert_eq!(
            tracker.update("```rust"),
            FenceEvent::Open(Some("rust".to_owned()))
        );
        assert!(tracker.in_fence());

        assert_eq!(tracker.update("fn main() {}"), FenceEvent::None);
        assert!(tracker.in_fence());

        assert_eq!(tracker.update("```"), FenceEvent::Close);
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_indented_fence() {
        let mut tracker = FenceTracker::new();

        assert_eq!(tracker.update("   ```"), FenceEvent::Open(None));
        assert_eq!(tracker.update("  ```"), FenceEvent::Close);
    }

    #[test]
    fn test_closing_fence_may_carry_text() {
        let mut tracker = FenceTracker::new();

        tracker.update("```");
        assert_eq!(tracker.update("```js"), FenceEvent::Close);
    }

    #[test]
    fn test_tilde_is_not_a_fence() {
        let mut tracker = FenceTracker::new();

        assert_eq!(tracker.update("~~~"), FenceEvent::None);
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_two_backticks_not_fence() {
        assert!(!is_fence("``inline code``"));
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("```  python  "), Some("python".to_owned()));
        assert_eq!(fence_language("```"), None);
        assert_eq!(fence_language("plain"), None);
    }

    #[test]
    fn test_reset() {
        let mut tracker = FenceTracker::new();
        tracker.update("```");
        tracker.reset();
        assert!(!tracker.in_fence());
    }
}
