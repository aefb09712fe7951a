//! Busy-aware placeholder text for the input area.

/// Placeholder shown in an empty, idle input.
const IDLE_PLACEHOLDER: &str = "Type a message…";

/// Placeholder shown while a reply is outstanding.
const BUSY_PLACEHOLDER: &str = "Waiting for reply…";

/// Get placeholder text for the input area.
#[must_use]
pub fn input_placeholder(busy: bool) -> &'static str {
    if busy {
        BUSY_PLACEHOLDER
    } else {
        IDLE_PLACEHOLDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_placeholder() {
        assert_eq!(input_placeholder(false), "Type a message…");
    }

    #[test]
    fn test_busy_placeholder() {
        assert_eq!(input_placeholder(true), "Waiting for reply…");
    }
}
