//! Transcript scroll state.
//!
//! Offsets are measured in rendered rows. The view keeps a `target` row and
//! eases the visible `offset` toward it on every tick, which gives the
//! smooth scroll to the newest entry.

/// Rows scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Transcript pane state.
#[derive(Debug, Clone)]
pub struct TranscriptState {
    /// First visible row.
    offset: usize,
    /// Row the view is easing toward.
    target: usize,
    /// Whether new content re-targets the bottom.
    follow: bool,
    /// Revision of the last conversation snapshot seen.
    seen_revision: Option<u64>,
    /// Total rendered rows of the last sync.
    content_rows: usize,
    /// Visible rows of the last sync.
    viewport_rows: usize,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    /// Create a new transcript state following the newest entry.
    pub fn new() -> Self {
        Self {
            offset: 0,
            target: 0,
            follow: true,
            seen_revision: None,
            content_rows: 0,
            viewport_rows: 0,
        }
    }

    /// First visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Row the view is easing toward.
    #[cfg(test)]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Check if follow mode is enabled.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Whether a scroll animation is in progress.
    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.offset != self.target
    }

    /// Whether rows exist below the viewport.
    pub fn has_more_below(&self) -> bool {
        self.offset < self.max_offset()
    }

    fn max_offset(&self) -> usize {
        self.content_rows.saturating_sub(self.viewport_rows)
    }

    /// Reconcile with the latest conversation snapshot and layout.
    ///
    /// A new `revision` re-targets the bottom while following. The first
    /// sync jumps there directly.
    pub fn sync(&mut self, revision: u64, content_rows: usize, viewport_rows: usize) {
        self.content_rows = content_rows;
        self.viewport_rows = viewport_rows;
        let max = self.max_offset();

        match self.seen_revision {
            None => {
                self.offset = max;
                self.target = max;
            }
            Some(seen) if seen != revision && self.follow => {
                self.target = max;
            }
            _ => {}
        }
        self.seen_revision = Some(revision);

        // Layout changes (resize) can shrink the scrollable range.
        self.target = self.target.min(max);
        self.offset = self.offset.min(max);
        if self.follow {
            self.target = max;
        }
    }

    /// Advance the scroll animation by one step.
    ///
    /// Each step closes half the remaining distance, at least one row.
    /// Returns `true` if the offset moved.
    pub fn tick(&mut self) -> bool {
        if self.offset == self.target {
            return false;
        }
        let distance = self.offset.abs_diff(self.target);
        let step = (distance / 2).max(1);
        if self.offset < self.target {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        true
    }

    /// Scroll up by the given number of rows. Pauses follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        if amount == 0 || self.offset == 0 {
            return;
        }
        self.follow = false;
        self.offset = self.offset.saturating_sub(amount);
        self.target = self.offset;
    }

    /// Scroll down by the given number of rows.
    ///
    /// Reaching the bottom resumes follow mode.
    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.max_offset();
        self.offset = (self.offset + amount).min(max);
        self.target = self.offset;
        if self.offset == max {
            self.follow = true;
        }
    }

    /// Scroll up by a page.
    pub fn page_up(&mut self) {
        self.scroll_up(self.page_size());
    }

    /// Scroll down by a page.
    pub fn page_down(&mut self) {
        self.scroll_down(self.page_size());
    }

    fn page_size(&self) -> usize {
        self.viewport_rows.saturating_sub(1).max(1)
    }

    /// Ease to the newest entry and resume follow mode.
    pub fn jump_to_end(&mut self) {
        self.follow = true;
        self.target = self.max_offset();
    }
}
