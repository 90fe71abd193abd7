/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub score: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of questions already left behind (`current_index / total`), 1.0 once complete.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.is_complete {
            return 1.0;
        }
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.position.saturating_sub(1) as f64 / self.total as f64;
        ratio
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}
