use std::fmt;

/// Percentage bucket with a fixed feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreTier {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreTier {
    /// Bucket a percentage; lower bounds are inclusive.
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsImprovement => "needs-improvement",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Ausgezeichnet! Du beherrschst den Quizinhalt souverän! 🏆",
            Self::Good => "Sehr gut! Du verfügst über ein solides Verständnis der Inhalte! 🎉",
            Self::Fair => "Nicht schlecht! Mit etwas mehr Übung festigst du dein Wissen! 📚",
            Self::NeedsImprovement => {
                "Das war ein guter Anfang! Wiederhole die Inhalte und versuche es erneut! 💪"
            }
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Final score report of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResults {
    score: u32,
    total: u32,
    percentage: u32,
    tier: ScoreTier,
}

impl QuizResults {
    /// Compute percentage and tier. `score` is capped at `total`.
    ///
    /// The percentage is rounded half up; an empty session counts as 0%.
    #[must_use]
    pub fn compute(score: u32, total: u32) -> Self {
        let score = score.min(total);
        let percentage = if total == 0 {
            0
        } else {
            let scaled = u64::from(score) * 200 + u64::from(total);
            u32::try_from(scaled / (u64::from(total) * 2)).unwrap_or(100)
        };
        Self {
            score,
            total,
            percentage,
            tier: ScoreTier::from_percentage(percentage),
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn tier(&self) -> ScoreTier {
        self.tier
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.tier.message()
    }
}
