use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;

use quiz_core::model::{Question, QuizDocument};

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Arc<Question>>,
    pub pool_size: usize,
}

impl SessionPlan {
    /// Number of questions selected for the session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Picks and orders the questions of one session.
pub struct SelectionBuilder<'a> {
    document: &'a QuizDocument,
    requested: usize,
}

impl<'a> SelectionBuilder<'a> {
    #[must_use]
    pub fn new(document: &'a QuizDocument, requested: usize) -> Self {
        Self {
            document,
            requested,
        }
    }

    /// Build the plan.
    ///
    /// - the whole pool is copied, never mutated in place
    /// - `shuffleQuestions` permutes the copy (Fisher–Yates) before selection
    /// - the first `min(requested, pool)` questions are taken
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> SessionPlan {
        let mut pool: Vec<Arc<Question>> = self
            .document
            .questions
            .iter()
            .cloned()
            .map(Arc::new)
            .collect();
        let pool_size = pool.len();

        if self.document.settings.shuffle_questions {
            pool.as_mut_slice().shuffle(rng);
        }

        pool.truncate(self.requested.min(pool_size));

        SessionPlan {
            questions: pool,
            pool_size,
        }
    }
}

/// Display order for the options of `question`: entry `i` is the original index
/// of the option shown at position `i`.
pub(crate) fn option_order<R: Rng + ?Sized>(question: &Question, shuffle: bool, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..question.options.len()).collect();
    if shuffle {
        order.as_mut_slice().shuffle(rng);
    }
    order
}
