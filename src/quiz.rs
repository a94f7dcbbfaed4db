//! Quiz round selection.
//!
//! The game keeps no state on the server: the client replays the ids it has
//! already seen on every round and gets back one random question it hasn't.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::Question;

/// Category type the client sends when the player picked "ALL".
pub const ANY_CATEGORY_TYPE: &str = "click";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Any,
    Id(i64),
}

impl CategoryFilter {
    /// `None` when a concrete category type arrives without an id.
    pub fn for_round(category_type: &str, category_id: Option<i64>) -> Option<Self> {
        if category_type == ANY_CATEGORY_TYPE {
            Some(Self::Any)
        } else {
            category_id.map(Self::Id)
        }
    }

    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Id(_) => "category",
        }
    }
}

/// Picks one question from `pool` whose id is not in `previous`, each with equal probability.
pub fn select_question<R>(pool: Vec<Question>, previous: &[i64], rng: &mut R) -> Option<Question>
where
    R: Rng + ?Sized,
{
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let mut candidates: Vec<Question> = pool
        .into_iter()
        .filter(|question| !seen.contains(&question.id))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

/// Random source shared by all request handlers.
#[derive(Clone)]
pub struct QuizRng(Arc<Mutex<StdRng>>);

impl QuizRng {
    pub fn from_entropy() -> Self {
        Self(Arc::new(Mutex::new(StdRng::from_entropy())))
    }

    pub fn seeded(seed: u64) -> Self {
        Self(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // a panic mid-draw leaves the generator usable
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}
