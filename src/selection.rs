//! Pure helpers shared by the route handlers: page math, the "current
//! category" label of a result set, search matching and quiz question picking.

use std::collections::HashSet;

use itertools::Itertools;

use crate::db::{Category, Question};

pub const QUESTIONS_PER_PAGE: i64 = 10;

/// Label reported when a result set spans more than one category.
pub const ALL_CATEGORIES: &str = "All";

/// 1-indexed page of an id-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    pub fn new(number: i64) -> Self {
        Page(number)
    }

    pub fn number(self) -> i64 {
        self.0
    }

    /// Pages below 1 select nothing.
    pub fn limit(self) -> i64 {
        if self.0 < 1 {
            0
        } else {
            QUESTIONS_PER_PAGE
        }
    }

    pub fn offset(self) -> i64 {
        (self.0.max(1) - 1).saturating_mul(QUESTIONS_PER_PAGE)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

/// Summarizes the categories of a result set: the shared category's label
/// when every entry agrees, "All" otherwise (or when there is nothing to
/// summarize).
pub fn current_category(category_ids: &[i64], categories: &[Category]) -> String {
    let Some(&sample) = category_ids.first() else {
        return ALL_CATEGORIES.to_owned();
    };
    if !category_ids.iter().all_equal() {
        return ALL_CATEGORIES.to_owned();
    }
    categories
        .iter()
        .find(|category| category.id == sample)
        .map(|category| category.kind.clone())
        .unwrap_or_else(|| ALL_CATEGORIES.to_owned())
}

/// Case-insensitive substring match on the question text, keeping id order.
pub fn search_questions(questions: Vec<Question>, term: &str) -> Vec<Question> {
    let term = term.to_lowercase();
    questions
        .into_iter()
        .filter(|question| question.question.to_lowercase().contains(&term))
        .collect()
}

/// First candidate (in the given order) that was not served yet.
/// `None` means the round is over.
pub fn next_question(candidates: Vec<Question>, previous: &[i64]) -> Option<Question> {
    let served: HashSet<i64> = previous.iter().copied().collect();
    candidates
        .into_iter()
        .find(|question| !served.contains(&question.id))
}
