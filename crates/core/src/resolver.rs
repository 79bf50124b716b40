//! Visibility and navigation resolution.
//!
//! The resolver computes the operative question sequence for a given answer
//! set: which questions are visible, what comes next or previous from any
//! point, and how far through the questionnaire the user is. It is a pure
//! interpreter over the catalog's declarative visibility rules — same
//! answers in, same sequence out, every time.

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, Question, RuleOperator, VisibilityRule};

/// Pure navigation functions over a catalog and an answer set.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Evaluates one visibility rule against the current answers.
    ///
    /// A rule whose dependency is unanswered is unsatisfied, so dependent
    /// questions stay hidden until the dependency is answered.
    fn rule_satisfied(rule: &VisibilityRule, answers: &AnswerSet) -> bool {
        match answers.get(rule.depends_on) {
            None => false,
            Some(answer) => match rule.operator {
                RuleOperator::Equals => answer.equals(rule.value),
                RuleOperator::Includes => answer.includes(rule.value),
            },
        }
    }

    /// Returns true if `question` should currently be shown.
    pub fn is_visible(&self, question: &Question, answers: &AnswerSet) -> bool {
        match &question.visible_when {
            None => true,
            Some(rule) => Self::rule_satisfied(rule, answers),
        }
    }

    /// The ordered subset of catalog questions visible under `answers`.
    pub fn visible_questions(&self, answers: &AnswerSet) -> Vec<&'a Question> {
        self.catalog
            .questions()
            .iter()
            .filter(|q| self.is_visible(q, answers))
            .collect()
    }

    /// The id of the next visible question after `current_id`, or `None`
    /// when the questionnaire is ready to submit.
    ///
    /// If `current_id` itself is no longer visible (an earlier answer was
    /// revised), this still resolves deterministically: the first visible
    /// question after `current_id`'s catalog position is returned, so
    /// navigation never dead-ends on a hidden question.
    pub fn next_question_id(&self, current_id: &str, answers: &AnswerSet) -> Option<&'a str> {
        let position = self.catalog.position(current_id)?;
        self.catalog
            .questions()
            .iter()
            .skip(position + 1)
            .find(|q| self.is_visible(q, answers))
            .map(|q| q.id)
    }

    /// The id of the previous visible question before `current_id`, or
    /// `None` when the physical-info step is the previous stop.
    ///
    /// Applies the same nearest-visible-neighbour fallback as
    /// [`next_question_id`](Self::next_question_id).
    pub fn previous_question_id(&self, current_id: &str, answers: &AnswerSet) -> Option<&'a str> {
        let position = self.catalog.position(current_id)?;
        self.catalog.questions()[..position]
            .iter()
            .rev()
            .find(|q| self.is_visible(q, answers))
            .map(|q| q.id)
    }

    /// Progress through the questionnaire as an integer percentage, 0–100.
    ///
    /// The step count is `1 + visible questions` — the leading step is the
    /// physical-info capture, passed as `current_id = None`. A question's
    /// step index is one more than the number of visible questions before
    /// its catalog position, which also covers the hidden-current fallback.
    ///
    /// Revising an earlier answer can hide or reveal later questions and so
    /// legitimately changes the total step count: the percentage is not
    /// monotonic under revision.
    pub fn progress_percentage(&self, current_id: Option<&str>, answers: &AnswerSet) -> u8 {
        let visible = self.visible_questions(answers);
        let total = 1 + visible.len();

        let index = match current_id {
            None => 0,
            Some(id) => match self.catalog.position(id) {
                None => 0,
                Some(position) => {
                    let before = self.catalog.questions()[..position]
                        .iter()
                        .filter(|q| self.is_visible(q, answers))
                        .count();
                    before + 1
                }
            },
        };

        let index = index.min(total);
        ((index as f64 / total as f64) * 100.0).round() as u8
    }
}
