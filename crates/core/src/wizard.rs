//! The form wizard controller.
//!
//! The wizard owns the step state machine and the in-progress answer set.
//! Steps are an explicit tagged variant — physical-info capture, then each
//! visible question in resolved order, then a terminal submitted state —
//! so transitions are exhaustively checkable. Forward progress is gated on
//! per-step validity; nothing leaves the process until the caller takes the
//! finished draft to a submission backend.
//!
//! Submission failure is not a wizard state: [`Wizard::finish`] leaves the
//! step pointer and answers untouched on error, so a failed network attempt
//! loses nothing and the user can retry or correct.

use crate::answers::{AnswerSet, AnswerValue};
use crate::catalog::Catalog;
use crate::resolver::Resolver;
use crate::submission::{AssessmentDraft, PatientIdentity};
use crate::units::{PhysicalInfo, UnitSystem};

/// Where the user currently is in the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardStep {
    /// The leading height/weight capture step.
    PhysicalInfo,
    /// One of the catalog questions, by id.
    Question(String),
    /// Terminal: the questionnaire has been finished and handed over.
    Submitted,
}

/// Result of a forward navigation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepAdvance {
    /// The step pointer moved; inspect [`Wizard::current_step`].
    Moved,
    /// The last visible question is done — the caller should now invoke
    /// [`Wizard::finish`] and submit the draft.
    ReadyToSubmit,
}

/// Step-gating and state errors. These are caught locally and surfaced
/// inline; they never involve the network.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("physical information is incomplete or out of bounds")]
    IncompletePhysicalInfo,
    #[error("question '{0}' requires an answer")]
    UnansweredQuestion(String),
    #[error("unknown question: {0}")]
    UnknownQuestion(String),
    #[error("the questionnaire has already been submitted")]
    AlreadySubmitted,
}

/// The questionnaire wizard for one patient session.
#[derive(Clone, Debug)]
pub struct Wizard {
    catalog: Catalog,
    patient: PatientIdentity,
    physical_info: PhysicalInfo,
    responses: AnswerSet,
    step: WizardStep,
}

impl Wizard {
    /// Starts a new wizard at the physical-info step, defaulting to
    /// imperial entry.
    pub fn new(catalog: Catalog, patient: PatientIdentity) -> Self {
        Self {
            catalog,
            patient,
            physical_info: PhysicalInfo::new(UnitSystem::Imperial),
            responses: AnswerSet::new(),
            step: WizardStep::PhysicalInfo,
        }
    }

    pub fn current_step(&self) -> &WizardStep {
        &self.step
    }

    pub fn physical_info(&self) -> &PhysicalInfo {
        &self.physical_info
    }

    pub fn responses(&self) -> &AnswerSet {
        &self.responses
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.catalog)
    }

    /// Replaces the physical-info capture wholesale.
    pub fn set_physical_info(&mut self, physical_info: PhysicalInfo) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        self.physical_info = physical_info;
        Ok(())
    }

    /// Switches the measurement system, clearing the other system's fields.
    pub fn switch_unit_system(&mut self, unit_system: UnitSystem) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        self.physical_info.switch_system(unit_system);
        Ok(())
    }

    /// Records an answer, merging into the answer set.
    ///
    /// Other questions' entries are never removed — including answers to
    /// questions this update just hid. They stay dormant in memory (so
    /// un-hiding restores them) and are scrubbed at submission time.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::UnknownQuestion`] for an id not in the
    /// catalog, or [`WizardError::AlreadySubmitted`] after submission.
    pub fn update_response(
        &mut self,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.catalog.find(question_id).is_none() {
            return Err(WizardError::UnknownQuestion(question_id.to_string()));
        }
        self.responses.insert(question_id.to_string(), value);
        Ok(())
    }

    /// Whether the current step passes its gate.
    ///
    /// Physical info must be complete and in bounds; a required question
    /// needs a non-empty answer; optional questions always pass. A question
    /// that an earlier revision has hidden also passes — the user is only
    /// navigating off it, and its stale answer is scrubbed later.
    pub fn can_go_next(&self) -> bool {
        match &self.step {
            WizardStep::PhysicalInfo => self.physical_info.is_complete(),
            WizardStep::Question(id) => {
                let Some(question) = self.catalog.find(id) else {
                    return false;
                };
                if !self.resolver().is_visible(question, &self.responses) {
                    return true;
                }
                if !question.required {
                    return true;
                }
                self.responses
                    .get(id.as_str())
                    .is_some_and(|answer| !answer.is_empty())
            }
            WizardStep::Submitted => false,
        }
    }

    /// Advances to the next visible question, or signals readiness to
    /// submit when none remain.
    ///
    /// From the physical-info step with an empty visible set this yields
    /// `ReadyToSubmit` directly — a catalog whose every question is hidden
    /// is unusual but legal.
    ///
    /// # Errors
    ///
    /// Returns the specific gating failure when
    /// [`can_go_next`](Self::can_go_next) is false, or `AlreadySubmitted`
    /// in the terminal state.
    pub fn go_next(&mut self) -> Result<StepAdvance, WizardError> {
        match self.step.clone() {
            WizardStep::Submitted => Err(WizardError::AlreadySubmitted),
            WizardStep::PhysicalInfo => {
                if !self.can_go_next() {
                    return Err(WizardError::IncompletePhysicalInfo);
                }
                let first = self
                    .resolver()
                    .visible_questions(&self.responses)
                    .first()
                    .map(|q| q.id.to_string());
                match first {
                    Some(first) => {
                        self.step = WizardStep::Question(first);
                        Ok(StepAdvance::Moved)
                    }
                    None => Ok(StepAdvance::ReadyToSubmit),
                }
            }
            WizardStep::Question(id) => {
                if !self.can_go_next() {
                    return Err(WizardError::UnansweredQuestion(id));
                }
                let next = self
                    .resolver()
                    .next_question_id(&id, &self.responses)
                    .map(|next| next.to_string());
                match next {
                    Some(next) => {
                        self.step = WizardStep::Question(next);
                        Ok(StepAdvance::Moved)
                    }
                    None => Ok(StepAdvance::ReadyToSubmit),
                }
            }
        }
    }

    /// Steps back to the previous visible question, or to the
    /// physical-info step from the first question. No gating applies going
    /// backwards. On the physical-info step this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` in the terminal state.
    pub fn go_previous(&mut self) -> Result<(), WizardError> {
        match self.step.clone() {
            WizardStep::Submitted => Err(WizardError::AlreadySubmitted),
            WizardStep::PhysicalInfo => Ok(()),
            WizardStep::Question(id) => {
                let previous = self
                    .resolver()
                    .previous_question_id(&id, &self.responses)
                    .map(|previous| previous.to_string());
                self.step = match previous {
                    Some(previous) => WizardStep::Question(previous),
                    None => WizardStep::PhysicalInfo,
                };
                Ok(())
            }
        }
    }

    /// Progress through the flow, 0–100. The physical-info step is 0; the
    /// terminal state is 100.
    pub fn progress(&self) -> u8 {
        match &self.step {
            WizardStep::PhysicalInfo => self.resolver().progress_percentage(None, &self.responses),
            WizardStep::Question(id) => self
                .resolver()
                .progress_percentage(Some(id), &self.responses),
            WizardStep::Submitted => 100,
        }
    }

    /// Validates everything and produces the draft to hand to a submission
    /// backend, transitioning to the terminal state.
    ///
    /// On error nothing changes: the step pointer and the full answer set
    /// (stale entries included) survive for correction and retry.
    ///
    /// # Errors
    ///
    /// `IncompletePhysicalInfo` or `UnansweredQuestion` for the first
    /// failing gate, `AlreadySubmitted` if called twice.
    pub fn finish(&mut self) -> Result<AssessmentDraft, WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if !self.physical_info.is_complete() {
            return Err(WizardError::IncompletePhysicalInfo);
        }

        let resolver = self.resolver();
        for question in resolver.visible_questions(&self.responses) {
            if !question.required {
                continue;
            }
            let answered = self
                .responses
                .get(question.id)
                .is_some_and(|answer| !answer.is_empty());
            if !answered {
                return Err(WizardError::UnansweredQuestion(question.id.to_string()));
            }
        }

        let draft = AssessmentDraft {
            patient: self.patient.clone(),
            physical_info: self.physical_info.clone(),
            responses: std::mem::take(&mut self.responses),
        };
        let responses = draft.scrubbed_responses(&self.catalog);
        let draft = AssessmentDraft { responses, ..draft };

        self.step = WizardStep::Submitted;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionKind;
    use intake_types::{EmailAddress, NonEmptyText};

    fn test_patient() -> PatientIdentity {
        PatientIdentity {
            name: NonEmptyText::new("Jane Doe").unwrap(),
            email: EmailAddress::parse("jane@example.com").unwrap(),
            phone: Some(NonEmptyText::new("+44 7700 900000").unwrap()),
        }
    }

    fn complete_metric_info() -> PhysicalInfo {
        PhysicalInfo::metric(Some(170.0), Some(85.0))
    }

    fn standard_wizard() -> Wizard {
        Wizard::new(Catalog::standard(), test_patient())
    }

    fn answer_all_visible(wizard: &mut Wizard) {
        // Walk forward answering "no"/"none" to every required question,
        // leaving optional ones untouched, until ready to submit.
        let catalog = Catalog::standard();
        loop {
            if let WizardStep::Question(id) = wizard.current_step() {
                let id = id.clone();
                let question = catalog.find(&id).expect("catalog question");
                if question.required {
                    let value = match question.kind {
                        QuestionKind::MultiSelect => AnswerValue::Multiple(vec!["none".into()]),
                        _ => AnswerValue::from("no"),
                    };
                    wizard.update_response(&id, value).expect("should record");
                }
            }
            match wizard.go_next().expect("should advance") {
                StepAdvance::Moved => continue,
                StepAdvance::ReadyToSubmit => break,
            }
        }
    }

    #[test]
    fn starts_at_physical_info_with_zero_progress() {
        let wizard = standard_wizard();
        assert_eq!(wizard.current_step(), &WizardStep::PhysicalInfo);
        assert_eq!(wizard.progress(), 0);
        assert!(!wizard.can_go_next());
    }

    #[test]
    fn physical_info_gates_forward_progress() {
        let mut wizard = standard_wizard();
        let err = wizard.go_next().expect_err("should be gated");
        assert!(matches!(err, WizardError::IncompletePhysicalInfo));

        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        assert!(wizard.can_go_next());
        assert_eq!(wizard.go_next().expect("should advance"), StepAdvance::Moved);
        assert_eq!(
            wizard.current_step(),
            &WizardStep::Question("weight-loss-surgery".into())
        );
    }

    #[test]
    fn required_question_blocks_until_answered() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        wizard.go_next().expect("should advance");

        assert!(!wizard.can_go_next());
        let err = wizard.go_next().expect_err("should be gated");
        assert!(matches!(err, WizardError::UnansweredQuestion(id) if id == "weight-loss-surgery"));

        wizard
            .update_response("weight-loss-surgery", AnswerValue::from("no"))
            .expect("should record");
        assert!(wizard.can_go_next());
    }

    #[test]
    fn blank_answer_does_not_satisfy_required_gate() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        wizard.go_next().expect("should advance");

        wizard
            .update_response("weight-loss-surgery", AnswerValue::from("   "))
            .expect("should record");
        assert!(!wizard.can_go_next());
    }

    #[test]
    fn optional_question_never_blocks() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        wizard.go_next().expect("should advance");
        answer_all_visible(&mut wizard);
        // answer_all_visible walked through the optional text questions
        // (current-medications, allergies) without recording answers.
        wizard.finish().expect("optional questions must not block");
    }

    #[test]
    fn go_previous_returns_to_physical_info() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        wizard.go_next().expect("should advance");

        wizard.go_previous().expect("should step back");
        assert_eq!(wizard.current_step(), &WizardStep::PhysicalInfo);

        // At the leading step, stepping back again stays put.
        wizard.go_previous().expect("should be a no-op");
        assert_eq!(wizard.current_step(), &WizardStep::PhysicalInfo);
    }

    #[test]
    fn update_response_rejects_unknown_question() {
        let mut wizard = standard_wizard();
        let err = wizard
            .update_response("no-such-question", AnswerValue::from("yes"))
            .expect_err("should reject");
        assert!(matches!(err, WizardError::UnknownQuestion(_)));
    }

    #[test]
    fn update_response_preserves_other_answers() {
        let mut wizard = standard_wizard();
        wizard
            .update_response("previous-glp1", AnswerValue::from("yes"))
            .expect("should record");
        wizard
            .update_response("previous-glp1-details", AnswerValue::from("Wegovy"))
            .expect("should record");

        // Revising the earlier answer hides the details question but keeps
        // its dormant answer in memory.
        wizard
            .update_response("previous-glp1", AnswerValue::from("no"))
            .expect("should record");
        assert_eq!(
            wizard.responses().get("previous-glp1-details"),
            Some(&AnswerValue::from("Wegovy"))
        );
    }

    #[test]
    fn finish_scrubs_answers_hidden_by_revision() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        wizard
            .update_response("previous-glp1", AnswerValue::from("yes"))
            .expect("should record");
        wizard
            .update_response("previous-glp1-details", AnswerValue::from("Wegovy"))
            .expect("should record");
        wizard
            .update_response("previous-glp1", AnswerValue::from("no"))
            .expect("should record");
        wizard.go_next().expect("should advance");
        answer_all_visible(&mut wizard);

        let draft = wizard.finish().expect("should finish");
        assert!(!draft.responses.contains_key("previous-glp1-details"));
        assert_eq!(wizard.current_step(), &WizardStep::Submitted);
        assert_eq!(wizard.progress(), 100);
    }

    #[test]
    fn finish_failure_preserves_state_for_retry() {
        let mut wizard = standard_wizard();
        wizard
            .update_response("previous-glp1", AnswerValue::from("no"))
            .expect("should record");

        // Physical info never entered: finish must fail and change nothing.
        let err = wizard.finish().expect_err("should fail");
        assert!(matches!(err, WizardError::IncompletePhysicalInfo));
        assert_eq!(wizard.current_step(), &WizardStep::PhysicalInfo);
        assert_eq!(
            wizard.responses().get("previous-glp1"),
            Some(&AnswerValue::from("no"))
        );
    }

    #[test]
    fn finish_rejects_unanswered_required_question() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        let err = wizard.finish().expect_err("should fail");
        assert!(matches!(err, WizardError::UnansweredQuestion(_)));
        assert_ne!(wizard.current_step(), &WizardStep::Submitted);
    }

    #[test]
    fn terminal_state_rejects_further_interaction() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        wizard.go_next().expect("should advance");
        answer_all_visible(&mut wizard);
        wizard.finish().expect("should finish");

        assert!(matches!(
            wizard.finish().expect_err("should reject"),
            WizardError::AlreadySubmitted
        ));
        assert!(matches!(
            wizard.go_next().expect_err("should reject"),
            WizardError::AlreadySubmitted
        ));
        assert!(matches!(
            wizard
                .update_response("allergies", AnswerValue::from("none"))
                .expect_err("should reject"),
            WizardError::AlreadySubmitted
        ));
        assert!(!wizard.can_go_next());
    }

    #[test]
    fn empty_visible_set_goes_straight_to_submission() {
        // An empty catalog is the degenerate case of "no visible
        // questions": the wizard must route straight to submission.
        let mut wizard = Wizard::new(Catalog::from_questions(vec![]), test_patient());
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");

        assert_eq!(
            wizard.go_next().expect("should advance"),
            StepAdvance::ReadyToSubmit
        );
        let draft = wizard.finish().expect("should finish");
        assert!(draft.responses.is_empty());
    }

    #[test]
    fn hidden_current_question_does_not_trap_navigation() {
        let mut wizard = standard_wizard();
        wizard
            .set_physical_info(complete_metric_info())
            .expect("should set");
        wizard
            .update_response("previous-glp1", AnswerValue::from("yes"))
            .expect("should record");

        // Walk the wizard forward until it stands on the details question.
        let catalog = Catalog::standard();
        loop {
            let current = match wizard.current_step() {
                WizardStep::Question(id) => Some(id.clone()),
                _ => None,
            };
            if let Some(id) = current {
                if id == "previous-glp1-details" {
                    break;
                }
                // previous-glp1 must stay "yes" so the details step appears.
                if id != "previous-glp1" {
                    let question = catalog.find(&id).expect("catalog question");
                    let value = match question.kind {
                        QuestionKind::MultiSelect => AnswerValue::Multiple(vec!["none".into()]),
                        _ => AnswerValue::from("no"),
                    };
                    wizard.update_response(&id, value).expect("should record");
                }
            }
            wizard.go_next().expect("should advance");
        }

        // Revise the dependency: the step under our feet is now hidden,
        // but navigation still works in both directions.
        wizard
            .update_response("previous-glp1", AnswerValue::from("no"))
            .expect("should record");
        assert!(wizard.can_go_next());
        wizard.go_next().expect("should advance");
        assert_eq!(
            wizard.current_step(),
            &WizardStep::Question("current-medications".into())
        );
    }
}
