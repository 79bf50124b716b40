//! The question catalog.
//!
//! The catalog is fixed configuration: an ordered list of question
//! definitions built once at process start and never mutated afterwards.
//! Conditional visibility is expressed as data — a small declarative rule
//! per question, interpreted generically by the resolver — so the catalog
//! can grow without touching navigation logic.

/// How a visibility rule compares the answer it depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOperator {
    /// The dependency's answer equals the rule value (single-valued answers).
    Equals,
    /// The dependency's answer contains the rule value (multi-select answers).
    Includes,
}

/// A declarative visibility predicate referencing an earlier question.
///
/// A rule whose dependency is unanswered evaluates false: the dependent
/// question stays hidden until its dependency has an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityRule {
    /// Id of the earlier question whose answer drives this rule.
    pub depends_on: &'static str,
    pub operator: RuleOperator,
    /// The option value the dependency's answer is compared against.
    pub value: &'static str,
}

/// The interaction style of a question, which also fixes the shape of its
/// answer value (single string vs. list of option values).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    YesNo,
    SingleSelect,
    MultiSelect,
    Text,
}

/// One selectable option of a select-style question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// A single question definition.
#[derive(Clone, Copy, Debug)]
pub struct Question {
    pub id: &'static str,
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub kind: QuestionKind,
    /// Options for the select kinds; empty for yes/no and text questions.
    pub options: &'static [QuestionOption],
    pub required: bool,
    /// When present, the question is only shown while the rule holds.
    pub visible_when: Option<VisibilityRule>,
}

/// The fixed, ordered question catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    questions: Vec<Question>,
}

const YES_NO_OPTIONS: &[QuestionOption] = &[
    QuestionOption {
        value: "yes",
        label: "Yes",
    },
    QuestionOption {
        value: "no",
        label: "No",
    },
];

const MEDICAL_CONDITION_OPTIONS: &[QuestionOption] = &[
    QuestionOption {
        value: "diabetes-type-1",
        label: "Type 1 diabetes",
    },
    QuestionOption {
        value: "diabetes-type-2",
        label: "Type 2 diabetes",
    },
    QuestionOption {
        value: "thyroid-condition",
        label: "Thyroid condition",
    },
    QuestionOption {
        value: "pancreatitis",
        label: "Pancreatitis (current or previous)",
    },
    QuestionOption {
        value: "gallbladder-disease",
        label: "Gallbladder disease",
    },
    QuestionOption {
        value: "kidney-disease",
        label: "Kidney disease",
    },
    QuestionOption {
        value: "none",
        label: "None of these",
    },
];

const DIABETES_TREATMENT_OPTIONS: &[QuestionOption] = &[
    QuestionOption {
        value: "insulin",
        label: "Insulin",
    },
    QuestionOption {
        value: "tablets",
        label: "Tablets (e.g. metformin)",
    },
    QuestionOption {
        value: "diet-only",
        label: "Diet and lifestyle only",
    },
    QuestionOption {
        value: "untreated",
        label: "Not currently treated",
    },
];

impl Catalog {
    /// Builds the standard weight-loss intake questionnaire.
    ///
    /// Question order is the presentation order. Conditional questions
    /// reference earlier questions only.
    pub fn standard() -> Self {
        let questions = vec![
            Question {
                id: "weight-loss-surgery",
                title: "Have you ever had weight-loss surgery?",
                description: Some(
                    "For example a gastric band, gastric bypass or sleeve gastrectomy.",
                ),
                kind: QuestionKind::YesNo,
                options: YES_NO_OPTIONS,
                required: true,
                visible_when: None,
            },
            Question {
                id: "medical-conditions",
                title: "Do you have, or have you had, any of these conditions?",
                description: Some("Select all that apply."),
                kind: QuestionKind::MultiSelect,
                options: MEDICAL_CONDITION_OPTIONS,
                required: true,
                visible_when: None,
            },
            Question {
                id: "diabetes-treatment",
                title: "How is your type 2 diabetes currently managed?",
                description: None,
                kind: QuestionKind::SingleSelect,
                options: DIABETES_TREATMENT_OPTIONS,
                required: true,
                visible_when: Some(VisibilityRule {
                    depends_on: "medical-conditions",
                    operator: RuleOperator::Includes,
                    value: "diabetes-type-2",
                }),
            },
            Question {
                id: "family-history-mtc",
                title:
                    "Has anyone in your family had medullary thyroid cancer or MEN2 syndrome?",
                description: None,
                kind: QuestionKind::YesNo,
                options: YES_NO_OPTIONS,
                required: true,
                visible_when: None,
            },
            Question {
                id: "pregnant-or-breastfeeding",
                title: "Are you pregnant, breastfeeding, or planning a pregnancy?",
                description: None,
                kind: QuestionKind::YesNo,
                options: YES_NO_OPTIONS,
                required: true,
                visible_when: None,
            },
            Question {
                id: "eating-disorder-history",
                title: "Have you ever been diagnosed with an eating disorder?",
                description: None,
                kind: QuestionKind::YesNo,
                options: YES_NO_OPTIONS,
                required: true,
                visible_when: None,
            },
            Question {
                id: "previous-glp1",
                title: "Have you taken a GLP-1 weight-loss medication before?",
                description: Some("For example Wegovy, Saxenda or Mounjaro."),
                kind: QuestionKind::YesNo,
                options: YES_NO_OPTIONS,
                required: true,
                visible_when: None,
            },
            Question {
                id: "previous-glp1-details",
                title: "Which medication did you take, and when did you stop?",
                description: None,
                kind: QuestionKind::Text,
                options: &[],
                required: true,
                visible_when: Some(VisibilityRule {
                    depends_on: "previous-glp1",
                    operator: RuleOperator::Equals,
                    value: "yes",
                }),
            },
            Question {
                id: "current-medications",
                title: "Are you taking any other medication?",
                description: Some("Include prescribed, over-the-counter and herbal remedies."),
                kind: QuestionKind::Text,
                options: &[],
                required: false,
                visible_when: None,
            },
            Question {
                id: "allergies",
                title: "Do you have any allergies?",
                description: None,
                kind: QuestionKind::Text,
                options: &[],
                required: false,
                visible_when: None,
            },
        ];

        let catalog = Self { questions };
        catalog.assert_rules_reference_earlier_questions();
        catalog
    }

    /// Build a catalog from an explicit question list. Intended for tests;
    /// production code uses [`Catalog::standard`].
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let catalog = Self { questions };
        catalog.assert_rules_reference_earlier_questions();
        catalog
    }

    /// The full ordered question list.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Looks up a question by id.
    pub fn find(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Returns the catalog position of a question id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    // Dangling or forward-referencing rules are an authoring mistake, not a
    // runtime condition.
    fn assert_rules_reference_earlier_questions(&self) {
        for (index, question) in self.questions.iter().enumerate() {
            if let Some(rule) = &question.visible_when {
                let target = self.position(rule.depends_on);
                debug_assert!(
                    matches!(target, Some(t) if t < index),
                    "question '{}' depends on '{}', which is not an earlier question",
                    question.id,
                    rule.depends_on
                );
            }
        }
    }
}
