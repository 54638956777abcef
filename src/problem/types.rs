use serde::{Deserialize, Serialize};

/// A math problem as the battle sees it. Content is opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub text: String,
    pub answer: String,
    pub topic: String,
    pub is_multiple_choice: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Problem {
    pub fn new(text: impl Into<String>, answer: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
            topic: topic.into(),
            is_multiple_choice: false,
            options: None,
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.is_multiple_choice = true;
        self.options = Some(options);
        self
    }
}

/// The unit/topic a battle draws problems from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub name: String,
    /// Explicit enemy tier for this unit. Falls back to ceil(grade / 2).
    #[serde(default)]
    pub difficulty: Option<u32>,
}

impl UnitDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            difficulty: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }
}

/// Supplies problems. Called at battle start and after every enemy turn.
pub trait ProblemGenerator {
    /// `None` means no problem could be produced for this grade and unit.
    fn generate(&mut self, grade: u32, unit: &UnitDescriptor) -> Option<Problem>;
}

impl<F> ProblemGenerator for F
where
    F: FnMut(u32, &UnitDescriptor) -> Option<Problem>,
{
    fn generate(&mut self, grade: u32, unit: &UnitDescriptor) -> Option<Problem> {
        self(grade, unit)
    }
}

/// Decides whether a submitted answer is correct for a problem.
pub trait AnswerValidator {
    fn validate(&self, problem: &Problem, submitted: &str) -> bool;
}
