//! Arithmetic stand-in problem generator.
//!
//! The simulator only needs problems with a checkable answer, so this drills
//! plain arithmetic with operands that grow with grade.

use crate::combat::enemy::clamp_grade;
use crate::problem::{Problem, ProblemGenerator, UnitDescriptor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct ArithmeticDrill {
    rng: ChaCha8Rng,
}

impl ArithmeticDrill {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn operand_max(grade: u32) -> i64 {
        10 * clamp_grade(grade) as i64
    }
}

impl ProblemGenerator for ArithmeticDrill {
    fn generate(&mut self, grade: u32, _unit: &UnitDescriptor) -> Option<Problem> {
        let max = Self::operand_max(grade);
        let a = self.rng.gen_range(1..=max);
        let b = self.rng.gen_range(1..=max);

        // Multiplication joins the mix from grade 3
        let ops = if clamp_grade(grade) >= 3 { 3 } else { 2 };
        let problem = match self.rng.gen_range(0..ops) {
            0 => Problem::new(format!("{} + {}", a, b), (a + b).to_string(), "addition"),
            1 => {
                let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
                Problem::new(format!("{} - {}", hi, lo), (hi - lo).to_string(), "subtraction")
            }
            _ => {
                let small = b % 12 + 1;
                Problem::new(
                    format!("{} × {}", a, small),
                    (a * small).to_string(),
                    "multiplication",
                )
            }
        };
        Some(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{AnswerValidator, StandardAnswerValidator};

    #[test]
    fn test_drill_answers_validate() {
        let mut drill = ArithmeticDrill::new(7);
        let validator = StandardAnswerValidator::default();
        let unit = UnitDescriptor::new("Drill");
        for grade in 1..=12 {
            let problem = drill.generate(grade, &unit).unwrap();
            assert!(validator.validate(&problem, &problem.answer), "{:?}", problem);
            assert!(!validator.validate(&problem, "?"));
        }
    }

    #[test]
    fn test_subtraction_never_negative() {
        let mut drill = ArithmeticDrill::new(11);
        let unit = UnitDescriptor::new("Drill");
        for _ in 0..200 {
            let problem = drill.generate(1, &unit).unwrap();
            assert!(!problem.answer.starts_with('-'));
        }
    }

    #[test]
    fn test_early_grades_skip_multiplication() {
        let mut drill = ArithmeticDrill::new(3);
        let unit = UnitDescriptor::new("Drill");
        for _ in 0..100 {
            assert_ne!(drill.generate(2, &unit).unwrap().topic, "multiplication");
        }
    }
}
