//! Free-form unit names to problem generators.
//!
//! Lookup order for a unit name:
//! 1. exact match on the normalized key
//! 2. keyword match: a registered key contained in the unit name, or the
//!    unit name contained in a key (longest key wins)
//! 3. grade-tier default: ceil(grade / 2) capped at 5, falling back to the
//!    nearest lower registered tier

use super::types::{Problem, ProblemGenerator, UnitDescriptor};
use crate::combat::enemy::clamp_grade;
use crate::core::constants::MAX_TIER;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct GeneratorRegistry {
    by_key: BTreeMap<String, Box<dyn ProblemGenerator>>,
    by_tier: BTreeMap<u32, Box<dyn ProblemGenerator>>,
}

/// Which rule a lookup resolved through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryMatch {
    Exact(String),
    Keyword(String),
    TierDefault(u32),
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a generator for a unit key. Keys are normalized.
    pub fn register(&mut self, key: &str, generator: impl ProblemGenerator + 'static) {
        self.by_key.insert(normalize_key(key), Box::new(generator));
    }

    /// Registers the fallback generator for a grade tier.
    pub fn register_tier_default(&mut self, tier: u32, generator: impl ProblemGenerator + 'static) {
        self.by_tier.insert(tier, Box::new(generator));
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty() && self.by_tier.is_empty()
    }

    /// Resolves a unit name without generating anything.
    pub fn resolve(&self, grade: u32, unit_name: &str) -> Option<RegistryMatch> {
        let key = normalize_key(unit_name);

        if !key.is_empty() {
            if self.by_key.contains_key(&key) {
                return Some(RegistryMatch::Exact(key));
            }

            let keyword = self
                .by_key
                .keys()
                .filter(|k| key.contains(k.as_str()) || k.contains(key.as_str()))
                .max_by_key(|k| k.len());
            if let Some(k) = keyword {
                return Some(RegistryMatch::Keyword(k.clone()));
            }
        }

        let tier = clamp_grade(grade).div_ceil(2).min(MAX_TIER);
        self.by_tier
            .range(..=tier)
            .next_back()
            .map(|(t, _)| RegistryMatch::TierDefault(*t))
    }
}

impl ProblemGenerator for GeneratorRegistry {
    fn generate(&mut self, grade: u32, unit: &UnitDescriptor) -> Option<Problem> {
        let generator = match self.resolve(grade, &unit.name)? {
            RegistryMatch::Exact(key) | RegistryMatch::Keyword(key) => self.by_key.get_mut(&key)?,
            RegistryMatch::TierDefault(tier) => self.by_tier.get_mut(&tier)?,
        };
        generator.generate(grade, unit)
    }
}

/// Lowercase, trimmed, inner whitespace collapsed to single spaces.
pub fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
