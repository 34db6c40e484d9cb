use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::Variable;

/// Admissible closed range for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QaRule {
    pub low_limit: f64,
    pub high_limit: f64,
}

impl QaRule {
    pub fn new(low_limit: f64, high_limit: f64) -> Result<Self> {
        if !low_limit.is_finite() || !high_limit.is_finite() {
            return Err(ProcessingError::Config(format!(
                "QA limits must be finite, got [{}, {}]",
                low_limit, high_limit
            )));
        }
        if low_limit > high_limit {
            return Err(ProcessingError::Config(format!(
                "QA low_limit {} is above high_limit {}",
                low_limit, high_limit
            )));
        }

        Ok(Self {
            low_limit,
            high_limit,
        })
    }

    /// Boundary values are admissible.
    pub fn admits(&self, value: f64) -> bool {
        value >= self.low_limit && value <= self.high_limit
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QaRules {
    rules: BTreeMap<Variable, QaRule>,
}

impl QaRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, variable: Variable, rule: QaRule) -> Self {
        self.insert(variable, rule);
        self
    }

    pub fn insert(&mut self, variable: Variable, rule: QaRule) {
        self.rules.insert(variable, rule);
    }

    pub fn get(&self, variable: Variable) -> Option<&QaRule> {
        self.rules.get(&variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &QaRule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
