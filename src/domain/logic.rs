// src/domain/logic.rs

pub type Rule<T> = fn(&T) -> bool;

/// An ordered rule chain: the first rule whose predicate holds decides the
/// outcome. Precedence lives entirely in the order of `rules`.
pub struct RuleChain<T, O> {
    rules: Vec<(Rule<T>, O)>,
    fallback: O,
}

impl<T, O: Clone> RuleChain<T, O> {
    pub fn new(rules: Vec<(Rule<T>, O)>, fallback: O) -> Self {
        Self { rules, fallback }
    }

    pub fn evaluate(&self, input: &T) -> O {
        self.rules
            .iter()
            .find(|(applies, _)| applies(input))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
