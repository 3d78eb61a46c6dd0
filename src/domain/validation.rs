//! Declarative rule chains
//!
//! A [`Validator`] evaluates every rule it is given and keeps going after a
//! failure, so callers receive the complete list of problems at once.

use regex::Regex;

use super::notification::{Notification, NotificationContext};

/// Kind of rule that produced a notification. Its code becomes the
/// notification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    NotEmpty,
    MinimumLength,
    MaximumLength,
    Matches,
    Predicate,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Rule {
    pub fn code(self) -> &'static str {
        match self {
            Rule::NotEmpty => "NotEmptyValidator",
            Rule::MinimumLength => "MinimumLengthValidator",
            Rule::MaximumLength => "MaximumLengthValidator",
            Rule::Matches => "RegularExpressionValidator",
            Rule::Predicate => "PredicateValidator",
            Rule::GreaterThan => "GreaterThanValidator",
            Rule::GreaterThanOrEqual => "GreaterThanOrEqualValidator",
        }
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    context: NotificationContext,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a chain of string rules for `value`.
    pub fn text<'v>(&'v mut self, value: &'v str) -> TextRules<'v> {
        TextRules {
            value,
            validator: self,
        }
    }

    pub fn check(&mut self, passed: bool, rule: Rule, message: &str) -> &mut Self {
        if !passed {
            self.context.add(rule.code(), message);
        }
        self
    }

    pub fn must(&mut self, passed: bool, message: &str) -> &mut Self {
        self.check(passed, Rule::Predicate, message)
    }

    pub fn is_valid(&self) -> bool {
        !self.context.has_notifications()
    }

    pub fn into_context(self) -> NotificationContext {
        self.context
    }

    pub fn finish(self) -> Result<(), Vec<Notification>> {
        if self.context.has_notifications() {
            Err(self.context.into_notifications())
        } else {
            Ok(())
        }
    }
}

pub struct TextRules<'v> {
    value: &'v str,
    validator: &'v mut Validator,
}

impl<'v> TextRules<'v> {
    fn length(&self) -> usize {
        self.value.chars().count()
    }

    pub fn not_empty(self, message: &str) -> Self {
        let passed = !self.value.trim().is_empty();
        self.validator.check(passed, Rule::NotEmpty, message);
        self
    }

    pub fn min_len(self, min: usize, message: &str) -> Self {
        let passed = self.length() >= min;
        self.validator.check(passed, Rule::MinimumLength, message);
        self
    }

    pub fn max_len(self, max: usize, message: &str) -> Self {
        let passed = self.length() <= max;
        self.validator.check(passed, Rule::MaximumLength, message);
        self
    }

    pub fn matches(self, pattern: &Regex, message: &str) -> Self {
        let passed = pattern.is_match(self.value);
        self.validator.check(passed, Rule::Matches, message);
        self
    }

    /// One notification when any of `patterns` does not match.
    pub fn matches_all(self, patterns: &[Regex], message: &str) -> Self {
        let passed = patterns.iter().all(|p| p.is_match(self.value));
        self.validator.check(passed, Rule::Matches, message);
        self
    }

    pub fn must(self, predicate: impl Fn(&str) -> bool, message: &str) -> Self {
        let passed = predicate(self.value);
        self.validator.check(passed, Rule::Predicate, message);
        self
    }
}
