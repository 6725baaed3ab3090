//! Condition evaluation against decoded records
//!
//! Coercion rules:
//! - `eq`/`neq`: numeric comparison when both sides coerce to numbers,
//!   otherwise comparison of text forms
//! - `gt`/`gte`/`lt`/`lte`: both sides must coerce to numbers, else no match
//! - `contains`: substring test on text forms
//! - a field that is not in the record never matches

use serde_json::Value;

use crate::codec::{as_number, display_text, Record};

use super::condition::{Condition, Operator};

/// Evaluates conditions against records
pub struct ConditionMatcher;

impl ConditionMatcher {
    /// True if the record satisfies every condition.
    ///
    /// An empty list matches every record.
    pub fn matches(record: &Record, conditions: &[Condition]) -> bool {
        conditions
            .iter()
            .all(|cond| Self::matches_condition(record, cond))
    }

    /// True if the record satisfies one condition
    pub fn matches_condition(record: &Record, condition: &Condition) -> bool {
        let actual = match record.get(&condition.field) {
            Some(v) => v,
            None => return false,
        };
        let expected = &condition.value;

        match condition.op {
            Operator::Eq => values_equal(actual, expected),
            Operator::Neq => !values_equal(actual, expected),
            Operator::Gt => compare(actual, expected, |a, b| a > b),
            Operator::Gte => compare(actual, expected, |a, b| a >= b),
            Operator::Lt => compare(actual, expected, |a, b| a < b),
            Operator::Lte => compare(actual, expected, |a, b| a <= b),
            Operator::Contains => display_text(actual).contains(&display_text(expected)),
        }
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => display_text(actual) == display_text(expected),
    }
}

fn compare(actual: &Value, expected: &Value, cmp: fn(f64, f64) -> bool) -> bool {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alan() -> Record {
        Record::new()
            .with("Username", "Alan")
            .with("Email", "alan@example.com")
            .with("Age", 41)
            .with("Zip", "007")
            .with("Active", true)
            .with("Notes", "")
    }

    #[test]
    fn test_empty_conditions_match_everything() {
        assert!(ConditionMatcher::matches(&alan(), &[]));
        assert!(ConditionMatcher::matches(&Record::new(), &[]));
    }

    #[test]
    fn test_equality_with_numeric_coercion() {
        let record = alan();
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Age", "41")]));
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Age", 41.0)]));
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Zip", 7)]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::eq("Age", 42)]));
    }

    #[test]
    fn test_equality_on_text() {
        let record = alan();
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Username", "Alan")]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::eq("Username", "alan")]));
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Active", "TRUE")]));
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Notes", "")]));
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Notes", Value::Null)]));
    }

    #[test]
    fn test_not_equal() {
        let record = alan();
        assert!(ConditionMatcher::matches(&record, &[Condition::neq("Username", "Grace")]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::neq("Age", "41")]));
    }

    #[test]
    fn test_ordering_requires_numbers() {
        let record = alan();
        assert!(ConditionMatcher::matches(&record, &[Condition::gt("Age", 40)]));
        assert!(ConditionMatcher::matches(&record, &[Condition::gte("Age", "41")]));
        assert!(ConditionMatcher::matches(&record, &[Condition::lt("Age", 41.5)]));
        assert!(ConditionMatcher::matches(&record, &[Condition::lte("Age", 41)]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::gt("Age", 41)]));

        assert!(!ConditionMatcher::matches(&record, &[Condition::gt("Username", "A")]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::lt("Age", "old")]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::lt("Notes", 1)]));
    }

    #[test]
    fn test_contains() {
        let record = alan();
        assert!(ConditionMatcher::matches(&record, &[Condition::contains("Email", "@example")]));
        assert!(ConditionMatcher::matches(&record, &[Condition::contains("Age", 4)]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::contains("Email", "@corp")]));
    }

    #[test]
    fn test_unknown_field_never_matches() {
        let record = alan();
        assert!(!ConditionMatcher::matches(&record, &[Condition::eq("Password", "x")]));
        assert!(!ConditionMatcher::matches(&record, &[Condition::neq("Password", "x")]));
    }

    #[test]
    fn test_conditions_combine_with_and() {
        let record = alan();
        let both = [Condition::eq("Username", "Alan"), Condition::gte("Age", 18)];
        assert!(ConditionMatcher::matches(&record, &both));

        let one_fails = [Condition::eq("Username", "Alan"), Condition::gte("Age", 65)];
        assert!(!ConditionMatcher::matches(&record, &one_fails));
    }

    #[test]
    fn test_condition_value_types() {
        let record = Record::new().with("Score", json!(2.5));
        assert!(ConditionMatcher::matches(&record, &[Condition::eq("Score", "2.50")]));
    }
}
