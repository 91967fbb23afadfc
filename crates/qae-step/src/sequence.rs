//! Sequence invariants
//!
//! A step sequence is valid when `steps[i].order == i` for every `i` and
//! all ids are pairwise distinct. Every mutating operation in the engine
//! ends with [`renumber`].

use crate::action::Action;
use crate::error::{StepError, StepResult};
use crate::step::Step;
use std::collections::HashSet;

/// Id assigned to the step at `index`
#[inline]
#[must_use]
pub fn step_id(index: usize) -> String {
    format!("step-{}", index + 1)
}

/// Reassign `order` and `id` from position
pub fn renumber(steps: &mut [Step]) {
    for (index, step) in steps.iter_mut().enumerate() {
        step.order = index;
        step.id = step_id(index);
    }
}

/// Check the order/uniqueness invariant
///
/// # Errors
/// - [`StepError::NonContiguousOrder`] at the first position whose `order`
///   differs from its index
/// - [`StepError::DuplicateId`] for the first repeated id
pub fn validate_sequence(steps: &[Step]) -> StepResult<()> {
    let mut seen = HashSet::with_capacity(steps.len());
    for (position, step) in steps.iter().enumerate() {
        if step.order != position {
            return Err(StepError::NonContiguousOrder {
                position,
                expected: position,
                actual: step.order,
            });
        }
        if !seen.insert(step.id.as_str()) {
            return Err(StepError::DuplicateId(step.id.clone()));
        }
    }
    Ok(())
}

/// Move the step at `from` to `to`, then renumber
///
/// # Errors
/// [`StepError::IndexOutOfRange`] if either index is outside the sequence.
pub fn reorder(steps: &mut Vec<Step>, from: usize, to: usize) -> StepResult<()> {
    let len = steps.len();
    if from >= len {
        return Err(StepError::out_of_range(from, len));
    }
    if to >= len {
        return Err(StepError::out_of_range(to, len));
    }
    let step = steps.remove(from);
    steps.insert(to, step);
    renumber(steps);
    Ok(())
}

/// Estimated run time of a sequence, in milliseconds
///
/// Wait steps contribute their own value when it parses as an integer.
/// The total saturates at `u64::MAX`.
#[must_use]
pub fn estimate_duration_ms(steps: &[Step]) -> u64 {
    steps
        .iter()
        .map(|step| match step.action {
            Action::Wait => step
                .value
                .as_deref()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or_else(|| Action::Wait.estimated_duration_ms()),
            other => other.estimated_duration_ms(),
        })
        .fold(0u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Vec<Step> {
        let mut steps = vec![
            Step::navigate("/"),
            Step::new(Action::Click).with_selector("#go"),
            Step::wait_ms(250),
        ];
        renumber(&mut steps);
        steps
    }

    #[test]
    fn renumber_produces_valid_sequence() {
        let steps = sample();
        assert!(validate_sequence(&steps).is_ok());
        assert_eq!(steps[2].id, "step-3");
    }

    #[test]
    fn validate_detects_gap() {
        let mut steps = sample();
        steps[1].order = 5;
        assert_eq!(
            validate_sequence(&steps),
            Err(StepError::NonContiguousOrder {
                position: 1,
                expected: 1,
                actual: 5
            })
        );
    }

    #[test]
    fn validate_detects_duplicate_id() {
        let mut steps = sample();
        steps[2].id = "step-1".to_string();
        assert_eq!(
            validate_sequence(&steps),
            Err(StepError::DuplicateId("step-1".to_string()))
        );
    }

    #[test]
    fn reorder_moves_and_renumbers() {
        let mut steps = sample();
        reorder(&mut steps, 2, 0).unwrap();
        assert_eq!(steps[0].action, Action::Wait);
        assert_eq!(steps[0].order, 0);
        assert_eq!(steps[0].id, "step-1");
        assert!(validate_sequence(&steps).is_ok());
    }

    #[test]
    fn reorder_rejects_out_of_range() {
        let mut steps = sample();
        assert!(matches!(
            reorder(&mut steps, 3, 0),
            Err(StepError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn duration_uses_wait_values() {
        let steps = sample();
        assert_eq!(estimate_duration_ms(&steps), 2_000 + 500 + 250);
    }

    #[test]
    fn duration_saturates_on_huge_waits() {
        let steps = vec![Step::wait_ms(u64::MAX), Step::wait_ms(1_000), Step::navigate("/")];
        assert_eq!(estimate_duration_ms(&steps), u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_reorder_keeps_invariant(len in 1..12usize, from in 0..12usize, to in 0..12usize) {
            let mut steps: Vec<Step> = (0..len).map(|i| Step::wait_ms(i as u64)).collect();
            renumber(&mut steps);
            let result = reorder(&mut steps, from, to);
            prop_assert_eq!(result.is_ok(), from < len && to < len);
            prop_assert!(validate_sequence(&steps).is_ok());
            prop_assert_eq!(steps.len(), len);
        }
    }
}
