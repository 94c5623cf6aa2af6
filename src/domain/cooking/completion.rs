//! Slot-Satisfaction Engine.
//!
//! Decides from the frozen slot flags of recorded seasonings whether a
//! session satisfies slot A, slot B and, together with servings and taste,
//! whether it is light complete. Pure: no I/O, no clock.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{CookingSession, SessionSeasoning};
use crate::domain::foundation::ValidationError;

/// Result of evaluating a session against its slot requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEvaluation {
    pub slot_a_satisfied: bool,
    pub slot_b_satisfied: bool,
    pub light_complete: bool,
}

/// Evaluates a session against the seasonings recorded for it.
pub fn evaluate(session: &CookingSession, seasonings: &[SessionSeasoning]) -> SlotEvaluation {
    let slot_a_satisfied = seasonings.iter().any(|s| s.is_slot_a());
    let slot_b_satisfied = seasonings.iter().any(|s| s.is_slot_b());
    let light_complete = session.servings().is_some()
        && session.taste_status().is_some()
        && slot_a_satisfied
        && slot_b_satisfied;

    SlotEvaluation {
        slot_a_satisfied,
        slot_b_satisfied,
        light_complete,
    }
}

/// How a completion check treats a session that was already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Completion is permanent: status and `completed_at` never regress.
    #[default]
    Monotonic,
    /// Status and `completed_at` are recomputed on every check.
    Recompute,
}

impl FromStr for CompletionPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monotonic" => Ok(CompletionPolicy::Monotonic),
            "recompute" => Ok(CompletionPolicy::Recompute),
            other => Err(ValidationError::invalid_format(
                "completion_policy",
                format!("expected 'monotonic' or 'recompute', got '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cooking::{Servings, TasteStatus};
    use crate::domain::foundation::{DishId, FamilySpaceId, MemberId, SeasoningId};
    use proptest::prelude::*;

    fn misoshiru() -> CookingSession {
        CookingSession::start(
            FamilySpaceId::new(),
            MemberId::new(),
            DishId::new("misoshiru").unwrap(),
        )
    }

    fn seasoning(session: &CookingSession, id: &str, a: bool, b: bool) -> SessionSeasoning {
        SessionSeasoning::record(
            *session.id(),
            SeasoningId::new(id).unwrap(),
            None,
            crate::domain::catalog::SlotClassification {
                is_slot_a: a,
                is_slot_b: b,
            },
        )
    }

    fn ready(mut session: CookingSession) -> CookingSession {
        session.record_servings(Servings::new(4).unwrap());
        session.record_taste(TasteStatus::Perfect);
        session
    }

    #[test]
    fn both_slots_with_servings_and_taste_is_light_complete() {
        let session = ready(misoshiru());
        let recorded = vec![
            seasoning(&session, "miso_red", true, false),
            seasoning(&session, "dashi_powder", false, true),
        ];

        let eval = evaluate(&session, &recorded);

        assert!(eval.slot_a_satisfied);
        assert!(eval.slot_b_satisfied);
        assert!(eval.light_complete);
    }

    #[test]
    fn missing_slot_b_is_not_complete() {
        let session = ready(misoshiru());
        let recorded = vec![seasoning(&session, "miso_red", true, false)];

        let eval = evaluate(&session, &recorded);

        assert!(eval.slot_a_satisfied);
        assert!(!eval.slot_b_satisfied);
        assert!(!eval.light_complete);
    }

    #[test]
    fn missing_taste_is_not_complete() {
        let mut session = misoshiru();
        session.record_servings(Servings::new(2).unwrap());
        let recorded = vec![
            seasoning(&session, "miso_red", true, false),
            seasoning(&session, "dashi_powder", false, true),
        ];

        assert!(!evaluate(&session, &recorded).light_complete);
    }

    #[test]
    fn single_seasoning_in_both_slots_satisfies_both() {
        let session = ready(misoshiru());
        let recorded = vec![seasoning(&session, "all_in_one", true, true)];

        assert!(evaluate(&session, &recorded).light_complete);
    }

    #[test]
    fn no_seasonings_satisfies_nothing() {
        let eval = evaluate(&ready(misoshiru()), &[]);
        assert_eq!(
            eval,
            SlotEvaluation {
                slot_a_satisfied: false,
                slot_b_satisfied: false,
                light_complete: false,
            }
        );
    }

    #[test]
    fn completion_policy_parses_case_insensitively() {
        assert_eq!("Recompute".parse(), Ok(CompletionPolicy::Recompute));
        assert_eq!("monotonic".parse(), Ok(CompletionPolicy::Monotonic));
        assert!("sometimes".parse::<CompletionPolicy>().is_err());
    }

    proptest! {
        #[test]
        fn evaluate_is_pure_and_matches_flag_rule(
            flags in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..8),
            has_servings in any::<bool>(),
            has_taste in any::<bool>(),
        ) {
            let mut session = misoshiru();
            if has_servings {
                session.record_servings(Servings::new(3).unwrap());
            }
            if has_taste {
                session.record_taste(TasteStatus::Thin);
            }
            let recorded: Vec<SessionSeasoning> = flags
                .iter()
                .enumerate()
                .map(|(i, (a, b))| seasoning(&session, &format!("s{}", i), *a, *b))
                .collect();

            let first = evaluate(&session, &recorded);
            let second = evaluate(&session, &recorded);
            prop_assert_eq!(first, second);

            let any_a = flags.iter().any(|(a, _)| *a);
            let any_b = flags.iter().any(|(_, b)| *b);
            prop_assert_eq!(first.slot_a_satisfied, any_a);
            prop_assert_eq!(first.slot_b_satisfied, any_b);
            prop_assert_eq!(first.light_complete, any_a && any_b && has_servings && has_taste);
        }
    }
}
