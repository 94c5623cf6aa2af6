//! CookingSession aggregate - one recording attempt of one dish.

use serde::{Deserialize, Serialize};

use super::completion::{CompletionPolicy, SlotEvaluation};
use super::values::{CookingStatus, Servings, TasteStatus};
use crate::domain::foundation::{DishId, FamilySpaceId, MemberId, SessionId, Timestamp};

/// A single recording of a dish by a cook.
///
/// # Invariants
///
/// - Slot flags are only ever written by [`CookingSession::apply_evaluation`].
/// - Under the monotonic policy a completed session never regresses and
///   `completed_at` is written exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookingSession {
    id: SessionId,
    family_space_id: FamilySpaceId,
    member_id: MemberId,
    dish_id: DishId,
    status: CookingStatus,
    servings: Option<Servings>,
    taste_status: Option<TasteStatus>,
    slot_a_satisfied: bool,
    slot_b_satisfied: bool,
    started_at: Timestamp,
    completed_at: Option<Timestamp>,
}

impl CookingSession {
    /// Starts a new session in `cooking` status.
    pub fn start(family_space_id: FamilySpaceId, member_id: MemberId, dish_id: DishId) -> Self {
        Self {
            id: SessionId::new(),
            family_space_id,
            member_id,
            dish_id,
            status: CookingStatus::Cooking,
            servings: None,
            taste_status: None,
            slot_a_satisfied: false,
            slot_b_satisfied: false,
            started_at: Timestamp::now(),
            completed_at: None,
        }
    }

    /// Reconstitute a session from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        family_space_id: FamilySpaceId,
        member_id: MemberId,
        dish_id: DishId,
        status: CookingStatus,
        servings: Option<Servings>,
        taste_status: Option<TasteStatus>,
        slot_a_satisfied: bool,
        slot_b_satisfied: bool,
        started_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            family_space_id,
            member_id,
            dish_id,
            status,
            servings,
            taste_status,
            slot_a_satisfied,
            slot_b_satisfied,
            started_at,
            completed_at,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn family_space_id(&self) -> &FamilySpaceId {
        &self.family_space_id
    }

    /// The cook.
    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn dish_id(&self) -> &DishId {
        &self.dish_id
    }

    pub fn status(&self) -> CookingStatus {
        self.status
    }

    pub fn servings(&self) -> Option<Servings> {
        self.servings
    }

    pub fn taste_status(&self) -> Option<TasteStatus> {
        self.taste_status
    }

    pub fn slot_a_satisfied(&self) -> bool {
        self.slot_a_satisfied
    }

    pub fn slot_b_satisfied(&self) -> bool {
        self.slot_b_satisfied
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    /// Records the latest taste calibration; later taps overwrite earlier ones.
    pub fn record_taste(&mut self, taste: TasteStatus) {
        self.taste_status = Some(taste);
    }

    pub fn record_servings(&mut self, servings: Servings) {
        self.servings = Some(servings);
    }

    /// Applies a completion check result.
    ///
    /// Slot flags are always refreshed. Status and `completed_at` follow the
    /// policy: `Monotonic` keeps an already completed session untouched,
    /// `Recompute` rewrites both from the evaluation.
    pub fn apply_evaluation(
        &mut self,
        evaluation: SlotEvaluation,
        policy: CompletionPolicy,
        now: Timestamp,
    ) {
        self.slot_a_satisfied = evaluation.slot_a_satisfied;
        self.slot_b_satisfied = evaluation.slot_b_satisfied;

        match policy {
            CompletionPolicy::Monotonic => {
                if self.status.is_completed() {
                    return;
                }
                if evaluation.light_complete {
                    self.status = CookingStatus::CompletedLight;
                    if self.completed_at.is_none() {
                        self.completed_at = Some(now);
                    }
                } else {
                    self.status = CookingStatus::PendingPhoto;
                }
            }
            CompletionPolicy::Recompute => {
                if evaluation.light_complete {
                    self.status = CookingStatus::CompletedLight;
                    self.completed_at = Some(now);
                } else {
                    self.status = CookingStatus::PendingPhoto;
                    self.completed_at = None;
                }
            }
        }
    }
}
