//! Catalog entries: dishes, templates and seasonings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DishId, SeasoningId, TemplateKey};

/// A dish the family can record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub template: TemplateKey,
}

/// A seasoning that can be selected in the mini-app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seasoning {
    pub id: SeasoningId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub requires_photo: bool,
}

/// One of the two required seasoning categories of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequirement {
    #[serde(default)]
    pub label: String,
    pub seasonings: Vec<SeasoningId>,
    /// Every seasoning satisfying this slot must be backed by a photo.
    #[serde(default)]
    pub requires_photo: bool,
}

impl SlotRequirement {
    pub fn contains(&self, seasoning: &SeasoningId) -> bool {
        self.seasonings.contains(seasoning)
    }
}

/// Seasoning requirements shared by a group of dishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishTemplate {
    pub key: TemplateKey,
    pub slot_a: SlotRequirement,
    pub slot_b: SlotRequirement,
    /// Seasonings offered by the multi-select surface, in display order.
    pub candidates: Vec<SeasoningId>,
}

impl DishTemplate {
    /// Classifies a seasoning against the two slots.
    ///
    /// A seasoning may satisfy neither, either or both slots.
    pub fn classify(&self, seasoning: &SeasoningId) -> SlotClassification {
        SlotClassification {
            is_slot_a: self.slot_a.contains(seasoning),
            is_slot_b: self.slot_b.contains(seasoning),
        }
    }
}

/// Frozen slot membership of a recorded seasoning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotClassification {
    pub is_slot_a: bool,
    pub is_slot_b: bool,
}

/// A seasoning as offered for a specific dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasoningOption {
    pub id: SeasoningId,
    pub name: String,
    pub category: String,
    pub requires_photo: bool,
}
