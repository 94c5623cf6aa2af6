//! Value objects describing a cooking session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Recording status of a cooking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CookingStatus {
    #[default]
    Cooking,
    PendingPhoto,
    CompletedLight,
    /// Reserved; nothing in the recording flow produces it yet.
    CompletedFull,
}

impl CookingStatus {
    /// Returns true once the session reached any completion level.
    pub fn is_completed(&self) -> bool {
        matches!(self, CookingStatus::CompletedLight | CookingStatus::CompletedFull)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CookingStatus::Cooking => "cooking",
            CookingStatus::PendingPhoto => "pending_photo",
            CookingStatus::CompletedLight => "completed_light",
            CookingStatus::CompletedFull => "completed_full",
        }
    }
}

impl fmt::Display for CookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cooking" => Ok(CookingStatus::Cooking),
            "pending_photo" => Ok(CookingStatus::PendingPhoto),
            "completed_light" => Ok(CookingStatus::CompletedLight),
            "completed_full" => Ok(CookingStatus::CompletedFull),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown cooking status '{}'", other),
            )),
        }
    }
}

/// Taste calibration reported while cooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TasteStatus {
    Thin,
    Perfect,
    Thick,
}

impl TasteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TasteStatus::Thin => "thin",
            TasteStatus::Perfect => "perfect",
            TasteStatus::Thick => "thick",
        }
    }
}

impl fmt::Display for TasteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TasteStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thin" => Ok(TasteStatus::Thin),
            "perfect" => Ok(TasteStatus::Perfect),
            "thick" => Ok(TasteStatus::Thick),
            other => Err(ValidationError::invalid_format(
                "taste_status",
                format!("unknown taste '{}'", other),
            )),
        }
    }
}

/// Number of people a dish was cooked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Servings(u8);

impl Servings {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 99;

    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range(
                "servings",
                Self::MIN,
                Self::MAX,
                value,
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> i32 {
        i32::from(self.0)
    }
}

impl TryFrom<i32> for Servings {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Servings> for i32 {
    fn from(s: Servings) -> Self {
        s.value()
    }
}

impl fmt::Display for Servings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooking_status_parses_its_own_rendering() {
        for status in [
            CookingStatus::Cooking,
            CookingStatus::PendingPhoto,
            CookingStatus::CompletedLight,
            CookingStatus::CompletedFull,
        ] {
            assert_eq!(status.as_str().parse::<CookingStatus>(), Ok(status));
        }
    }

    #[test]
    fn only_completion_levels_are_completed() {
        assert!(!CookingStatus::Cooking.is_completed());
        assert!(!CookingStatus::PendingPhoto.is_completed());
        assert!(CookingStatus::CompletedLight.is_completed());
        assert!(CookingStatus::CompletedFull.is_completed());
    }

    #[test]
    fn taste_rejects_unknown_value() {
        assert!("salty".parse::<TasteStatus>().is_err());
        assert_eq!("thick".parse::<TasteStatus>(), Ok(TasteStatus::Thick));
    }

    #[test]
    fn servings_accepts_positive_values() {
        assert_eq!(Servings::new(4).unwrap().value(), 4);
        assert_eq!(Servings::new(99).unwrap().value(), 99);
    }

    #[test]
    fn servings_rejects_zero_and_negative() {
        assert!(Servings::new(0).is_err());
        assert!(Servings::new(-2).is_err());
        assert!(Servings::new(100).is_err());
    }

    #[test]
    fn servings_deserialization_validates() {
        assert!(serde_json::from_str::<Servings>("0").is_err());
        assert_eq!(serde_json::from_str::<Servings>("5").unwrap().value(), 5);
    }
}
