//! The immutable dish catalog loaded at startup.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use super::errors::CatalogError;
use super::model::{Dish, DishTemplate, Seasoning, SeasoningOption, SlotClassification};
use crate::domain::foundation::{DishId, SeasoningId, TemplateKey};

const BUILTIN_YAML: &str = include_str!("builtin_catalog.yaml");

static BUILTIN: Lazy<Result<Arc<Catalog>, CatalogError>> =
    Lazy::new(|| Catalog::from_yaml(BUILTIN_YAML).map(Arc::new));

#[derive(Debug, Deserialize)]
struct RawCatalog {
    seasonings: Vec<Seasoning>,
    templates: Vec<DishTemplate>,
    dishes: Vec<Dish>,
}

/// Dish, template and seasoning lookup tables.
///
/// Every dish is guaranteed to reference an existing template and every
/// seasoning named by a template exists; lookups after construction only
/// fail for ids that come from outside (postbacks, mini-app submissions).
#[derive(Debug, Clone)]
pub struct Catalog {
    dishes: Vec<Dish>,
    templates: HashMap<TemplateKey, DishTemplate>,
    seasonings: HashMap<SeasoningId, Seasoning>,
}

impl Catalog {
    /// Returns the catalog compiled into the binary.
    pub fn builtin() -> Result<Arc<Catalog>, CatalogError> {
        BUILTIN.clone()
    }

    /// Loads and validates a catalog from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&text)
    }

    /// Parses and validates a catalog from YAML text.
    pub fn from_yaml(text: &str) -> Result<Catalog, CatalogError> {
        let raw: RawCatalog =
            serde_yaml::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::build(raw)
    }

    fn build(raw: RawCatalog) -> Result<Catalog, CatalogError> {
        if raw.dishes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seasonings = HashMap::with_capacity(raw.seasonings.len());
        for seasoning in raw.seasonings {
            let id = seasoning.id.clone();
            if seasonings.insert(id.clone(), seasoning).is_some() {
                return Err(CatalogError::Duplicate {
                    kind: "seasoning",
                    id: id.to_string(),
                });
            }
        }

        let mut templates = HashMap::with_capacity(raw.templates.len());
        for template in raw.templates {
            let referenced = template
                .slot_a
                .seasonings
                .iter()
                .chain(template.slot_b.seasonings.iter())
                .chain(template.candidates.iter());
            for seasoning in referenced {
                if !seasonings.contains_key(seasoning) {
                    return Err(CatalogError::UnknownSeasoning {
                        template: template.key.to_string(),
                        seasoning: seasoning.to_string(),
                    });
                }
            }
            let key = template.key.clone();
            if templates.insert(key.clone(), template).is_some() {
                return Err(CatalogError::Duplicate {
                    kind: "template",
                    id: key.to_string(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(raw.dishes.len());
        for dish in &raw.dishes {
            if !seen.insert(dish.id.clone()) {
                return Err(CatalogError::Duplicate {
                    kind: "dish",
                    id: dish.id.to_string(),
                });
            }
            if !templates.contains_key(&dish.template) {
                return Err(CatalogError::UnknownTemplate {
                    dish: dish.id.to_string(),
                    template: dish.template.to_string(),
                });
            }
        }

        Ok(Catalog {
            dishes: raw.dishes,
            templates,
            seasonings,
        })
    }

    /// All dishes in menu order.
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn dish(&self, id: &DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| &d.id == id)
    }

    /// Position of a dish in menu order.
    pub fn dish_position(&self, id: &DishId) -> Option<usize> {
        self.dishes.iter().position(|d| &d.id == id)
    }

    pub fn seasoning(&self, id: &SeasoningId) -> Option<&Seasoning> {
        self.seasonings.get(id)
    }

    /// Display name of a seasoning, falling back to its id.
    pub fn seasoning_name(&self, id: &SeasoningId) -> String {
        self.seasoning(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Template of a dish.
    pub fn template_for(&self, dish: &DishId) -> Option<&DishTemplate> {
        self.dish(dish).and_then(|d| self.templates.get(&d.template))
    }

    /// Slot classification of a seasoning for a dish; unknown dishes
    /// classify every seasoning into neither slot.
    pub fn classify(&self, dish: &DishId, seasoning: &SeasoningId) -> SlotClassification {
        self.template_for(dish)
            .map(|t| t.classify(seasoning))
            .unwrap_or_default()
    }

    /// Whether recording this seasoning for this dish needs a photo.
    pub fn requires_photo(&self, dish: &DishId, seasoning: &SeasoningId) -> bool {
        let own = self.seasoning(seasoning).map_or(false, |s| s.requires_photo);
        let by_slot = self.template_for(dish).map_or(false, |t| {
            (t.slot_a.requires_photo && t.slot_a.contains(seasoning))
                || (t.slot_b.requires_photo && t.slot_b.contains(seasoning))
        });
        own || by_slot
    }

    /// Seasonings the multi-select surface should offer for a dish.
    pub fn seasoning_options(&self, dish: &DishId) -> Vec<SeasoningOption> {
        let Some(template) = self.template_for(dish) else {
            return Vec::new();
        };
        template
            .candidates
            .iter()
            .filter_map(|id| self.seasoning(id))
            .map(|s| SeasoningOption {
                id: s.id.clone(),
                name: s.name.clone(),
                category: s.category.clone(),
                requires_photo: self.requires_photo(dish, &s.id),
            })
            .collect()
    }
}
