use thiserror::Error;

/// Errors raised while loading or validating the dish catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Catalog is not valid YAML: {0}")]
    Parse(String),

    #[error("Duplicate {kind} '{id}' in catalog")]
    Duplicate { kind: &'static str, id: String },

    #[error("Dish '{dish}' references unknown template '{template}'")]
    UnknownTemplate { dish: String, template: String },

    #[error("Template '{template}' references unknown seasoning '{seasoning}'")]
    UnknownSeasoning { template: String, seasoning: String },

    #[error("Catalog defines no dishes")]
    Empty,
}
