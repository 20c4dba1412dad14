//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category entity
///
/// Identity is layered for historical reasons: `id` is assigned by the
/// persistence backend at creation time, while `canonical_tag` is the
/// identifier actually written into product tag lists. Legacy
/// categories used free-text tags (e.g. `"today offer"`) before
/// backend-assigned ids existed, so both must keep matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Backend-assigned store id. `None` only on an unpersisted draft.
    pub id: Option<String>,
    /// Author-supplied identifier used in product tag lists; derived
    /// from the name at creation time when absent.
    #[serde(default)]
    pub canonical_tag: Option<String>,
    /// Human-readable display name, unique by convention only.
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    /// Categories with bespoke business rules (e.g. Today's Offers).
    #[serde(default)]
    pub is_special: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub canonical_tag: Option<String>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub is_special: Option<bool>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub canonical_tag: Option<String>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub is_special: Option<bool>,
}

impl Category {
    /// Build an unpersisted category from a create payload.
    pub fn from_create(data: CategoryCreate) -> Self {
        Self {
            id: None,
            canonical_tag: data.canonical_tag,
            name: data.name,
            color: data.color.unwrap_or_else(|| "#667eea".to_string()),
            image: data.image.unwrap_or_default(),
            description: data.description.unwrap_or_default(),
            is_special: data.is_special.unwrap_or(false),
            created_at: None,
            updated_at: None,
        }
    }

    /// Apply an update payload in place.
    pub fn apply_update(&mut self, patch: CategoryUpdate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if patch.canonical_tag.is_some() {
            self.canonical_tag = patch.canonical_tag;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_special) = patch.is_special {
            self.is_special = is_special;
        }
    }
}
