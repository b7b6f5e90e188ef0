use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, Entity, ValidationError, ValidationResult};

/// A stored category: a named grouping that products belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Validated, store-ready category (no id yet).
///
/// Only constructed through [`validate_category_input`], so a draft always carries a
/// non-empty name and never an empty description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    name: String,
    description: Option<String>,
}

impl CategoryDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Attach store-assigned identity, producing the stored record.
    pub fn into_category(self, id: CategoryId, created_at: DateTime<Utc>) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
            created_at,
        }
    }
}

/// Validate raw category form input.
///
/// - `name` must contain something other than whitespace.
/// - an empty `description` means "no description" and is stored as absent.
pub fn validate_category_input(name: &str, description: &str) -> ValidationResult<CategoryDraft> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let description = match description.trim() {
        "" => None,
        d => Some(d.to_string()),
    };

    Ok(CategoryDraft {
        name: name.to_string(),
        description,
    })
}
