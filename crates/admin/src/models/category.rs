//! Category models as managed by the admin console.

use serde::{Deserialize, Serialize};

use orchard_core::CategoryId;

/// A catalog category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub image: Option<String>,
}
