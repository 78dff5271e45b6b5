//! Catálogo de recompensas

use serde::{Deserialize, Serialize};

use crate::controllers::projection::Searchable;
use crate::models::{EntityId, Resource};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reward {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub point_required: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Resource for Reward {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Searchable for Reward {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.created_at.as_str(),
        ]
    }
}
