//! Product catalogue: spices and their quality grades

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A traded spice (e.g. "Black Pepper", "Cardamom")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A quality grade of one product (e.g. "8mm Bold" for Cardamom).
/// Every grade belongs to exactly one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Grade {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Grade {
    /// Whether this grade is a grade of `product_id`
    pub fn belongs_to(&self, product_id: Uuid) -> bool {
        self.product_id == product_id
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewGrade {
    pub product_id: Uuid,
    pub name: String,
    pub description: String,
}
