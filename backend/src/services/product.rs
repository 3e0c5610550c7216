//! Product catalogue service

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use shared::models::{NewProduct, Product};
use shared::validation::validate_name;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::repositories::{ProductRepository, Repositories};

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            products: repos.products.clone(),
        }
    }

    /// Admin only
    pub async fn create(&self, actor: &AuthUser, input: CreateProductInput) -> AppResult<Product> {
        actor.require_admin()?;
        validate_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;

        let product = self
            .products
            .create(NewProduct {
                name: input.name.trim().to_string(),
                description: input.description.unwrap_or_default(),
            })
            .await?;

        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        self.products.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }
}
