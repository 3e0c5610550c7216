//! Grade service

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Grade, NewGrade};
use shared::validation::validate_name;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::repositories::{GradeRepository, Repositories};
use crate::services::ProductService;

#[derive(Clone)]
pub struct GradeService {
    grades: Arc<dyn GradeRepository>,
    products: ProductService,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGradeInput {
    pub product_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl GradeService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            grades: repos.grades.clone(),
            products: ProductService::new(repos),
        }
    }

    /// Admin only. The parent product must exist.
    pub async fn create(&self, actor: &AuthUser, input: CreateGradeInput) -> AppResult<Grade> {
        actor.require_admin()?;
        validate_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;

        self.products.get(input.product_id).await?;

        let grade = self
            .grades
            .create(NewGrade {
                product_id: input.product_id,
                name: input.name.trim().to_string(),
                description: input.description.unwrap_or_default(),
            })
            .await?;

        tracing::info!(grade_id = %grade.id, product_id = %grade.product_id, "Grade created");
        Ok(grade)
    }

    /// All grades, or only those of one product
    pub async fn list(&self, product_id: Option<Uuid>) -> AppResult<Vec<Grade>> {
        match product_id {
            Some(product_id) => self.grades.find_by_product(product_id).await,
            None => self.grades.find_all().await,
        }
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Grade> {
        self.grades
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Grade".to_string()))
    }

    /// The grade, provided it belongs to `product_id`
    pub async fn get_for_product(&self, product_id: Uuid, grade_id: Uuid) -> AppResult<Grade> {
        let grade = self.get(grade_id).await?;
        if !grade.belongs_to(product_id) {
            return Err(AppError::InvalidGradeForProduct);
        }
        Ok(grade)
    }
}
