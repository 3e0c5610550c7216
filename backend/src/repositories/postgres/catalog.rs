use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{Grade, NewGrade, NewProduct, Product};

use super::is_unique_violation;
use crate::error::{AppError, AppResult};
use crate::repositories::{GradeRepository, ProductRepository};

#[derive(Clone)]
pub struct PgProductRepository {
    db: PgPool,
}

impl PgProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict {
                    resource: "product".to_string(),
                    message: "A product with this name already exists".to_string(),
                }
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, created_at FROM products ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, created_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(product)
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }
}

#[derive(Clone)]
pub struct PgGradeRepository {
    db: PgPool,
}

impl PgGradeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GradeRepository for PgGradeRepository {
    async fn create(&self, grade: NewGrade) -> AppResult<Grade> {
        sqlx::query_as::<_, Grade>(
            r#"
            INSERT INTO grades (product_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, name, description, created_at
            "#,
        )
        .bind(grade.product_id)
        .bind(&grade.name)
        .bind(&grade.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict {
                    resource: "grade".to_string(),
                    message: "This product already has a grade with this name".to_string(),
                }
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn find_all(&self) -> AppResult<Vec<Grade>> {
        let grades = sqlx::query_as::<_, Grade>(
            "SELECT id, product_id, name, description, created_at FROM grades ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(grades)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Grade>> {
        let grade = sqlx::query_as::<_, Grade>(
            "SELECT id, product_id, name, description, created_at FROM grades WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(grade)
    }

    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Vec<Grade>> {
        let grades = sqlx::query_as::<_, Grade>(
            r#"
            SELECT id, product_id, name, description, created_at
            FROM grades
            WHERE product_id = $1
            ORDER BY name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;
        Ok(grades)
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM grades")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
