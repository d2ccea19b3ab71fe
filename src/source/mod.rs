mod mealdb;

pub use mealdb::{MealDbClient, MealDbClientBuilder};

use crate::model::{MealDetail, MealSummary};
use crate::PantryError;
use async_trait::async_trait;

/// Remote recipe catalogue the resolver and discovery helpers read from
#[async_trait]
pub trait MealSource: Send + Sync {
    /// Recipes that use one ingredient
    async fn filter_by_ingredient(&self, ingredient: &str)
        -> Result<Vec<MealSummary>, PantryError>;

    /// Recipes whose name contains `query`
    async fn search_by_name(&self, query: &str) -> Result<Vec<MealSummary>, PantryError>;

    /// Full recipe by id, `None` when the id is unknown
    async fn lookup(&self, id: &str) -> Result<Option<MealDetail>, PantryError>;

    /// A single random recipe
    async fn random(&self) -> Result<Option<MealDetail>, PantryError>;
}
