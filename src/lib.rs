//! Recipe discovery over TheMealDB.
//!
//! Free-text input is resolved either as a set of ingredients (recipes that
//! use all of them) or, failing that, as a dish name.

pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod resolver;
pub mod session;
pub mod source;
pub mod store;

use std::sync::Arc;

pub use crate::config::{load_config, PantryConfig};
pub use error::PantryError;
pub use model::{IngredientLine, MealDetail, MealSummary, ResolutionMode, ResolverState};
pub use resolver::Resolver;
pub use session::{SearchSession, Snapshot};
pub use source::{MealDbClient, MealSource};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, Preferences};

/// Resolve `query` once against the public API
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let state = pantry_finder::search("chicken, rice").await?;
/// for meal in state.meals() {
///     println!("{}", meal.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str) -> Result<ResolverState, PantryError> {
    let resolver = Resolver::new(Arc::new(MealDbClient::new()?));
    Ok(resolver.resolve(query).await)
}
