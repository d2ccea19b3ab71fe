//! Turns free-text input into a recipe list and the strategy that found it.
//!
//! Every token is looked up as an ingredient while the whole input is
//! searched as a dish name. The ingredient intersection wins when it is
//! non-empty, otherwise the name search result is used.

pub mod merge;
pub mod tokenizer;

pub use merge::{decide, intersect};
pub use tokenizer::{distinct_tokens, tokenize};

use crate::model::{MealSummary, ResolverState};
use crate::source::MealSource;
use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Arc;

pub struct Resolver {
    source: Arc<dyn MealSource>,
}

impl Resolver {
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Resolver { source }
    }

    pub async fn resolve(&self, raw_input: &str) -> ResolverState {
        let query = raw_input.trim();
        if query.is_empty() {
            return ResolverState::idle();
        }

        let tokens = distinct_tokens(query);
        debug!("Resolving {:?} with tokens {:?}", query, tokens);

        let ingredient_lookups = join_all(tokens.iter().map(|token| self.ingredient_or_empty(token)));
        let name_lookup = self.source.search_by_name(query);
        let (ingredient_lists, name_result) = tokio::join!(ingredient_lookups, name_lookup);

        let state = decide(&ingredient_lists, name_result);
        match &state.error {
            Some(message) => warn!("Search for {:?} failed: {}", query, message),
            None => info!(
                "Search for {:?} found {} recipes by {}",
                query,
                state.meals().len(),
                state.mode.as_str()
            ),
        }
        state
    }

    async fn ingredient_or_empty(&self, token: &str) -> Vec<MealSummary> {
        match self.source.filter_by_ingredient(token).await {
            Ok(meals) => meals,
            Err(e) => {
                warn!("Ingredient lookup for {:?} failed: {}", token, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MealDetail, ResolutionMode};
    use crate::PantryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn meal(id: &str) -> MealSummary {
        MealSummary {
            id: id.to_string(),
            title: format!("Meal {id}"),
            thumbnail: String::new(),
        }
    }

    #[derive(Default)]
    struct FakeSource {
        by_ingredient: HashMap<String, Vec<MealSummary>>,
        failing_ingredients: Vec<String>,
        by_name: HashMap<String, Vec<MealSummary>>,
        name_fails: bool,
        calls: AtomicUsize,
        name_queries: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MealSource for FakeSource {
        async fn filter_by_ingredient(
            &self,
            ingredient: &str,
        ) -> Result<Vec<MealSummary>, PantryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_ingredients.iter().any(|i| i == ingredient) {
                return Err(PantryError::StatusError(500));
            }
            Ok(self.by_ingredient.get(ingredient).cloned().unwrap_or_default())
        }

        async fn search_by_name(&self, query: &str) -> Result<Vec<MealSummary>, PantryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.name_queries.lock().unwrap().push(query.to_string());
            if self.name_fails {
                return Err(PantryError::ParseError("connection reset".to_string()));
            }
            Ok(self.by_name.get(query).cloned().unwrap_or_default())
        }

        async fn lookup(&self, _id: &str) -> Result<Option<MealDetail>, PantryError> {
            Ok(None)
        }

        async fn random(&self) -> Result<Option<MealDetail>, PantryError> {
            Ok(None)
        }
    }

    fn resolver(source: FakeSource) -> (Resolver, Arc<FakeSource>) {
        let source = Arc::new(source);
        (Resolver::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_calls() {
        let (resolver, source) = resolver(FakeSource::default());

        for input in ["", "   ", "\t\n"] {
            assert_eq!(resolver.resolve(input).await, ResolverState::idle());
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_ingredient() {
        let mut source = FakeSource::default();
        source
            .by_ingredient
            .insert("chicken".to_string(), vec![meal("x"), meal("y")]);
        let (resolver, _) = resolver(source);

        let state = resolver.resolve("Chicken").await;
        assert_eq!(
            state,
            ResolverState::resolved(vec![meal("x"), meal("y")], ResolutionMode::Ingredients)
        );
    }

    #[tokio::test]
    async fn test_multi_ingredient_intersection() {
        let mut source = FakeSource::default();
        source
            .by_ingredient
            .insert("chicken".to_string(), vec![meal("1"), meal("2"), meal("3")]);
        source
            .by_ingredient
            .insert("rice".to_string(), vec![meal("3"), meal("1"), meal("8")]);
        let (resolver, _) = resolver(source);

        let state = resolver.resolve("chicken, rice").await;
        assert_eq!(state.mode, ResolutionMode::Ingredients);
        assert_eq!(state.meals(), &[meal("1"), meal("3")]);
    }

    #[tokio::test]
    async fn test_dish_name_falls_back_to_name_search() {
        let mut source = FakeSource::default();
        source
            .by_name
            .insert("Biryani".to_string(), vec![meal("b1")]);
        let (resolver, source) = resolver(source);

        let state = resolver.resolve("  Biryani ").await;
        assert_eq!(state, ResolverState::resolved(vec![meal("b1")], ResolutionMode::Name));
        assert_eq!(*source.name_queries.lock().unwrap(), vec!["Biryani".to_string()]);
    }

    #[tokio::test]
    async fn test_nothing_found_is_empty_not_error() {
        let (resolver, _) = resolver(FakeSource::default());

        let state = resolver.resolve("zzzznotfood").await;
        assert_eq!(state, ResolverState::resolved(Vec::new(), ResolutionMode::Name));
    }

    #[tokio::test]
    async fn test_failed_ingredient_lookup_is_absorbed() {
        let mut source = FakeSource::default();
        source
            .by_ingredient
            .insert("chicken".to_string(), vec![meal("1")]);
        source.failing_ingredients.push("rice".to_string());
        source
            .by_name
            .insert("chicken rice".to_string(), vec![meal("n1")]);
        let (resolver, _) = resolver(source);

        // rice counts as empty, so the intersection is empty and name search wins
        let state = resolver.resolve("chicken rice").await;
        assert_eq!(state, ResolverState::resolved(vec![meal("n1")], ResolutionMode::Name));
    }

    #[tokio::test]
    async fn test_name_failure_surfaces_when_selected() {
        let source = FakeSource {
            name_fails: true,
            ..Default::default()
        };
        let (resolver, _) = resolver(source);

        let state = resolver.resolve("zzzznotfood").await;
        assert_eq!(state.data, None);
        assert_eq!(state.mode, ResolutionMode::None);
        assert!(state.error.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_name_failure_hidden_when_ingredients_win() {
        let mut source = FakeSource {
            name_fails: true,
            ..Default::default()
        };
        source
            .by_ingredient
            .insert("paneer".to_string(), vec![meal("p1")]);
        let (resolver, _) = resolver(source);

        let state = resolver.resolve("paneer").await;
        assert_eq!(state.mode, ResolutionMode::Ingredients);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_repeated_tokens_are_looked_up_once() {
        let (resolver, source) = resolver(FakeSource::default());

        resolver.resolve("rice, rice RICE").await;
        // one ingredient lookup plus one name search
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
