use crate::model::{MealSummary, ResolutionMode, ResolverState};
use std::collections::HashSet;

/// Recipes present in every list, by id, in the order of the first list.
/// No lists means no recipes.
pub fn intersect(lists: &[Vec<MealSummary>]) -> Vec<MealSummary> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };

    let id_sets: Vec<HashSet<&str>> = rest
        .iter()
        .map(|list| list.iter().map(|meal| meal.id.as_str()).collect())
        .collect();

    let mut seen = HashSet::new();
    first
        .iter()
        .filter(|meal| id_sets.iter().all(|ids| ids.contains(meal.id.as_str())))
        .filter(|meal| seen.insert(meal.id.as_str()))
        .cloned()
        .collect()
}

/// Pick the ingredient intersection when it has anything, otherwise the
/// name search outcome. A failed name search only matters on that path.
pub fn decide<E: ToString>(
    ingredient_lists: &[Vec<MealSummary>],
    name_result: Result<Vec<MealSummary>, E>,
) -> ResolverState {
    let intersection = intersect(ingredient_lists);
    if !intersection.is_empty() {
        return ResolverState::resolved(intersection, ResolutionMode::Ingredients);
    }

    match name_result {
        Ok(meals) => ResolverState::resolved(meals, ResolutionMode::Name),
        Err(e) => ResolverState::failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(id: &str) -> MealSummary {
        MealSummary {
            id: id.to_string(),
            title: format!("Meal {id}"),
            thumbnail: format!("https://img/{id}.jpg"),
        }
    }

    fn ids(meals: &[MealSummary]) -> Vec<&str> {
        meals.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_no_lists_is_empty() {
        assert!(intersect(&[]).is_empty());
    }

    #[test]
    fn test_single_list_is_itself() {
        let lists = vec![vec![meal("2"), meal("1")]];
        assert_eq!(ids(&intersect(&lists)), vec!["2", "1"]);
    }

    #[test]
    fn test_multi_list_keeps_common_ids_in_first_order() {
        let chicken = vec![meal("1"), meal("2"), meal("3"), meal("4")];
        let rice = vec![meal("4"), meal("9"), meal("2")];
        let garlic = vec![meal("2"), meal("4"), meal("1")];

        assert_eq!(ids(&intersect(&[chicken, rice, garlic])), vec!["2", "4"]);
    }

    #[test]
    fn test_empty_member_list_empties_intersection() {
        let lists = vec![vec![meal("1")], Vec::new()];
        assert!(intersect(&lists).is_empty());
    }

    #[test]
    fn test_decide_prefers_ingredients() {
        let lists = vec![vec![meal("1"), meal("2")]];
        let state = decide::<String>(&lists, Ok(vec![meal("7")]));

        assert_eq!(state.mode, ResolutionMode::Ingredients);
        assert_eq!(ids(state.meals()), vec!["1", "2"]);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_decide_ignores_name_failure_when_ingredients_win() {
        let lists = vec![vec![meal("1")]];
        let state = decide(&lists, Err("connection refused"));

        assert_eq!(state.mode, ResolutionMode::Ingredients);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_decide_falls_back_to_name() {
        let lists = vec![Vec::new()];
        let state = decide::<String>(&lists, Ok(vec![meal("biryani")]));

        assert_eq!(state.mode, ResolutionMode::Name);
        assert_eq!(ids(state.meals()), vec!["biryani"]);
    }

    #[test]
    fn test_decide_empty_name_is_not_an_error() {
        let state = decide::<String>(&[Vec::new()], Ok(Vec::new()));
        assert_eq!(state, ResolverState::resolved(Vec::new(), ResolutionMode::Name));
    }

    #[test]
    fn test_decide_surfaces_name_failure() {
        let state = decide(&[Vec::new()], Err("connection refused"));
        assert_eq!(state, ResolverState::failed("connection refused"));
    }
}
