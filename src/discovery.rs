use crate::model::{MealDetail, MealSummary, ResolutionMode};
use crate::source::MealSource;
use crate::PantryError;
use futures::future::join_all;
use log::{debug, error};

/// A labelled shortcut that fills in a search query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip {
    pub label: &'static str,
    pub query: &'static str,
}

const fn chip(label: &'static str, query: &'static str) -> Chip {
    Chip { label, query }
}

pub const QUICK_PICKS: &[Chip] = &[
    chip("One-pot", "stew"),
    chip("Under 20 min", "salad"),
    chip("High-protein", "chicken"),
    chip("Vegetarian", "paneer"),
    chip("Comfort bowls", "curry"),
    chip("Noodles/Pasta", "noodle"),
];

pub const MOODS: &[Chip] = &[
    chip("Comfort", "curry"),
    chip("Quick Bite", "salad"),
    chip("Healthy", "grilled"),
    chip("Indulgent", "cheese"),
    chip("Spicy", "curry"),
    chip("Sweet", "dessert"),
];

/// Case-insensitive label lookup across moods, then quick picks
pub fn find_chip(label: &str) -> Option<&'static Chip> {
    let label = label.trim();
    MOODS
        .iter()
        .chain(QUICK_PICKS)
        .find(|chip| chip.label.eq_ignore_ascii_case(label))
}

/// Line explaining where the displayed results came from
pub fn mode_note(mode: ResolutionMode) -> Option<&'static str> {
    match mode {
        ResolutionMode::Ingredients => Some("Showing recipes that use all of your ingredients."),
        ResolutionMode::Name => Some("No ingredient match, showing recipes by dish name."),
        ResolutionMode::None => None,
    }
}

/// One random recipe
pub async fn chefs_choice(source: &dyn MealSource) -> Result<Option<MealDetail>, PantryError> {
    source.random().await
}

/// `count` random recipes fetched concurrently. Any failure yields an
/// empty list; repeats are dropped.
pub async fn random_meals(source: &dyn MealSource, count: usize) -> Vec<MealSummary> {
    let picks = join_all((0..count).map(|_| source.random())).await;

    let details = match picks.into_iter().collect::<Result<Vec<_>, _>>() {
        Ok(details) => details,
        Err(e) => {
            error!("Random fetch failed: {}", e);
            return Vec::new();
        }
    };

    let mut meals: Vec<MealSummary> = Vec::with_capacity(count);
    for detail in details.into_iter().flatten() {
        if meals.iter().any(|m| m.id == detail.id) {
            debug!("Skipping repeated random pick {}", detail.id);
            continue;
        }
        meals.push(detail.into());
    }
    meals
}
