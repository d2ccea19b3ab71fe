use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Highest `strIngredientN` / `strMeasureN` index TheMealDB returns
const MAX_INGREDIENTS: usize = 20;

/// A recipe as listed by the filter and search endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal", default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
}

/// One ingredient row of a recipe detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientLine {
    pub ingredient: String,
    pub measure: Option<String>,
}

impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.measure {
            Some(measure) => write!(f, "{} – {}", self.ingredient, measure),
            None => write!(f, "{}", self.ingredient),
        }
    }
}

/// Full recipe as returned by the lookup and random endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Value>")]
pub struct MealDetail {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub youtube: Option<String>,
    pub ingredients: Vec<IngredientLine>,
}

impl From<HashMap<String, Value>> for MealDetail {
    fn from(raw: HashMap<String, Value>) -> Self {
        // Blank strings are as good as missing in TheMealDB payloads
        let field = |key: &str| -> Option<String> {
            raw.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let ingredients = (1..=MAX_INGREDIENTS)
            .filter_map(|i| {
                let ingredient = field(&format!("strIngredient{i}"))?;
                Some(IngredientLine {
                    ingredient,
                    measure: field(&format!("strMeasure{i}")),
                })
            })
            .collect();

        MealDetail {
            id: field("idMeal").unwrap_or_default(),
            title: field("strMeal").unwrap_or_default(),
            category: field("strCategory"),
            area: field("strArea"),
            instructions: field("strInstructions"),
            thumbnail: field("strMealThumb"),
            youtube: field("strYoutube"),
            ingredients,
        }
    }
}

impl From<MealDetail> for MealSummary {
    fn from(detail: MealDetail) -> Self {
        MealSummary {
            id: detail.id,
            title: detail.title,
            thumbnail: detail.thumbnail.unwrap_or_default(),
        }
    }
}

/// Top-level `{"meals": [...] | null}` wrapper used by every endpoint
#[derive(Debug, Deserialize)]
pub struct MealsEnvelope<T> {
    pub meals: Option<Vec<T>>,
}

impl<T> MealsEnvelope<T> {
    /// `null` or a missing `meals` field is an empty list, never an error
    pub fn into_vec(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

/// Which strategy produced the current result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    Ingredients,
    Name,
    #[default]
    None,
}

impl ResolutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionMode::Ingredients => "ingredients",
            ResolutionMode::Name => "name",
            ResolutionMode::None => "none",
        }
    }
}

/// Outcome of one search, always replaced as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverState {
    /// `Some(vec![])` means "no results", `None` means nothing to show
    pub data: Option<Vec<MealSummary>>,
    pub loading: bool,
    pub error: Option<String>,
    pub mode: ResolutionMode,
}

impl ResolverState {
    /// Blank input: empty list, no network activity
    pub fn idle() -> Self {
        ResolverState {
            data: Some(Vec::new()),
            loading: false,
            error: None,
            mode: ResolutionMode::None,
        }
    }

    pub fn loading() -> Self {
        ResolverState {
            data: None,
            loading: true,
            error: None,
            mode: ResolutionMode::None,
        }
    }

    pub fn resolved(meals: Vec<MealSummary>, mode: ResolutionMode) -> Self {
        ResolverState {
            data: Some(meals),
            loading: false,
            error: None,
            mode,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ResolverState {
            data: None,
            loading: false,
            error: Some(message.into()),
            mode: ResolutionMode::None,
        }
    }

    pub fn meals(&self) -> &[MealSummary] {
        self.data.as_deref().unwrap_or_default()
    }
}

impl Default for ResolverState {
    fn default() -> Self {
        Self::idle()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
