use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of fixed ingredient/measure slots in a directory meal.
pub const INGREDIENT_SLOTS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub ingredients: Vec<Ingredient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    pub measure: String,
    pub ingredient: String,
}

impl RecipeRecord {
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// Reads a stored document, accepting both the canonical shape and the raw
    /// directory shape (`strMeal`, `strIngredient1`, ...).
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        let is_directory_shape = document
            .as_object()
            .is_some_and(|obj| obj.contains_key("strMeal"));

        if is_directory_shape {
            let meal: DirectoryMeal = serde_json::from_value(document)?;
            Ok(meal.into())
        } else {
            serde_json::from_value(document)
        }
    }
}

/// One meal object as returned by the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryMeal {
    #[serde(rename = "idMeal")]
    pub id: Option<String>,
    #[serde(rename = "strMeal")]
    pub name: Option<String>,
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
    #[serde(rename = "strArea")]
    pub area: Option<String>,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strInstructions")]
    pub instructions: Option<String>,
    #[serde(rename = "strYoutube")]
    pub youtube: Option<String>,
    #[serde(rename = "strSource")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub slots: HashMap<String, Value>,
}

impl DirectoryMeal {
    fn slot(&self, field: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{field}{index}"))
            .and_then(Value::as_str)
    }

    /// Non-empty ingredient slots, in slot order, with their measures.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let ingredient = self.slot("strIngredient", i)?;
                if ingredient.is_empty() {
                    return None;
                }
                Some(Ingredient {
                    measure: self.slot("strMeasure", i).unwrap_or_default().to_string(),
                    ingredient: ingredient.to_string(),
                })
            })
            .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<DirectoryMeal> for RecipeRecord {
    fn from(meal: DirectoryMeal) -> Self {
        let ingredients = meal.ingredients();
        RecipeRecord {
            id: non_empty(meal.id),
            name: meal.name.unwrap_or_default(),
            category: non_empty(meal.category),
            area: non_empty(meal.area),
            image_url: non_empty(meal.thumbnail),
            ingredients,
            instructions: non_empty(meal.instructions),
            video_url: non_empty(meal.youtube),
            source_url: non_empty(meal.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arrabiata() -> Value {
        json!({
            "idMeal": "52771",
            "strMeal": "Spicy Arrabiata Penne",
            "strCategory": "Vegetarian",
            "strArea": "Italian",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/ustsqw1468250014.jpg",
            "strInstructions": "Bring a large pot of water to a boil.",
            "strYoutube": "https://www.youtube.com/watch?v=1IszT_guI08",
            "strSource": null,
            "strIngredient1": "penne rigate",
            "strMeasure1": "1 pound",
            "strIngredient2": "olive oil",
            "strMeasure2": "1/4 cup",
            "strIngredient3": "",
            "strMeasure3": "",
            "strIngredient4": "garlic",
            "strMeasure4": "3 cloves",
            "strIngredient5": " ",
            "strMeasure5": " ",
            "strIngredient6": null,
            "strMeasure6": null,
            "strIngredient20": "basil",
            "strMeasure20": null,
        })
    }

    #[test]
    fn test_directory_meal_normalizes_slots() {
        let meal: DirectoryMeal = serde_json::from_value(arrabiata()).unwrap();
        let record = RecipeRecord::from(meal);

        assert_eq!(record.name, "Spicy Arrabiata Penne");
        assert_eq!(record.id.as_deref(), Some("52771"));
        assert_eq!(record.source_url, None);
        assert_eq!(
            record.ingredients,
            vec![
                Ingredient {
                    measure: "1 pound".to_string(),
                    ingredient: "penne rigate".to_string()
                },
                Ingredient {
                    measure: "1/4 cup".to_string(),
                    ingredient: "olive oil".to_string()
                },
                Ingredient {
                    measure: "3 cloves".to_string(),
                    ingredient: "garlic".to_string()
                },
                Ingredient {
                    measure: " ".to_string(),
                    ingredient: " ".to_string()
                },
                Ingredient {
                    measure: "".to_string(),
                    ingredient: "basil".to_string()
                },
            ]
        );
        assert_eq!(record.ingredient_count(), 5);
    }

    #[test]
    fn test_measures_kept_verbatim() {
        let meal: DirectoryMeal = serde_json::from_value(json!({
            "strMeal": "Toast",
            "strIngredient1": "Bread ",
            "strMeasure1": " 2 slices",
        }))
        .unwrap();
        let record = RecipeRecord::from(meal);

        assert_eq!(record.ingredients[0].measure, " 2 slices");
        assert_eq!(record.ingredients[0].ingredient, "Bread ");
    }

    #[test]
    fn test_canonical_json_uses_camel_case() {
        let record = RecipeRecord {
            name: "Soup".to_string(),
            image_url: Some("http://img".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["imageUrl"], "http://img");
        assert!(value.get("videoUrl").is_none());
        assert_eq!(value["ingredients"], json!([]));
    }

    #[test]
    fn test_from_document_reads_both_shapes() {
        let legacy = RecipeRecord::from_document(arrabiata()).unwrap();
        assert_eq!(legacy.ingredient_count(), 5);

        let canonical = serde_json::to_value(&legacy).unwrap();
        let reread = RecipeRecord::from_document(canonical).unwrap();
        assert_eq!(reread, legacy);
    }

    #[test]
    fn test_from_document_defaults_missing_fields() {
        let record = RecipeRecord::from_document(json!({ "category": "Dessert" })).unwrap();

        assert_eq!(record.name, "");
        assert_eq!(record.category.as_deref(), Some("Dessert"));
        assert!(record.ingredients.is_empty());
    }

    #[test]
    fn test_from_document_rejects_non_objects() {
        assert!(RecipeRecord::from_document(json!(42)).is_err());
    }
}
