/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short (一覧用, 分量を隠す) / long (詳細用, recipe 全体) の 2 つのビュー
 * - validation (形式チェック) 用の validate()
 */
use serde::{Deserialize, Serialize};

use crate::repos::{drink_repo::DrinkRow, error::RepoError};

/// One recipe line. `parts` is the proprietary quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

impl Ingredient {
    fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("ingredient name is required");
        }
        if self.color.trim().is_empty() {
            return Err("ingredient color is required");
        }
        if self.parts == 0 {
            return Err("ingredient parts must be positive");
        }
        Ok(())
    }
}

/// Clients send either a single ingredient or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

impl RecipeInput {
    pub fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::One(i) => vec![i],
            RecipeInput::Many(v) => v,
        }
    }
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe must have at least one ingredient");
    }
    recipe.iter().try_for_each(Ingredient::validate)
}

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title is required");
    }
    if title.chars().count() > 80 {
        return Err("title must be <= 80 chars");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

impl CreateDrinkRequest {
    /// Validates and returns `(title, recipe)` ready to store.
    pub fn into_parts(self) -> Result<(String, Vec<Ingredient>), &'static str> {
        validate_title(&self.title)?;
        let recipe = self.recipe.into_ingredients();
        validate_recipe(&recipe)?;
        Ok((self.title, recipe))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn into_parts(self) -> Result<(Option<String>, Option<Vec<Ingredient>>), &'static str> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        let recipe = self.recipe.map(RecipeInput::into_ingredients);
        if let Some(recipe) = &recipe {
            validate_recipe(recipe)?;
        }
        Ok((self.title, recipe))
    }
}

pub fn encode_recipe(recipe: &[Ingredient]) -> String {
    // Vec<Ingredient> of plain strings/ints always serializes.
    serde_json::to_string(recipe).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortIngredient {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl TryFrom<DrinkRow> for DrinkLong {
    type Error = RepoError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str(&row.recipe)
            .map_err(|_| RepoError::CorruptRecipe { id: row.id })?;
        Ok(Self {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}

impl From<DrinkLong> for DrinkShort {
    fn from(drink: DrinkLong) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink
                .recipe
                .into_iter()
                .map(|i| ShortIngredient {
                    name: i.name,
                    color: i.color,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}
