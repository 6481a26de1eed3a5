//! Data models
//!
//! Rust structs representing database entities.

mod ai_recipe;
mod favorite;
mod ingredient;
mod nutrition;
mod recipe;
mod step;

pub use ai_recipe::AiRecipe;
pub use favorite::Favorite;
pub use ingredient::{Ingredient, IngredientCreate};
pub use nutrition::NutritionalInfo;
pub use recipe::{Recipe, RecipeCreate, RecipeFilter};
pub use step::Step;
