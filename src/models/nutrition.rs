//! Shared nutrition data structure
//!
//! Used for recipe totals and per-ingredient lookup results.

use serde::{Deserialize, Serialize};

/// Nutritional information
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: f64,
    pub protein: f64,       // grams
    pub fat: f64,           // grams
    pub carbohydrates: f64, // grams
    pub fiber: f64,         // grams
    pub sugar: f64,         // grams
    pub sodium: f64,        // milligrams
    pub cholesterol: f64,   // milligrams
}

impl NutritionalInfo {
    /// Create a NutritionalInfo with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale all values by a multiplier (portion scaling)
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
            carbohydrates: self.carbohydrates * multiplier,
            fiber: self.fiber * multiplier,
            sugar: self.sugar * multiplier,
            sodium: self.sodium * multiplier,
            cholesterol: self.cholesterol * multiplier,
        }
    }

    /// Add another record to this one
    pub fn add(&self, other: &NutritionalInfo) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            carbohydrates: self.carbohydrates + other.carbohydrates,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
            sodium: self.sodium + other.sodium,
            cholesterol: self.cholesterol + other.cholesterol,
        }
    }

    /// Round for display/persistence: calories to the nearest integer,
    /// every other field to one decimal place.
    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein: round1(self.protein),
            fat: round1(self.fat),
            carbohydrates: round1(self.carbohydrates),
            fiber: round1(self.fiber),
            sugar: round1(self.sugar),
            sodium: round1(self.sodium),
            cholesterol: round1(self.cholesterol),
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl std::ops::Add for NutritionalInfo {
    type Output = NutritionalInfo;

    fn add(self, other: NutritionalInfo) -> NutritionalInfo {
        NutritionalInfo::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutritionalInfo {
    type Output = NutritionalInfo;

    fn mul(self, multiplier: f64) -> NutritionalInfo {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutritionalInfo {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionalInfo::zero(), |acc, n| acc + n)
    }
}
