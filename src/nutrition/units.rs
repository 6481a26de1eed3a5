//! Unit normalization
//!
//! Maps free-text unit strings onto gram weights using a fixed lookup
//! table. Units not in the table pass through unchanged (the quantity
//! is silently assumed to already be grams) - a known accuracy gap,
//! not an error.

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

/// Average gram weight of one whole egg
pub const EGG_WEIGHT_G: f64 = 50.0;
/// Average gram weight of one whole apple
pub const APPLE_WEIGHT_G: f64 = 180.0;

/// Get the conversion factor to grams for a mass unit, case-insensitive
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "g" | "gram" | "grams" => Some(1.0),
        "mg" | "milligram" | "milligrams" => Some(G_PER_MG),
        "kg" | "kilogram" | "kilograms" => Some(G_PER_KG),
        "oz" | "ounce" | "ounces" => Some(G_PER_OZ),
        "lb" | "lbs" | "pound" | "pounds" => Some(G_PER_LB),
        _ => None,
    }
}

/// Convert a quantity in the given unit to grams.
///
/// Known mass units multiply by their factor; anything else returns the
/// quantity unchanged.
pub fn convert_to_grams(quantity: f64, unit: &str) -> f64 {
    match grams_per_unit(unit) {
        Some(factor) => quantity * factor,
        None => quantity,
    }
}

/// Average weight table for "whole" items. Only a handful of entries
/// exist; everything else stays unconverted.
pub fn average_whole_weight_grams(name: &str) -> Option<f64> {
    let lower = name.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "egg" | "eggs" => Some(EGG_WEIGHT_G),
        "apple" | "apples" => Some(APPLE_WEIGHT_G),
        _ => None,
    }
}

/// Is this a "whole item" unit that resolves through the average-weight
/// table rather than the mass table?
pub fn is_whole_unit(unit: &str) -> bool {
    let lower = unit.to_lowercase();
    matches!(lower.trim(), "whole" | "each" | "piece" | "pieces")
}

/// Normalize an ingredient quantity to grams where possible.
///
/// Returns the quantity and the unit string to send to the nutrition
/// provider. Whole items with a known average weight become grams;
/// unrecognized whole items are left as-is with a warning.
pub fn normalize_to_grams(name: &str, quantity: f64, unit: &str) -> (f64, String) {
    if is_whole_unit(unit) {
        return match average_whole_weight_grams(name) {
            Some(avg) => (quantity * avg, "g".to_string()),
            None => {
                tracing::warn!(
                    "No average weight for whole ingredient '{}'; leaving {} {} unconverted",
                    name,
                    quantity,
                    unit
                );
                (quantity, unit.to_string())
            }
        };
    }

    match grams_per_unit(unit) {
        Some(factor) => (quantity * factor, "g".to_string()),
        // Unknown unit passes through unchanged
        None => (quantity, unit.to_string()),
    }
}
