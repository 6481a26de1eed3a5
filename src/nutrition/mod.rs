//! Nutrition module
//!
//! Unit normalization, per-ingredient lookup aggregation, and the
//! backfill batch job.

pub mod aggregator;
pub mod backfill;
pub mod units;

pub use aggregator::{
    aggregate_nutrition, AggregatedNutrition, FetchError, NutritionSource,
};
pub use backfill::{run_backfill, BackfillSummary, RECIPE_DELAY};
pub use units::{average_whole_weight_grams, convert_to_grams, grams_per_unit, normalize_to_grams};
