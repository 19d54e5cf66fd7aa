// ABOUTME: Data models for recipe costing with sub-recipe graph support
// ABOUTME: Defines Recipe, Ingredient, IngredientLine, MeasureUnit, and related types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measurement unit for ingredient quantities and prices
///
/// Covers the three unit families the pricing engine converts between:
/// mass (grams/kilograms), volume (milliliters/liters), and count. A line's
/// unit is independent of the referenced ingredient's pricing unit; the
/// pricing engine converts between them where a conversion exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasureUnit {
    /// Weight in grams (base mass unit)
    #[default]
    Grams,
    /// Weight in kilograms (1000g)
    Kilograms,
    /// Volume in milliliters (base volume unit)
    Milliliters,
    /// Volume in liters (1000ml)
    Liters,
    /// Count of whole items (eggs, pastry shells, etc.)
    Unit,
}

impl MeasureUnit {
    /// Check if this unit is a mass measurement
    #[must_use]
    pub const fn is_mass(&self) -> bool {
        matches!(self, Self::Grams | Self::Kilograms)
    }

    /// Check if this unit is a volume measurement
    #[must_use]
    pub const fn is_volume(&self) -> bool {
        matches!(self, Self::Milliliters | Self::Liters)
    }

    /// Check if this unit is a count
    #[must_use]
    pub const fn is_count(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Get the abbreviation for display
    #[must_use]
    pub const fn abbreviation(&self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Kilograms => "kg",
            Self::Milliliters => "ml",
            Self::Liters => "l",
            Self::Unit => "u",
        }
    }

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grams => "grams",
            Self::Kilograms => "kilograms",
            Self::Milliliters => "milliliters",
            Self::Liters => "liters",
            Self::Unit => "unit",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "kilograms" => Self::Kilograms,
            "milliliters" => Self::Milliliters,
            "liters" => Self::Liters,
            "unit" => Self::Unit,
            // Default to Grams for unrecognized values
            _ => Self::Grams,
        }
    }
}

/// A recipe owned by exactly one user
///
/// Ingredient lines are stored relationally and fetched separately;
/// deleting a recipe cascades to its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier
    pub id: Uuid,
    /// Owner user ID (per-user recipes)
    pub user_id: Uuid,
    /// Recipe name
    pub name: String,
    /// Recipe description
    pub description: Option<String>,
    /// Number of servings this recipe yields (zero allowed)
    pub servings: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new recipe with basic information
    #[must_use]
    pub fn new(user_id: Uuid, name: impl Into<String>, servings: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description: None,
            servings,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a description
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// A priced ingredient in a user's catalog
///
/// Reference-database foods (nutrition entries without a price) are not
/// stored here; lines point at them by their external numeric ID instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique ingredient identifier
    pub id: Uuid,
    /// Owner user ID
    pub user_id: Uuid,
    /// Ingredient name
    pub name: String,
    /// Price per `price_unit`
    pub price: f64,
    /// Unit the price is expressed in
    pub price_unit: MeasureUnit,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Create a new priced ingredient
    #[must_use]
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        price: f64,
        price_unit: MeasureUnit,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            price,
            price_unit,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The single entity an ingredient line references
///
/// The three kinds are mutually exclusive by construction: a line points at
/// exactly one priced ingredient, reference-database food, or sub-recipe.
/// The database mirrors this with three nullable columns and a CHECK
/// constraint requiring exactly one to be non-null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LineTarget {
    /// A priced ingredient from the user's catalog
    Ingredient {
        /// Referenced ingredient ID
        ingredient_id: Uuid,
    },
    /// A nutrition-database food with no price data
    ///
    /// Contributes to labeling only; its cost contribution is always zero.
    ReferenceFood {
        /// External food-database identifier
        reference_food_id: i64,
    },
    /// Another recipe owned by the same user
    SubRecipe {
        /// Referenced recipe ID
        sub_recipe_id: Uuid,
    },
}

/// An ingredient line belonging to exactly one recipe
///
/// The "edge" of the recipe graph: when `target` is a sub-recipe this line
/// is a directed edge from its recipe to that sub-recipe, and the whole
/// graph must stay acyclic (enforced by the cycle guard before any line
/// pointing back at an ancestor is persisted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Unique line identifier
    pub id: Uuid,
    /// Recipe this line belongs to
    pub recipe_id: Uuid,
    /// The referenced ingredient, reference food, or sub-recipe
    pub target: LineTarget,
    /// Amount in `unit` (must be positive)
    pub quantity: f64,
    /// Measurement unit of `quantity`
    pub unit: MeasureUnit,
    /// Percentage of quantity lost to waste or trim (0-100)
    ///
    /// Applied as a cost multiplier: losing 10% of an input makes the line
    /// cost 1.1x its nominal price.
    pub loss_percent: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request shape for creating an ingredient line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIngredientLine {
    /// The referenced ingredient, reference food, or sub-recipe
    pub target: LineTarget,
    /// Amount in `unit` (must be positive)
    pub quantity: f64,
    /// Measurement unit of `quantity`
    pub unit: MeasureUnit,
    /// Percentage of quantity lost to waste or trim (0-100)
    pub loss_percent: f64,
}

/// Request shape for updating an ingredient line
///
/// The referenced entity is immutable after creation; only quantity, unit,
/// and loss change. Re-targeting a line is modeled as delete + create so
/// the cycle guard always sees new edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientLineUpdate {
    /// New quantity, if changing
    pub quantity: Option<f64>,
    /// New unit, if changing
    pub unit: Option<MeasureUnit>,
    /// New loss percentage, if changing
    pub loss_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_families() {
        assert!(MeasureUnit::Grams.is_mass());
        assert!(MeasureUnit::Kilograms.is_mass());
        assert!(MeasureUnit::Milliliters.is_volume());
        assert!(MeasureUnit::Liters.is_volume());
        assert!(MeasureUnit::Unit.is_count());
        assert!(!MeasureUnit::Unit.is_mass());
    }

    #[test]
    fn test_unit_db_round_trip() {
        for unit in [
            MeasureUnit::Grams,
            MeasureUnit::Kilograms,
            MeasureUnit::Milliliters,
            MeasureUnit::Liters,
            MeasureUnit::Unit,
        ] {
            assert_eq!(MeasureUnit::parse(unit.as_str()), unit);
        }
    }

    #[test]
    fn test_unit_parse_defaults_to_grams() {
        assert_eq!(MeasureUnit::parse("bogus"), MeasureUnit::Grams);
    }

    #[test]
    fn test_line_target_serialization() {
        let target = LineTarget::SubRecipe {
            sub_recipe_id: Uuid::new_v4(),
        };
        let json = serde_json::to_string(&target).unwrap();
        assert!(json.contains("sub_recipe"));
    }
}
