// ABOUTME: Unit conversion for ingredient line quantities against pricing units
// ABOUTME: Converts within mass and volume families; incompatible pairs return None
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

use crate::models::MeasureUnit;

/// Grams per kilogram
const GRAMS_PER_KILOGRAM: f64 = 1000.0;
/// Milliliters per liter
const ML_PER_LITER: f64 = 1000.0;

/// Convert a quantity from one unit to another
///
/// Supported conversions: identity for equal units (count included),
/// grams/kilograms within the mass family, and milliliters/liters within the
/// volume family.
///
/// Returns `None` for any other pairing (mass vs volume, count vs anything
/// else). Callers treat that as degraded-but-non-fatal: the pricing engine
/// logs a warning and uses the raw quantity rather than corrupting a total
/// with a bogus conversion.
#[must_use]
pub fn convert_quantity(amount: f64, from: MeasureUnit, to: MeasureUnit) -> Option<f64> {
    if from == to {
        return Some(amount);
    }

    match (from, to) {
        (MeasureUnit::Grams, MeasureUnit::Kilograms) => Some(amount / GRAMS_PER_KILOGRAM),
        (MeasureUnit::Kilograms, MeasureUnit::Grams) => Some(amount * GRAMS_PER_KILOGRAM),
        (MeasureUnit::Milliliters, MeasureUnit::Liters) => Some(amount / ML_PER_LITER),
        (MeasureUnit::Liters, MeasureUnit::Milliliters) => Some(amount * ML_PER_LITER),
        _ => None,
    }
}
