//! Conversion request payload handed to the recipe conversion backend.
//!
//! The payload is built from a resolver output, so its `presets` field is
//! always deduplicated and free of rule violations.

use crate::{Error, Resolution, Result};
use serde::{Deserialize, Serialize};

/// Optional per-recipe nutrition bounds; `None` serialises as `null`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub min_calories: Option<f64>,
    pub max_calories: Option<f64>,
    pub min_protein: Option<f64>,
    pub max_protein: Option<f64>,
    pub min_carbs: Option<f64>,
    pub max_carbs: Option<f64>,
    pub min_fat: Option<f64>,
    pub max_fat: Option<f64>,
}

impl NutritionTargets {
    /// (name, min, max) triples in payload order
    fn bounds(&self) -> [(&'static str, Option<f64>, Option<f64>); 4] {
        [
            ("calories", self.min_calories, self.max_calories),
            ("protein", self.min_protein, self.max_protein),
            ("carbs", self.min_carbs, self.max_carbs),
            ("fat", self.min_fat, self.max_fat),
        ]
    }

    /// Check every bound is a finite non-negative number and min <= max
    pub fn validate(&self) -> Result<()> {
        for (name, min, max) in self.bounds() {
            for value in [min, max].into_iter().flatten() {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::Request(format!(
                        "{} bound {} must be a non-negative number",
                        name, value
                    )));
                }
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(Error::Request(format!(
                        "min {} ({}) is greater than max {} ({})",
                        name, min, name, max
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.bounds()
            .iter()
            .all(|(_, min, max)| min.is_none() && max.is_none())
    }
}

/// Body of a preview/apply conversion call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub presets: Vec<String>,
    pub nutrition: NutritionTargets,
    pub exclude_allergens: Vec<String>,
    pub locale: String,
}

impl ConversionRequest {
    /// Build a request from a resolver output
    ///
    /// Allergens are trimmed; blanks and duplicates are dropped.
    pub fn new(
        resolution: &Resolution,
        nutrition: NutritionTargets,
        exclude_allergens: impl IntoIterator<Item = impl AsRef<str>>,
        locale: impl Into<String>,
    ) -> Self {
        let mut allergens: Vec<String> = Vec::new();
        for allergen in exclude_allergens {
            let allergen = allergen.as_ref().trim();
            if !allergen.is_empty() && !allergens.iter().any(|a| a == allergen) {
                allergens.push(allergen.to_string());
            }
        }

        Self {
            presets: resolution.resolved.to_strings(),
            nutrition,
            exclude_allergens: allergens,
            locale: locale.into(),
        }
    }

    /// Validate the fields the resolver does not guarantee
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            return Err(Error::Request("locale must not be empty".into()));
        }
        self.nutrition.validate()
    }

    /// Pretty JSON body for the conversion endpoint
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
