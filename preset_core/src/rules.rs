//! Conflict rule tables.
//!
//! Two revisions of the rule set exist. `Current` is the superset and the
//! default; `Legacy` lacks the fish-free/add-fish reciprocity and the
//! vegan-implied exclusions and is kept only for older saved selections.

use crate::catalog::{get_default_catalog, PresetCatalog};
use crate::{Error, Result, Tag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which revision of the rule tables to apply
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleVariant {
    /// Deprecated rule set
    Legacy,
    #[default]
    Current,
}

impl RuleVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleVariant::Legacy => "legacy",
            RuleVariant::Current => "current",
        }
    }
}

impl fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(RuleVariant::Legacy),
            "current" => Ok(RuleVariant::Current),
            other => Err(Error::Config(format!(
                "Unknown rule variant '{}' (expected 'legacy' or 'current')",
                other
            ))),
        }
    }
}

/// An exclusion and the add-on it bans
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reciprocity {
    pub exclusion: Tag,
    pub add_on: Tag,
    /// When set, a selected add-on also greys out the exclusion
    pub mutual: bool,
}

impl Reciprocity {
    fn new(exclusion: Tag, add_on: Tag, mutual: bool) -> Self {
        Self {
            exclusion,
            add_on,
            mutual,
        }
    }
}

/// Rule tables consumed by the resolver and the predicates
#[derive(Clone, Debug)]
pub struct RuleSet {
    variant: RuleVariant,
    /// DietStyle tags from highest to lowest priority
    pub diet_priority: Vec<Tag>,
    /// Diet tag => tags it forbids, in removal order
    pub diet_exclusions: Vec<(Tag, Vec<Tag>)>,
    /// Exclusion/add-on pairs; the add-on loses when both are present
    pub reciprocity: Vec<Reciprocity>,
    /// (kept, dropped) pairs; the second tag loses when both are present
    pub reductions: Vec<(Tag, Tag)>,
    /// Trigger => tags force-added while the trigger is selected
    pub implied_additions: Vec<(Tag, Vec<Tag>)>,
}

impl RuleSet {
    /// Rule set for `variant` over the default catalog
    pub fn for_variant(variant: RuleVariant) -> Self {
        Self::from_catalog(get_default_catalog(), variant)
    }

    pub fn current() -> Self {
        Self::for_variant(RuleVariant::Current)
    }

    pub fn legacy() -> Self {
        Self::for_variant(RuleVariant::Legacy)
    }

    /// Rule set taking its diet priority from `catalog`
    pub fn from_catalog(catalog: &PresetCatalog, variant: RuleVariant) -> Self {
        let diet_exclusions = vec![
            (
                Tag::Vegan,
                vec![
                    Tag::Vegetarian,
                    Tag::Pescetarian,
                    Tag::AddMeat,
                    Tag::AddFish,
                    Tag::AddDairy,
                ],
            ),
            (Tag::Vegetarian, vec![Tag::Pescetarian, Tag::AddMeat]),
            (Tag::PlantBased, vec![Tag::AddMeat, Tag::AddFish]),
            (Tag::Pescetarian, vec![Tag::AddMeat]),
        ];

        let mut reciprocity = vec![Reciprocity::new(Tag::DairyFree, Tag::AddDairy, true)];
        let mut implied_additions = Vec::new();

        if variant == RuleVariant::Current {
            reciprocity.push(Reciprocity::new(Tag::FishFree, Tag::AddFish, false));
            implied_additions.push((
                Tag::Vegan,
                vec![
                    Tag::DairyFree,
                    Tag::EggFree,
                    Tag::FishFree,
                    Tag::ShellfishFree,
                ],
            ));
        }

        Self {
            variant,
            diet_priority: catalog.diet_priority().to_vec(),
            diet_exclusions,
            reciprocity,
            reductions: vec![(Tag::Keto, Tag::LowCarb), (Tag::Whole30, Tag::Vegan)],
            implied_additions,
        }
    }

    pub fn variant(&self) -> RuleVariant {
        self.variant
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!("legacy".parse::<RuleVariant>().unwrap(), RuleVariant::Legacy);
        assert_eq!(" Current ".parse::<RuleVariant>().unwrap(), RuleVariant::Current);
        assert!("newest".parse::<RuleVariant>().is_err());
    }

    #[test]
    fn test_default_is_current() {
        assert_eq!(RuleVariant::default(), RuleVariant::Current);
        assert_eq!(RuleSet::default().variant(), RuleVariant::Current);
    }

    #[test]
    fn test_legacy_omits_fish_free_and_implied_additions() {
        let legacy = RuleSet::legacy();
        assert_eq!(legacy.reciprocity.len(), 1);
        assert_eq!(legacy.reciprocity[0].add_on, Tag::AddDairy);
        assert!(legacy.implied_additions.is_empty());

        let current = RuleSet::current();
        assert!(current
            .reciprocity
            .iter()
            .any(|r| r.exclusion == Tag::FishFree && r.add_on == Tag::AddFish && !r.mutual));
        assert_eq!(current.implied_additions.len(), 1);
    }

    #[test]
    fn test_priority_comes_from_catalog() {
        let rules = RuleSet::current();
        assert_eq!(rules.diet_priority, get_default_catalog().diet_priority());
    }
}
