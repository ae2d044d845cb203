//! Core domain types for recipe conversion presets.
//!
//! This module defines the fundamental types used throughout the system:
//! - Tags and the groups they belong to
//! - Selections (the set of tags a user requested)
//! - Adjustments and resolutions produced by the resolver

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Tags and Groups
// ============================================================================

/// Group a catalog tag belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PresetGroup {
    /// Mutually exclusive lifestyle diets
    DietStyle,
    /// Opt-in ingredient categories
    AddOns,
    /// Hard ingredient bans
    Exclusions,
    /// Nutrient-shaping directives
    Macros,
    /// Named diet programs
    Programs,
}

impl PresetGroup {
    /// All groups in catalog display order
    pub const ALL: [PresetGroup; 5] = [
        PresetGroup::DietStyle,
        PresetGroup::AddOns,
        PresetGroup::Exclusions,
        PresetGroup::Macros,
        PresetGroup::Programs,
    ];

    /// Stable machine name
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetGroup::DietStyle => "diet_style",
            PresetGroup::AddOns => "add_ons",
            PresetGroup::Exclusions => "exclusions",
            PresetGroup::Macros => "macros",
            PresetGroup::Programs => "programs",
        }
    }

    /// Human-readable heading
    pub fn title(&self) -> &'static str {
        match self {
            PresetGroup::DietStyle => "Diet style",
            PresetGroup::AddOns => "Add-ons",
            PresetGroup::Exclusions => "Exclusions",
            PresetGroup::Macros => "Macros",
            PresetGroup::Programs => "Programs",
        }
    }
}

/// A single dietary or nutritional preset
///
/// Every tag the catalog knows is a named variant. Anything else parses to
/// [`Tag::Unknown`] and is carried through resolution untouched, so tags
/// introduced server-side keep working without a client release.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    // Diet style
    Vegan,
    PlantBased,
    Vegetarian,
    Pescetarian,
    Omnivore,
    // Add-ons
    AddMeat,
    AddFish,
    AddDairy,
    // Exclusions
    DairyFree,
    GlutenFree,
    NutFree,
    SoyFree,
    EggFree,
    FishFree,
    ShellfishFree,
    Halal,
    Kosher,
    LactoseFree,
    Paleo,
    // Macros
    LowCarb,
    Keto,
    LowFat,
    HighProtein,
    LowSodium,
    // Programs
    Mediterranean,
    Whole30,
    /// A tag outside the catalog, kept verbatim
    Unknown(String),
}

impl Tag {
    /// Every catalog tag (excludes `Unknown`)
    pub const KNOWN: [Tag; 26] = [
        Tag::Vegan,
        Tag::PlantBased,
        Tag::Vegetarian,
        Tag::Pescetarian,
        Tag::Omnivore,
        Tag::AddMeat,
        Tag::AddFish,
        Tag::AddDairy,
        Tag::DairyFree,
        Tag::GlutenFree,
        Tag::NutFree,
        Tag::SoyFree,
        Tag::EggFree,
        Tag::FishFree,
        Tag::ShellfishFree,
        Tag::Halal,
        Tag::Kosher,
        Tag::LactoseFree,
        Tag::Paleo,
        Tag::LowCarb,
        Tag::Keto,
        Tag::LowFat,
        Tag::HighProtein,
        Tag::LowSodium,
        Tag::Mediterranean,
        Tag::Whole30,
    ];

    /// Parse a tag identifier. Never fails.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unrecognised input becomes `Unknown` with the trimmed text preserved.
    pub fn parse(s: &str) -> Tag {
        let trimmed = s.trim();
        Tag::KNOWN
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Tag::Unknown(trimmed.to_string()))
    }

    /// Canonical wire identifier
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Vegan => "vegan",
            Tag::PlantBased => "plant-based",
            Tag::Vegetarian => "vegetarian",
            Tag::Pescetarian => "pescetarian",
            Tag::Omnivore => "omnivore",
            Tag::AddMeat => "add-meat",
            Tag::AddFish => "add-fish",
            Tag::AddDairy => "add-dairy",
            Tag::DairyFree => "dairy-free",
            Tag::GlutenFree => "gluten-free",
            Tag::NutFree => "nut-free",
            Tag::SoyFree => "soy-free",
            Tag::EggFree => "egg-free",
            Tag::FishFree => "fish-free",
            Tag::ShellfishFree => "shellfish-free",
            Tag::Halal => "halal",
            Tag::Kosher => "kosher",
            Tag::LactoseFree => "lactose-free",
            Tag::Paleo => "paleo",
            Tag::LowCarb => "low-carb",
            Tag::Keto => "keto",
            Tag::LowFat => "low-fat",
            Tag::HighProtein => "high-protein",
            Tag::LowSodium => "low-sodium",
            Tag::Mediterranean => "Mediterranean",
            Tag::Whole30 => "Whole30",
            Tag::Unknown(s) => s,
        }
    }

    /// Group this tag belongs to, or `None` for unknown tags
    pub fn group(&self) -> Option<PresetGroup> {
        match self {
            Tag::Vegan | Tag::PlantBased | Tag::Vegetarian | Tag::Pescetarian | Tag::Omnivore => {
                Some(PresetGroup::DietStyle)
            }
            Tag::AddMeat | Tag::AddFish | Tag::AddDairy => Some(PresetGroup::AddOns),
            Tag::DairyFree
            | Tag::GlutenFree
            | Tag::NutFree
            | Tag::SoyFree
            | Tag::EggFree
            | Tag::FishFree
            | Tag::ShellfishFree
            | Tag::Halal
            | Tag::Kosher
            | Tag::LactoseFree
            | Tag::Paleo => Some(PresetGroup::Exclusions),
            Tag::LowCarb | Tag::Keto | Tag::LowFat | Tag::HighProtein | Tag::LowSodium => {
                Some(PresetGroup::Macros)
            }
            Tag::Mediterranean | Tag::Whole30 => Some(PresetGroup::Programs),
            Tag::Unknown(_) => None,
        }
    }

    /// Whether this tag is one of the mutually exclusive diet styles
    pub fn is_diet_style(&self) -> bool {
        self.group() == Some(PresetGroup::DietStyle)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Tag::Unknown(_))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Tag::parse(s))
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::parse(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::parse(&s)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.as_str().to_string()
    }
}

// ============================================================================
// Selection
// ============================================================================

/// An unordered, duplicate-free set of requested tags
///
/// Backed by a `BTreeSet` so iteration and serialization are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<Tag>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from raw tag identifiers
    pub fn from_strs<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter().map(|s| Tag::parse(s.as_ref())).collect()
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Insert a tag, returning true if it was not already present
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    /// Remove a tag, returning true if it was present
    pub fn remove(&mut self, tag: &Tag) -> bool {
        self.0.remove(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tags of this selection that belong to `group`
    pub fn in_group(&self, group: PresetGroup) -> impl Iterator<Item = &Tag> {
        self.0.iter().filter(move |t| t.group() == Some(group))
    }

    /// Canonical identifiers, in set order
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|t| t.as_str().to_string()).collect()
    }

    pub fn as_set(&self) -> &BTreeSet<Tag> {
        &self.0
    }
}

impl FromIterator<Tag> for Selection {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Selection(iter.into_iter().collect())
    }
}

impl IntoIterator for Selection {
    type Item = Tag;
    type IntoIter = std::collections::btree_set::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Tag;
    type IntoIter = std::collections::btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Resolution Output
// ============================================================================

/// Automatic changes the resolver made beyond the literal request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    /// Tags removed to satisfy a conflict rule, in the order removed
    pub auto_unselected: Vec<Tag>,
    /// Tags inserted automatically, in the order added
    pub auto_added: Vec<Tag>,
    /// Tags that cannot be selected given the final selection
    pub auto_disabled: BTreeSet<Tag>,
}

impl Adjustments {
    /// True when nothing was removed or added.
    ///
    /// `auto_disabled` is derived from the final selection and is not
    /// considered an adjustment.
    pub fn is_empty(&self) -> bool {
        self.auto_unselected.is_empty() && self.auto_added.is_empty()
    }
}

/// Authoritative selection plus the record of how it was reached
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub resolved: Selection,
    pub adjustments: Adjustments,
}
