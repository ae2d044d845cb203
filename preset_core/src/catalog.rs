//! Default catalog of preset groups and the diet priority order.
//!
//! The catalog is static data. It is built once into an immutable value and
//! passed by reference to whatever needs it.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<PresetCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static PresetCatalog {
    &DEFAULT_CATALOG
}

/// Partition of recognised tags into named groups
#[derive(Clone, Debug)]
pub struct PresetCatalog {
    groups: Vec<(PresetGroup, Vec<Tag>)>,
    diet_priority: Vec<Tag>,
}

/// Builds the default catalog
///
/// Prefer [`get_default_catalog`] outside of tests and custom catalogs.
pub fn build_default_catalog() -> PresetCatalog {
    let groups = vec![
        (
            PresetGroup::DietStyle,
            vec![
                Tag::Vegan,
                Tag::PlantBased,
                Tag::Vegetarian,
                Tag::Pescetarian,
                Tag::Omnivore,
            ],
        ),
        (
            PresetGroup::AddOns,
            vec![Tag::AddMeat, Tag::AddFish, Tag::AddDairy],
        ),
        (
            PresetGroup::Exclusions,
            vec![
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
            ],
        ),
        (
            PresetGroup::Macros,
            vec![
                Tag::LowCarb,
                Tag::Keto,
                Tag::LowFat,
                Tag::HighProtein,
                Tag::LowSodium,
            ],
        ),
        (
            PresetGroup::Programs,
            vec![Tag::Mediterranean, Tag::Whole30],
        ),
    ];

    // vegan > plant-based > vegetarian > pescetarian > omnivore
    let diet_priority = vec![
        Tag::Vegan,
        Tag::PlantBased,
        Tag::Vegetarian,
        Tag::Pescetarian,
        Tag::Omnivore,
    ];

    PresetCatalog {
        groups,
        diet_priority,
    }
}

impl PresetCatalog {
    /// Build a catalog from explicit groups and priority order
    ///
    /// No checks are made here; call [`PresetCatalog::validate`].
    pub fn new(groups: Vec<(PresetGroup, Vec<Tag>)>, diet_priority: Vec<Tag>) -> Self {
        Self {
            groups,
            diet_priority,
        }
    }

    /// Group name to ordered member list, in display order
    pub fn groups(&self) -> impl Iterator<Item = (PresetGroup, &[Tag])> {
        self.groups.iter().map(|(g, tags)| (*g, tags.as_slice()))
    }

    /// Members of a single group
    pub fn tags_in(&self, group: PresetGroup) -> &[Tag] {
        self.groups
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, tags)| tags.as_slice())
            .unwrap_or(&[])
    }

    /// Which group lists `tag`, if any
    pub fn group_of(&self, tag: &Tag) -> Option<PresetGroup> {
        self.groups
            .iter()
            .find(|(_, tags)| tags.contains(tag))
            .map(|(g, _)| *g)
    }

    /// DietStyle tags from highest to lowest priority
    pub fn diet_priority(&self) -> &[Tag] {
        &self.diet_priority
    }

    /// Every tag in the catalog, group by group
    pub fn all_tags(&self) -> impl Iterator<Item = &Tag> {
        self.groups.iter().flat_map(|(_, tags)| tags.iter())
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        let mut seen_groups = HashSet::new();

        for (group, tags) in &self.groups {
            if !seen_groups.insert(*group) {
                errors.push(format!("Group '{}' is declared twice", group.as_str()));
            }
            if tags.is_empty() {
                errors.push(format!("Group '{}' has no tags", group.as_str()));
            }
            for tag in tags {
                if tag.is_unknown() {
                    errors.push(format!(
                        "Group '{}' lists unknown tag '{}'",
                        group.as_str(),
                        tag
                    ));
                }
                if !seen.insert(tag) {
                    errors.push(format!("Tag '{}' appears in more than one group", tag));
                }
                if tag.group().is_some() && tag.group() != Some(*group) {
                    errors.push(format!(
                        "Tag '{}' is listed under '{}' but belongs to another group",
                        tag,
                        group.as_str()
                    ));
                }
            }
        }

        let diet_styles = self.tags_in(PresetGroup::DietStyle);
        let priority: HashSet<_> = self.diet_priority.iter().collect();
        if priority.len() != self.diet_priority.len() {
            errors.push("Diet priority lists a tag more than once".to_string());
        }
        if priority.len() != diet_styles.len() || diet_styles.iter().any(|t| !priority.contains(t))
        {
            errors.push("Diet priority is not a permutation of the diet style group".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.groups().count(), 5);
        assert_eq!(catalog.all_tags().count(), Tag::KNOWN.len());
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_group_order_and_members() {
        let catalog = get_default_catalog();
        let names: Vec<_> = catalog.groups().map(|(g, _)| g).collect();
        assert_eq!(names, PresetGroup::ALL.to_vec());
        assert_eq!(
            catalog.tags_in(PresetGroup::Programs),
            &[Tag::Mediterranean, Tag::Whole30]
        );
        assert_eq!(catalog.tags_in(PresetGroup::Exclusions).len(), 11);
    }

    #[test]
    fn test_group_of_matches_tag_group() {
        let catalog = get_default_catalog();
        for tag in catalog.all_tags() {
            assert_eq!(catalog.group_of(tag), tag.group());
        }
        assert_eq!(catalog.group_of(&Tag::parse("future-tag")), None);
    }

    #[test]
    fn test_diet_priority_order() {
        let catalog = get_default_catalog();
        assert_eq!(
            catalog.diet_priority(),
            &[
                Tag::Vegan,
                Tag::PlantBased,
                Tag::Vegetarian,
                Tag::Pescetarian,
                Tag::Omnivore
            ]
        );
    }

    #[test]
    fn test_validate_detects_overlap_and_bad_priority() {
        let catalog = PresetCatalog::new(
            vec![
                (PresetGroup::DietStyle, vec![Tag::Vegan, Tag::Omnivore]),
                (PresetGroup::AddOns, vec![Tag::AddMeat, Tag::Vegan]),
            ],
            vec![Tag::Vegan],
        );
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("more than one group")));
        assert!(errors.iter().any(|e| e.contains("permutation")));
    }
}
