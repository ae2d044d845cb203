//! Disabled/locked predicates and the toggle flow.
//!
//! These mirror the resolver's rule tables so a UI can grey out choices
//! before the user makes them. `disabled_for` on a resolved selection is
//! exactly the resolver's `auto_disabled`.

use crate::resolver::resolve;
use crate::{Resolution, RuleSet, Selection, Tag};
use std::collections::BTreeSet;

/// Tags that cannot be selected alongside `selection`
pub fn disabled_for(selection: &Selection, rules: &RuleSet) -> BTreeSet<Tag> {
    let mut disabled = BTreeSet::new();

    for (trigger, forbidden) in &rules.diet_exclusions {
        if selection.contains(trigger) {
            disabled.extend(forbidden.iter().cloned());
        }
    }

    for pair in &rules.reciprocity {
        if selection.contains(&pair.exclusion) {
            disabled.insert(pair.add_on.clone());
        }
        if pair.mutual && selection.contains(&pair.add_on) {
            disabled.insert(pair.exclusion.clone());
        }
    }

    for (kept, dropped) in &rules.reductions {
        if selection.contains(kept) {
            disabled.insert(dropped.clone());
        }
    }

    disabled
}

/// Tags that were force-added and may not be toggled off
pub fn locked_for(selection: &Selection, rules: &RuleSet) -> BTreeSet<Tag> {
    rules
        .implied_additions
        .iter()
        .filter(|(trigger, _)| selection.contains(trigger))
        .flat_map(|(_, implied)| implied.iter().cloned())
        .collect()
}

/// Outcome of toggling a single tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// The change went through; the resolution is the new selection
    Applied(Resolution),
    /// The tag is force-added by the current selection
    Locked(Tag),
    /// The tag conflicts with the current selection
    Disabled(Tag),
}

/// Toggle `tag` in `selection` and resolve the result
///
/// Turning on a diet style replaces whichever diet style was selected; the
/// replaced tag is reported in `auto_unselected`.
pub fn toggle(selection: &Selection, tag: &Tag, rules: &RuleSet) -> Toggle {
    let mut candidate = selection.clone();
    let mut replaced = Vec::new();

    if selection.contains(tag) {
        if locked_for(selection, rules).contains(tag) {
            tracing::debug!("Refusing to unselect locked tag {}", tag);
            return Toggle::Locked(tag.clone());
        }
        candidate.remove(tag);
    } else {
        if disabled_for(selection, rules).contains(tag) {
            tracing::debug!("Refusing to select disabled tag {}", tag);
            return Toggle::Disabled(tag.clone());
        }
        if tag.is_diet_style() {
            replaced = selection
                .iter()
                .filter(|t| t.is_diet_style())
                .cloned()
                .collect();
            for old in &replaced {
                candidate.remove(old);
            }
        }
        candidate.insert(tag.clone());
    }

    let mut resolution = resolve(&candidate, rules);
    if !replaced.is_empty() {
        replaced.append(&mut resolution.adjustments.auto_unselected);
        resolution.adjustments.auto_unselected = replaced;
    }
    Toggle::Applied(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(tags: &[&str]) -> Selection {
        Selection::from_strs(tags)
    }

    fn set(tags: &[&str]) -> BTreeSet<Tag> {
        tags.iter().map(|t| Tag::parse(t)).collect()
    }

    fn applied(outcome: Toggle) -> Resolution {
        match outcome {
            Toggle::Applied(res) => res,
            other => panic!("expected Applied, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_for_vegan() {
        let disabled = disabled_for(&sel(&["vegan"]), &RuleSet::current());
        assert!(disabled.is_superset(&set(&[
            "vegetarian",
            "pescetarian",
            "add-meat",
            "add-fish",
            "add-dairy"
        ])));
    }

    #[test]
    fn test_disabled_for_each_rule() {
        let rules = RuleSet::current();
        assert_eq!(
            disabled_for(&sel(&["vegetarian"]), &rules),
            set(&["pescetarian", "add-meat"])
        );
        assert_eq!(
            disabled_for(&sel(&["plant-based"]), &rules),
            set(&["add-meat", "add-fish"])
        );
        assert_eq!(disabled_for(&sel(&["pescetarian"]), &rules), set(&["add-meat"]));
        assert_eq!(disabled_for(&sel(&["dairy-free"]), &rules), set(&["add-dairy"]));
        assert_eq!(disabled_for(&sel(&["add-dairy"]), &rules), set(&["dairy-free"]));
        assert_eq!(disabled_for(&sel(&["fish-free"]), &rules), set(&["add-fish"]));
        assert_eq!(disabled_for(&sel(&["keto"]), &rules), set(&["low-carb"]));
        assert_eq!(disabled_for(&sel(&["Whole30"]), &rules), set(&["vegan"]));
        assert!(disabled_for(&sel(&["omnivore", "future-tag"]), &rules).is_empty());
    }

    #[test]
    fn test_legacy_fish_free_disables_nothing() {
        assert!(disabled_for(&sel(&["fish-free"]), &RuleSet::legacy()).is_empty());
    }

    #[test]
    fn test_disabled_matches_resolver_on_resolved_input() {
        let rules = RuleSet::current();
        for input in [
            sel(&["vegan"]),
            sel(&["Whole30", "keto", "dairy-free"]),
            sel(&["pescetarian", "fish-free", "add-dairy"]),
        ] {
            let res = resolve(&input, &rules);
            assert_eq!(
                disabled_for(&res.resolved, &rules),
                res.adjustments.auto_disabled
            );
        }
    }

    #[test]
    fn test_locked_for_vegan() {
        assert_eq!(
            locked_for(&sel(&["vegan"]), &RuleSet::current()),
            set(&["dairy-free", "egg-free", "fish-free", "shellfish-free"])
        );
        assert!(locked_for(&sel(&["vegan"]), &RuleSet::legacy()).is_empty());
        assert!(locked_for(&sel(&["vegetarian", "dairy-free"]), &RuleSet::current()).is_empty());
    }

    #[test]
    fn test_toggle_on_and_off() {
        let rules = RuleSet::current();
        let res = applied(toggle(&Selection::new(), &Tag::Keto, &rules));
        assert_eq!(res.resolved, sel(&["keto"]));

        let res = applied(toggle(&res.resolved, &Tag::Keto, &rules));
        assert!(res.resolved.is_empty());
    }

    #[test]
    fn test_toggle_locked_tag_is_refused() {
        let rules = RuleSet::current();
        let vegan = applied(toggle(&Selection::new(), &Tag::Vegan, &rules)).resolved;
        assert_eq!(
            toggle(&vegan, &Tag::EggFree, &rules),
            Toggle::Locked(Tag::EggFree)
        );
    }

    #[test]
    fn test_toggle_disabled_tag_is_refused() {
        let rules = RuleSet::current();
        assert_eq!(
            toggle(&sel(&["vegan"]), &Tag::AddMeat, &rules),
            Toggle::Disabled(Tag::AddMeat)
        );
        assert_eq!(
            toggle(&sel(&["Whole30"]), &Tag::Vegan, &rules),
            Toggle::Disabled(Tag::Vegan)
        );
    }

    #[test]
    fn test_toggle_diet_style_replaces_previous() {
        let rules = RuleSet::current();
        let res = applied(toggle(&sel(&["omnivore", "add-meat"]), &Tag::Pescetarian, &rules));
        assert_eq!(res.resolved, sel(&["pescetarian"]));
        assert_eq!(
            res.adjustments.auto_unselected,
            vec![Tag::Omnivore, Tag::AddMeat]
        );
    }

    #[test]
    fn test_untoggling_vegan_unlocks_exclusions() {
        let rules = RuleSet::current();
        let vegan = applied(toggle(&Selection::new(), &Tag::Vegan, &rules)).resolved;
        let res = applied(toggle(&vegan, &Tag::Vegan, &rules));
        assert_eq!(
            res.resolved,
            sel(&["dairy-free", "egg-free", "fish-free", "shellfish-free"])
        );
        assert!(locked_for(&res.resolved, &rules).is_empty());
    }
}
