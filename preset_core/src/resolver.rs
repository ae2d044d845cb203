//! Conflict resolver for preset selections.
//!
//! Resolution applies the rule tables in a fixed order:
//! 1. Diet singularity (keep the highest-priority diet style)
//! 2. Diet-driven exclusions
//! 3. Exclusion/add-on reciprocity
//! 4. Macro/program reductions
//! 5. Implied additions
//! 6. Disabled set recomputed from the final selection
//!
//! The function is total: unknown tags pass through and are never touched.

use crate::predicates::disabled_for;
use crate::{Adjustments, Resolution, RuleSet, Selection};

/// Resolve a requested selection into an internally consistent one
pub fn resolve(selection: &Selection, rules: &RuleSet) -> Resolution {
    let mut working = selection.clone();
    let mut adjustments = Adjustments::default();

    enforce_single_diet(&mut working, rules, &mut adjustments);
    apply_diet_exclusions(&mut working, rules, &mut adjustments);
    apply_reciprocity(&mut working, rules, &mut adjustments);
    apply_reductions(&mut working, rules, &mut adjustments);
    apply_implied_additions(&mut working, rules, &mut adjustments);

    adjustments.auto_disabled = disabled_for(&working, rules);

    if !adjustments.is_empty() {
        tracing::debug!(
            "Resolved {} requested tags to {} (unselected: {:?}, added: {:?})",
            selection.len(),
            working.len(),
            adjustments.auto_unselected,
            adjustments.auto_added
        );
    }

    Resolution {
        resolved: working,
        adjustments,
    }
}

/// Step 1: at most one diet style survives, chosen by priority
fn enforce_single_diet(working: &mut Selection, rules: &RuleSet, adj: &mut Adjustments) {
    let Some(keep) = rules
        .diet_priority
        .iter()
        .find(|t| working.contains(t))
        .cloned()
    else {
        return;
    };

    for tag in &rules.diet_priority {
        if *tag != keep && working.remove(tag) {
            adj.auto_unselected.push(tag.clone());
        }
    }
}

/// Step 2: each present diet removes the tags it forbids
///
/// Triggers are checked against the set as it stands after step 1.
fn apply_diet_exclusions(working: &mut Selection, rules: &RuleSet, adj: &mut Adjustments) {
    let triggered: Vec<_> = rules
        .diet_exclusions
        .iter()
        .filter(|(trigger, _)| working.contains(trigger))
        .collect();

    for (_, forbidden) in triggered {
        for tag in forbidden {
            if working.remove(tag) {
                adj.auto_unselected.push(tag.clone());
            }
        }
    }
}

/// Step 3: an exclusion and its matching add-on cannot coexist
fn apply_reciprocity(working: &mut Selection, rules: &RuleSet, adj: &mut Adjustments) {
    for pair in &rules.reciprocity {
        if working.contains(&pair.exclusion) && working.remove(&pair.add_on) {
            adj.auto_unselected.push(pair.add_on.clone());
        }
    }
}

/// Step 4: keto subsumes low-carb, Whole30 overrides vegan
fn apply_reductions(working: &mut Selection, rules: &RuleSet, adj: &mut Adjustments) {
    for (kept, dropped) in &rules.reductions {
        if working.contains(kept) && working.remove(dropped) {
            adj.auto_unselected.push(dropped.clone());
        }
    }
}

/// Step 5: force-add the exclusions a trigger implies
fn apply_implied_additions(working: &mut Selection, rules: &RuleSet, adj: &mut Adjustments) {
    for (trigger, implied) in &rules.implied_additions {
        if !working.contains(trigger) {
            continue;
        }
        for tag in implied {
            if working.insert(tag.clone()) {
                adj.auto_added.push(tag.clone());
            }
        }
    }
}
