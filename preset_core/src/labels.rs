//! Display labels for tags and adjustment notices.

use crate::{Adjustments, PresetGroup, Tag};

/// Human-readable label for a tag
///
/// Programs keep their proper names, a few tags have explicit labels, and
/// everything else is capitalised with hyphens turned into spaces.
pub fn label_for(tag: &Tag) -> String {
    if tag.group() == Some(PresetGroup::Programs) {
        return tag.as_str().to_string();
    }

    match tag {
        Tag::AddMeat => "Add meat".to_string(),
        Tag::AddFish => "Add fish".to_string(),
        Tag::AddDairy => "Add dairy".to_string(),
        Tag::PlantBased => "Plant-based".to_string(),
        other => humanize(other.as_str()),
    }
}

fn humanize(id: &str) -> String {
    let spaced = id.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Advisory lines describing what the resolver changed
///
/// Returns one line per non-empty adjustment list, e.g.
/// `auto-unselected: Pescetarian, Add meat`.
pub fn format_adjustments(adjustments: &Adjustments) -> Vec<String> {
    let mut lines = Vec::new();

    if !adjustments.auto_unselected.is_empty() {
        lines.push(format!(
            "auto-unselected: {}",
            join_labels(&adjustments.auto_unselected)
        ));
    }
    if !adjustments.auto_added.is_empty() {
        lines.push(format!("auto-added: {}", join_labels(&adjustments.auto_added)));
    }
    if !adjustments.auto_disabled.is_empty() {
        lines.push(format!(
            "disabled: {}",
            join_labels(&adjustments.auto_disabled)
        ));
    }

    lines
}

fn join_labels<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> String {
    tags.into_iter().map(label_for).collect::<Vec<_>>().join(", ")
}
