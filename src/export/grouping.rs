//! Partitioning catalogs into sprite sheet groups
//!
//! Two policies:
//! - Prefix: flat names grouped by their first character
//! - Cross product: one group per outer value, one slot per inner value

use std::collections::BTreeMap;
use std::path::{Component, Path};

/// Identifies the sprite sheet an image belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Flat catalog: leading character of the name (case-sensitive)
    Prefix(char),
    /// Two-level catalog: outer group and inner item
    Cross { group: String, item: String },
}

impl GroupKey {
    /// Name of the sheet file (without extension)
    pub fn sheet_name(&self) -> String {
        match self {
            GroupKey::Prefix(letter) => letter.to_string(),
            GroupKey::Cross { group, .. } => group.clone(),
        }
    }

    /// Whether two keys share a sprite sheet
    pub fn same_sheet(&self, other: &GroupKey) -> bool {
        match (self, other) {
            (GroupKey::Prefix(a), GroupKey::Prefix(b)) => a == b,
            (GroupKey::Cross { group: a, .. }, GroupKey::Cross { group: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// First character of a name, if any
pub fn leading_char(name: &str) -> Option<char> {
    name.chars().next()
}

/// Whether a name can be joined onto a folder without leaving it
///
/// Rejects empty names, separators of either platform, `.` and `..`.
pub fn is_plain_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Count names per leading character
pub fn prefix_counts<S: AsRef<str>>(names: &[S]) -> BTreeMap<char, u32> {
    let mut counts = BTreeMap::new();
    for name in names {
        if let Some(letter) = leading_char(name.as_ref()) {
            *counts.entry(letter).or_insert(0) += 1;
        }
    }
    counts
}

/// Flat catalog ordered and counted ahead of the export pass
///
/// Names are sorted ordinally so each leading character forms exactly one
/// contiguous run, and every run's size is known before its canvas exists.
#[derive(Debug, Clone)]
pub struct PrefixPlan {
    names: Vec<String>,
    counts: BTreeMap<char, u32>,
}

impl PrefixPlan {
    /// Sort and count a catalog. Empty names are dropped.
    pub fn new(mut names: Vec<String>) -> Self {
        let before = names.len();
        names.retain(|name| !name.is_empty());
        if names.len() != before {
            log::warn!("Dropped {} unnamed catalog entries", before - names.len());
        }
        names.sort();

        let counts = prefix_counts(&names[..]);
        Self { names, counts }
    }

    /// Names in export order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Slots needed for a letter's sheet
    pub fn tile_count(&self, letter: char) -> u32 {
        self.counts.get(&letter).copied().unwrap_or(0)
    }

    /// Number of distinct leading characters
    pub fn group_count(&self) -> usize {
        self.counts.len()
    }
}

/// Fixed two-level taxonomy: every group gets a slot for every item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossProduct {
    groups: Vec<String>,
    items: Vec<String>,
}

impl CrossProduct {
    pub fn new(groups: Vec<String>, items: Vec<String>) -> Self {
        Self { groups, items }
    }

    /// Outer values, one sheet each
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Inner values, one slot each
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Slots per sheet, present or not
    pub fn tile_count(&self) -> u32 {
        self.items.len() as u32
    }

    /// Items paired with their fixed slot index
    pub fn slots(&self) -> impl Iterator<Item = (u32, &str)> {
        self.items
            .iter()
            .enumerate()
            .map(|(slot, item)| (slot as u32, item.as_str()))
    }

    /// Group key for a cell
    pub fn key_of(&self, group: &str, item: &str) -> GroupKey {
        GroupKey::Cross {
            group: group.to_string(),
            item: item.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefix_counts() {
        let counts = prefix_counts(&["Add", "Add_16x", "Box"][..]);
        assert_eq!(counts.get(&'A'), Some(&2));
        assert_eq!(counts.get(&'B'), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_plain_names() {
        assert!(is_plain_name("Add_16x"));
        assert!(is_plain_name("a.b"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name("."));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("../x"));
        assert!(!is_plain_name("a/b"));
        assert!(!is_plain_name("a\\b"));
        assert!(!is_plain_name("/abs"));
    }

    #[test]
    fn test_plan_sorts_ordinally() {
        let plan = PrefixPlan::new(names(&["Box", "axe", "Add", "Bell"]));
        assert_eq!(plan.names(), &names(&["Add", "Bell", "Box", "axe"])[..]);
        assert_eq!(plan.tile_count('B'), 2);
        assert_eq!(plan.tile_count('a'), 1);
        assert_eq!(plan.group_count(), 3);
    }

    #[test]
    fn test_empty_names_dropped() {
        let plan = PrefixPlan::new(names(&["", "Add"]));
        assert_eq!(plan.names().len(), 1);
        assert_eq!(plan.tile_count('A'), 1);
        assert_eq!(plan.tile_count('Z'), 0);
    }

    #[test]
    fn test_empty_catalog() {
        let plan = PrefixPlan::new(Vec::new());
        assert!(plan.names().is_empty());
        assert_eq!(plan.group_count(), 0);
    }

    #[test]
    fn test_cross_product_slots_are_fixed() {
        let cross = CrossProduct::new(names(&["Error", "Warning"]), names(&["Small", "Large"]));
        assert_eq!(cross.tile_count(), 2);
        let slots: Vec<_> = cross.slots().collect();
        assert_eq!(slots, vec![(0, "Small"), (1, "Large")]);
    }

    #[test]
    fn test_key_sheet_names() {
        let cross = CrossProduct::new(names(&["Error"]), names(&["Small"]));
        let a = cross.key_of("Error", "Small");
        let b = cross.key_of("Error", "Large");
        assert_eq!(a.sheet_name(), "Error");
        assert!(a.same_sheet(&b));
        assert!(!a.same_sheet(&GroupKey::Prefix('E')));
        assert_eq!(GroupKey::Prefix('x').sheet_name(), "x");
    }
}
