//! Editable ordered lists seeded from preset text.

use crate::{FormError, FormResult};
use tourdesk_types::NonEmptyText;

/// Whether preset items may be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetPolicy {
    /// Presets are display-only; only items appended after them can be edited or removed.
    Locked,
    /// Every item, preset or not, can be edited or removed.
    #[default]
    Removable,
}

/// An ordered list of text items such as "tour fare includes".
///
/// Labels (`a`, `b`, ...) are computed from the live position and never stored, so they stay
/// contiguous after any sequence of operations.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableList {
    name: String,
    items: Vec<String>,
    preset_count: usize,
    policy: PresetPolicy,
    min_items: usize,
}

impl EditableList {
    pub fn from_presets(name: impl Into<String>, presets: &[&str], policy: PresetPolicy) -> Self {
        Self {
            name: name.into(),
            items: presets.iter().map(|p| p.to_string()).collect(),
            preset_count: presets.len(),
            policy,
            min_items: 0,
        }
    }

    /// Refuse removals that would leave fewer than `min_items` items.
    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn policy(&self) -> PresetPolicy {
        self.policy
    }

    pub fn is_preset(&self, index: usize) -> bool {
        index < self.preset_count
    }

    pub fn is_editable(&self, index: usize) -> bool {
        index < self.items.len()
            && (self.policy == PresetPolicy::Removable || !self.is_preset(index))
    }

    /// Appends `value` trimmed.
    ///
    /// # Errors
    ///
    /// Returns `FormError::BlankItem` if `value` is empty after trimming.
    pub fn append(&mut self, value: &str) -> FormResult<()> {
        let value = NonEmptyText::new(value).map_err(|_| FormError::BlankItem)?;
        self.items.push(value.into_inner());
        Ok(())
    }

    /// Replaces the item at `index` with `value` as given.
    pub fn edit(&mut self, index: usize, value: impl Into<String>) -> FormResult<()> {
        self.check_editable(index)?;
        self.items[index] = value.into();
        Ok(())
    }

    /// Removes and returns the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::LastItem` when the removal would go below the list minimum.
    pub fn remove(&mut self, index: usize) -> FormResult<String> {
        self.check_editable(index)?;
        if self.items.len() <= self.min_items {
            return Err(FormError::LastItem(self.name.clone()));
        }

        if index < self.preset_count {
            self.preset_count -= 1;
        }
        Ok(self.items.remove(index))
    }

    /// Replaces every item, e.g. when a draft is restored. Presets that survive at the front
    /// keep their preset status.
    pub fn replace_all(&mut self, items: Vec<String>) {
        self.preset_count = self.preset_count.min(items.len());
        self.items = items;
    }

    /// Items paired with their positional labels.
    pub fn labelled(&self) -> impl Iterator<Item = (String, &str)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (label(i), item.as_str()))
    }

    fn check_editable(&self, index: usize) -> FormResult<()> {
        if index >= self.items.len() {
            return Err(FormError::NoSuchItem(index));
        }
        if !self.is_editable(index) {
            return Err(FormError::PresetLocked(index));
        }
        Ok(())
    }
}

/// Positional label: `a`..`z`, then `aa`, `ab`, and so on.
pub fn label(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn includes(policy: PresetPolicy) -> EditableList {
        EditableList::from_presets("Tour fare includes", &["Airfare", "Hotel"], policy)
            .with_min_items(1)
    }

    fn labels(list: &EditableList) -> Vec<String> {
        list.labelled().map(|(label, _)| label).collect()
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(0), "a");
        assert_eq!(label(25), "z");
        assert_eq!(label(26), "aa");
        assert_eq!(label(27), "ab");
        assert_eq!(label(51), "az");
        assert_eq!(label(52), "ba");
        assert_eq!(label(26 + 26 * 26), "aaa");
    }

    #[test]
    fn test_append_trims_and_rejects_blank() {
        let mut list = includes(PresetPolicy::Removable);

        list.append("  Visa  ").unwrap();
        assert_eq!(list.get(2), Some("Visa"));

        assert!(matches!(list.append("   "), Err(FormError::BlankItem)));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_labels_stay_positional_after_edits() {
        let mut list = includes(PresetPolicy::Removable);
        list.append("Visa").unwrap();
        list.append("Insurance").unwrap();
        list.remove(1).unwrap();
        list.edit(0, "Return airfare").unwrap();
        list.remove(0).unwrap();
        list.append("Tips").unwrap();

        assert_eq!(labels(&list), vec!["a", "b", "c"]);
        assert_eq!(list.items(), ["Visa", "Insurance", "Tips"]);
    }

    #[test]
    fn test_locked_presets_cannot_change() {
        let mut list = includes(PresetPolicy::Locked);
        list.append("Visa").unwrap();

        assert!(matches!(list.edit(0, "x"), Err(FormError::PresetLocked(0))));
        assert!(matches!(list.remove(1), Err(FormError::PresetLocked(1))));
        assert!(!list.is_editable(0));

        list.edit(2, "Visa fees").unwrap();
        assert_eq!(list.remove(2).unwrap(), "Visa fees");
    }

    #[test]
    fn test_removable_presets_update_preset_count() {
        let mut list = includes(PresetPolicy::Removable);
        list.append("Visa").unwrap();

        list.remove(0).unwrap();
        assert!(list.is_preset(0));
        assert!(!list.is_preset(1));
    }

    #[test]
    fn test_last_item_cannot_be_removed() {
        let mut list = includes(PresetPolicy::Removable);
        list.remove(0).unwrap();

        let err = list.remove(0).unwrap_err();
        assert_eq!(err.to_string(), "Tour fare includes must contain at least 1 item");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut list = includes(PresetPolicy::Removable);
        assert!(matches!(list.edit(5, "x"), Err(FormError::NoSuchItem(5))));
        assert!(matches!(list.remove(2), Err(FormError::NoSuchItem(2))));
    }

    #[test]
    fn test_list_without_minimum_can_empty() {
        let mut terms = EditableList::from_presets("Special terms", &["A"], PresetPolicy::Removable);
        terms.remove(0).unwrap();
        assert!(terms.is_empty());
    }
}
