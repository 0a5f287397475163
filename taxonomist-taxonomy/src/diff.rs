//! Field-level change sets between taxon snapshots

use taxonomist_core::{ChangeEntry, Taxon, TRACKED_FIELDS};

/// Compares taxon snapshots over the tracked fields.
///
/// Output follows the alphabetical order of [`TRACKED_FIELDS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxonDiffEngine;

impl TaxonDiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// Changes from `previous` to `current`.
    ///
    /// Without a previous snapshot every non-null field is reported as added;
    /// empty strings count as values.
    pub fn diff(&self, previous: Option<&Taxon>, current: &Taxon) -> Vec<ChangeEntry> {
        TRACKED_FIELDS
            .iter()
            .filter_map(|&field| {
                let new_value = current.field_value(field);
                match previous {
                    None if new_value.is_null() => None,
                    None => Some(ChangeEntry::added(field.name(), new_value)),
                    Some(previous) => {
                        let old_value = previous.field_value(field);
                        (old_value != new_value)
                            .then(|| ChangeEntry::changed(field.name(), old_value, new_value))
                    }
                }
            })
            .collect()
    }

    /// Changes recording the deletion of `previous`
    pub fn removal(&self, previous: &Taxon) -> Vec<ChangeEntry> {
        TRACKED_FIELDS
            .iter()
            .filter_map(|&field| {
                let old_value = previous.field_value(field);
                (!old_value.is_null()).then(|| ChangeEntry::removed(field.name(), old_value))
            })
            .collect()
    }
}
