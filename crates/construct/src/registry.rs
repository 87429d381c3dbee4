//! The stylesheet registry: one record per constructed sheet, keyed by the
//! native sheet's identity, plus the side table of legacy-compatibility
//! locations.

use crate::compat::CompatLocation;
use dom::{CssStyleSheet, SheetId, SheetOp, StyleElement};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Everything the engine tracks for one constructed stylesheet.
pub struct SheetRecord {
    /// Surfaces currently displaying this sheet's content, in insertion
    /// order. Written by the adoption subsystem, read here.
    pub adopters: SmallVec<StyleElement, 4>,
    /// Append-only log of mutating operations, the replay source for late
    /// adopters. Never pruned or rewritten by this engine.
    pub actions: Vec<SheetOp>,
    /// Hidden element whose native sheet this record describes; holds the
    /// source-of-truth content.
    pub backing_element: StyleElement,
}

impl SheetRecord {
    pub(crate) fn new(backing_element: StyleElement) -> Self {
        Self {
            adopters: SmallVec::new(),
            actions: Vec::new(),
            backing_element,
        }
    }
}

/// Associative store keyed by sheet identity. A sheet is a key here iff it
/// came out of the construction path; no eviction.
#[derive(Default)]
pub struct SheetRegistry {
    records: HashMap<SheetId, SheetRecord>,
}

impl SheetRegistry {
    pub fn has(&self, sheet: &CssStyleSheet) -> bool {
        self.records.contains_key(&sheet.id())
    }

    pub fn get(&self, sheet: &CssStyleSheet) -> Option<&SheetRecord> {
        self.records.get(&sheet.id())
    }

    pub fn get_mut(&mut self, sheet: &CssStyleSheet) -> Option<&mut SheetRecord> {
        self.records.get_mut(&sheet.id())
    }

    pub(crate) fn insert(&mut self, id: SheetId, record: SheetRecord) {
        self.records.insert(id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 0-or-1 compatibility location per constructed sheet; populated by the
/// adoption subsystem when the legacy layer is active.
#[derive(Default)]
pub struct CompatRegistry {
    locations: HashMap<SheetId, CompatLocation>,
}

impl CompatRegistry {
    pub fn get(&self, id: SheetId) -> Option<CompatLocation> {
        self.locations.get(&id).cloned()
    }

    pub(crate) fn insert(&mut self, id: SheetId, location: CompatLocation) {
        self.locations.insert(id, location);
    }
}

#[cfg(test)]
mod tests {
    use super::{SheetRecord, SheetRegistry};
    use dom::Document;

    #[test]
    fn keyed_by_identity_not_content() {
        let document = Document::new();
        let first = document.create_style_element();
        let second = document.create_style_element();
        let first_sheet = document.append_to_frame_body(&first);
        let second_sheet = document.append_to_frame_body(&second);

        let mut registry = SheetRegistry::default();
        registry.insert(first_sheet.id(), SheetRecord::new(first.clone()));

        assert!(registry.has(&first_sheet));
        assert!(!registry.has(&second_sheet), "same (empty) content must not match");
        assert_eq!(registry.len(), 1);
    }
}
