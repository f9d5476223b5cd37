//! Risk-factor checklist models.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog construction errors.
#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate checklist item id: {0}")]
    DuplicateItem(String),

    #[error("Group {0} appears more than once")]
    DuplicateGroup(RiskFactorGroup),
}

/// Severity tier of a checklist item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskFactorGroup {
    #[serde(rename = "group1")]
    OnePoint,
    #[serde(rename = "group2")]
    TwoPoint,
    #[serde(rename = "group3")]
    ThreePoint,
    #[serde(rename = "group5")]
    FivePoint,
}

impl RiskFactorGroup {
    pub const ALL: [RiskFactorGroup; 4] = [
        RiskFactorGroup::OnePoint,
        RiskFactorGroup::TwoPoint,
        RiskFactorGroup::ThreePoint,
        RiskFactorGroup::FivePoint,
    ];

    /// Points every item in this tier contributes.
    pub fn points(self) -> u32 {
        match self {
            RiskFactorGroup::OnePoint => 1,
            RiskFactorGroup::TwoPoint => 2,
            RiskFactorGroup::ThreePoint => 3,
            RiskFactorGroup::FivePoint => 5,
        }
    }

    /// Stable key used by the checklist form (`group1`, `group2`, ...).
    pub fn key(self) -> &'static str {
        match self {
            RiskFactorGroup::OnePoint => "group1",
            RiskFactorGroup::TwoPoint => "group2",
            RiskFactorGroup::ThreePoint => "group3",
            RiskFactorGroup::FivePoint => "group5",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.key() == key)
    }
}

impl fmt::Display for RiskFactorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single checklist entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFactorItem {
    /// Stable identifier, unique across the whole catalog
    pub id: String,
    /// Label shown next to the checkbox
    pub label: String,
}

impl RiskFactorItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// One severity tier with its items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogGroup {
    pub group: RiskFactorGroup,
    /// Section heading for the checklist
    pub title: String,
    pub items: Vec<RiskFactorItem>,
}

/// Ordered checklist of weighted risk factors.
///
/// Item ids are unique across all groups, so an id alone identifies its group.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiskFactorCatalog {
    groups: Vec<CatalogGroup>,
}

impl RiskFactorCatalog {
    /// Build a catalog, rejecting repeated groups or item ids.
    pub fn new(groups: Vec<CatalogGroup>) -> Result<Self, CatalogError> {
        let mut seen_groups = HashSet::new();
        let mut seen_items = HashSet::new();
        for group in &groups {
            if !seen_groups.insert(group.group) {
                return Err(CatalogError::DuplicateGroup(group.group));
            }
            for item in &group.items {
                if !seen_items.insert(item.id.as_str()) {
                    return Err(CatalogError::DuplicateItem(item.id.clone()));
                }
            }
        }
        Ok(Self { groups })
    }

    /// Wrap groups already known to be valid (the built-in reference data).
    pub(crate) fn from_trusted(groups: Vec<CatalogGroup>) -> Self {
        debug_assert!(Self::new(groups.clone()).is_ok());
        Self { groups }
    }

    pub fn groups(&self) -> &[CatalogGroup] {
        &self.groups
    }

    /// Find an item and the group it belongs to.
    pub fn find_item(&self, item_id: &str) -> Option<(RiskFactorGroup, &RiskFactorItem)> {
        self.groups.iter().find_map(|g| {
            g.items
                .iter()
                .find(|item| item.id == item_id)
                .map(|item| (g.group, item))
        })
    }

    /// Points for a selection, or `None` when the pair is not in the catalog.
    pub fn points_for(&self, selection: &Selection) -> Option<u32> {
        match self.find_item(&selection.item_id) {
            Some((group, _)) if group == selection.group => Some(group.points()),
            _ => None,
        }
    }

    /// Iterate all item ids in catalog order.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter().map(|item| item.id.as_str()))
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// A checked checklist box: (group, item id).
///
/// Deserializes from `{"group": "group1", "item": "swollen"}` or from the
/// form's concatenated key `"group1_swollen"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "SelectionRepr")]
pub struct Selection {
    pub group: RiskFactorGroup,
    #[serde(rename = "item")]
    pub item_id: String,
}

impl Selection {
    pub fn new(group: RiskFactorGroup, item_id: impl Into<String>) -> Self {
        Self {
            group,
            item_id: item_id.into(),
        }
    }

    /// Parse the form's concatenated key, e.g. `group1_bed_rest_minor`.
    ///
    /// Only the first underscore separates group from item; item ids may
    /// contain underscores themselves.
    pub fn parse_legacy_key(key: &str) -> Option<Self> {
        let (group, item_id) = key.split_once('_')?;
        if item_id.is_empty() {
            return None;
        }
        Some(Self::new(RiskFactorGroup::from_key(group)?, item_id))
    }

    pub fn legacy_key(&self) -> String {
        format!("{}_{}", self.group.key(), self.item_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    Keyed { group: RiskFactorGroup, item: String },
    Legacy(String),
}

impl TryFrom<SelectionRepr> for Selection {
    type Error = String;

    fn try_from(repr: SelectionRepr) -> Result<Self, Self::Error> {
        match repr {
            SelectionRepr::Keyed { group, item } => Ok(Selection::new(group, item)),
            SelectionRepr::Legacy(key) => Selection::parse_legacy_key(&key)
                .ok_or_else(|| format!("unrecognised checklist key: {:?}", key)),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.item_id)
    }
}

/// The set of checklist boxes currently ticked. Anything absent is unticked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RiskFactorSelections {
    selected: BTreeSet<Selection>,
}

impl RiskFactorSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick a box. Returns `false` when it was already ticked.
    pub fn select(&mut self, selection: Selection) -> bool {
        self.selected.insert(selection)
    }

    pub fn deselect(&mut self, selection: &Selection) -> bool {
        self.selected.remove(selection)
    }

    /// Flip a box, returning its new state.
    pub fn toggle(&mut self, selection: Selection) -> bool {
        if self.is_selected(&selection) {
            self.deselect(&selection);
            false
        } else {
            self.select(selection)
        }
    }

    pub fn is_selected(&self, selection: &Selection) -> bool {
        self.selected.contains(selection)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl FromIterator<Selection> for RiskFactorSelections {
    fn from_iter<I: IntoIterator<Item = Selection>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}
