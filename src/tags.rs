//! Tag and attribute synchronization between regions and project definitions.

use std::collections::BTreeMap;

use crate::model::{AssetMetadata, AttributeKey, Project, Region};
use crate::surface::{TagDescriptor, TagsDescriptor};

// ============================================================================
// Tag transformers
// ============================================================================

/// Remove `tag` if present, otherwise append it.
pub fn toggle_tag(tags: &[String], tag: &str) -> Vec<String> {
    if tags.iter().any(|t| t == tag) {
        tags.iter().filter(|t| *t != tag).cloned().collect()
    } else {
        let mut out = tags.to_vec();
        out.push(tag.to_string());
        out
    }
}

/// Single-tag mode: the region carries `tag` alone, or nothing if it already had it.
pub fn toggle_single_tag(tags: &[String], tag: &str) -> Vec<String> {
    if tags.iter().any(|t| t == tag) {
        Vec::new()
    } else {
        vec![tag.to_string()]
    }
}

pub fn add_if_missing(tags: &[String], tag: &str) -> Vec<String> {
    let mut out = tags.to_vec();
    if !tag.is_empty() && !out.iter().any(|t| t == tag) {
        out.push(tag.to_string());
    }
    out
}

pub fn remove_if_contained(tags: &[String], tag: &str) -> Vec<String> {
    tags.iter().filter(|t| *t != tag).cloned().collect()
}

/// Append every tag of `add` the list does not already hold, keeping order.
pub fn add_all_if_missing(tags: &[String], add: &[String]) -> Vec<String> {
    add.iter().fold(tags.to_vec(), |acc, t| add_if_missing(&acc, t))
}

/// How a tag click rewrites the tags of the selected regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTransform {
    ToggleSingle,
    Toggle,
    AddIfMissing,
    RemoveIfContained,
}

impl TagTransform {
    /// Pick the transform for a click on `tag`.
    pub fn select(single_tag_mode: bool, locked: &LockedTags, tag: &str) -> Self {
        if single_tag_mode {
            TagTransform::ToggleSingle
        } else if locked.is_empty() {
            TagTransform::Toggle
        } else if locked.contains(tag) {
            TagTransform::AddIfMissing
        } else {
            TagTransform::RemoveIfContained
        }
    }

    pub fn apply(&self, tags: &[String], tag: &str) -> Vec<String> {
        match self {
            TagTransform::ToggleSingle => toggle_single_tag(tags, tag),
            TagTransform::Toggle => toggle_tag(tags, tag),
            TagTransform::AddIfMissing => add_if_missing(tags, tag),
            TagTransform::RemoveIfContained => remove_if_contained(tags, tag),
        }
    }
}

/// Tags applied automatically to new and newly selected regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedTags {
    tags: Vec<String>,
}

impl LockedTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut locked = Self::new();
        for name in names {
            let name = name.into();
            if !locked.contains(&name) {
                locked.tags.push(name);
            }
        }
        locked
    }

    /// Toggle a tag in the lock set. Returns true if it is now locked.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.contains(tag) {
            self.tags.retain(|t| t != tag);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    /// Rename a locked tag. Merges into `to` when that is already locked.
    pub fn rename(&mut self, from: &str, to: &str) {
        if self.contains(to) {
            self.remove(from);
            return;
        }
        for t in self.tags.iter_mut().filter(|t| *t == from) {
            *t = to.to_string();
        }
    }

    pub fn remove(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

/// Rewrite the tags of every region with the transform picked for `tag`.
///
/// Returns false without touching anything for an empty selection, or for an
/// empty tag with nothing locked.
pub fn apply_tag_to_regions(regions: &mut [Region], tag: &str, locked: &LockedTags, single_tag_mode: bool) -> bool {
    if regions.is_empty() || (tag.is_empty() && locked.is_empty()) {
        return false;
    }
    let transform = TagTransform::select(single_tag_mode, locked, tag);
    for region in regions.iter_mut() {
        region.tags = transform.apply(&region.tags, tag);
    }
    true
}

/// Set an attribute on every region. Only exact project key names are accepted.
pub fn apply_attribute(regions: &mut [Region], keys: &[AttributeKey], key: &str, value: &str) -> bool {
    if regions.is_empty() || !keys.iter().any(|k| k.name == key) {
        return false;
    }
    for region in regions.iter_mut() {
        region.attributes.insert(key.to_string(), value.to_string());
    }
    true
}

/// Attribute map with every project key set to an empty value.
pub fn default_attributes(keys: &[AttributeKey]) -> BTreeMap<String, String> {
    keys.iter().map(|k| (k.name.clone(), String::new())).collect()
}

/// Rename a tag on every region. Returns true if any region changed.
pub fn rename_tag_in_regions(regions: &mut [Region], from: &str, to: &str) -> bool {
    let mut changed = false;
    for region in regions.iter_mut().filter(|r| r.has_tag(from)) {
        if region.has_tag(to) {
            region.remove_tag(from);
        } else {
            for t in region.tags.iter_mut().filter(|t| *t == from) {
                *t = to.to_string();
            }
        }
        changed = true;
    }
    changed
}

/// Remove a tag from every region. Returns true if any region changed.
pub fn delete_tag_in_regions(regions: &mut [Region], tag: &str) -> bool {
    let mut changed = false;
    for region in regions.iter_mut() {
        changed |= region.remove_tag(tag);
    }
    changed
}

/// Rename across one asset. Returns true if the asset needs saving.
pub fn rename_tag_in_metadata(metadata: &mut AssetMetadata, from: &str, to: &str) -> bool {
    rename_tag_in_regions(&mut metadata.regions, from, to)
}

/// Delete across one asset. Returns true if the asset needs saving.
pub fn delete_tag_in_metadata(metadata: &mut AssetMetadata, tag: &str) -> bool {
    delete_tag_in_regions(&mut metadata.regions, tag)
}

/// Tag names used by regions that the project does not define, in first-seen order.
pub fn stale_tags(regions: &[Region], project: &Project) -> Vec<String> {
    let mut stale: Vec<String> = Vec::new();
    for tag in regions.iter().flat_map(|r| r.tags.iter()) {
        if !project.has_tag(tag) && !stale.contains(tag) {
            stale.push(tag.clone());
        }
    }
    stale
}

/// Resolve a region's tags to colored descriptors, skipping stale names.
pub fn tags_descriptor(region: &Region, project: &Project) -> TagsDescriptor {
    TagsDescriptor {
        tags: region
            .tags
            .iter()
            .filter_map(|name| project.tag(name))
            .map(|t| TagDescriptor {
                name: t.name.clone(),
                color: t.color.clone(),
            })
            .collect(),
    }
}
