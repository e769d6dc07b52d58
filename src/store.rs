//! Ordered region storage for the active asset.

use crate::model::{Region, RegionType};

/// Regions of a single asset in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    regions: Vec<Region>,
    /// Dirty flag - set whenever regions change.
    /// Cleared once the asset metadata has been flushed.
    dirty: bool,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with loaded regions. Starts clean.
    pub fn from_regions(regions: Vec<Region>) -> Self {
        Self {
            regions,
            dirty: false,
        }
    }

    /// Check if the store has been modified since last clear_dirty().
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Mutable access marks the store dirty.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Region> {
        let region = self.regions.iter_mut().find(|r| r.id == id);
        if region.is_some() {
            self.dirty = true;
        }
        region
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn to_vec(&self) -> Vec<Region> {
        self.regions.clone()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    /// Append a region. A region with the same id is replaced in place.
    pub fn push(&mut self, region: Region) {
        match self.index_of(&region.id) {
            Some(idx) => self.regions[idx] = region,
            None => self.regions.push(region),
        }
        self.mark_dirty();
    }

    /// Remove a region by id.
    pub fn remove(&mut self, id: &str) -> Option<Region> {
        let idx = self.index_of(id)?;
        self.mark_dirty();
        Some(self.regions.remove(idx))
    }

    /// Keep only regions matching the predicate. Returns the number removed.
    pub fn retain<F>(&mut self, f: F) -> usize
    where
        F: FnMut(&Region) -> bool,
    {
        let before = self.regions.len();
        self.regions.retain(f);
        let removed = before - self.regions.len();
        if removed > 0 {
            self.mark_dirty();
        }
        removed
    }

    /// Replace the whole region list.
    pub fn replace_all(&mut self, regions: Vec<Region>) {
        self.regions = regions;
        self.mark_dirty();
    }

    /// Replace stored regions that share an id with one of `updated`.
    /// Regions with unknown ids are ignored. Returns the number replaced.
    pub fn update(&mut self, updated: &[Region]) -> usize {
        let mut count = 0;
        for region in updated {
            if let Some(idx) = self.index_of(&region.id) {
                self.regions[idx] = region.clone();
                count += 1;
            }
        }
        if count > 0 {
            self.mark_dirty();
        }
        count
    }

    /// Remove every region.
    pub fn clear(&mut self) {
        if !self.regions.is_empty() {
            self.mark_dirty();
        }
        self.regions.clear();
    }

    pub fn untagged(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.is_tagged())
    }

    pub fn has_type(&self, region_type: RegionType) -> bool {
        self.regions.iter().any(|r| r.region_type == region_type)
    }
}
