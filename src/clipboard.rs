//! Region clipboard and paste placement.

use std::cell::RefCell;

use thiserror::Error;

use crate::constants::PASTE_OFFSET;
use crate::error::{EngineError, EngineResult};
use crate::model::{BoundingBox, Region, Size, new_region_id};

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard content is not a region list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Channel regions are copied through, by value.
pub trait Clipboard {
    fn write_object(&self, regions: &[Region]) -> Result<(), ClipboardError>;

    /// The last written regions, or None if the clipboard is empty.
    fn read_object(&self) -> Result<Option<Vec<Region>>, ClipboardError>;
}

/// Process-local clipboard holding serialized JSON.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: RefCell<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put arbitrary text on the clipboard, as another application would.
    pub fn write_text(&self, text: impl Into<String>) {
        *self.content.borrow_mut() = Some(text.into());
    }
}

impl Clipboard for MemoryClipboard {
    fn write_object(&self, regions: &[Region]) -> Result<(), ClipboardError> {
        let json = serde_json::to_string(regions)?;
        *self.content.borrow_mut() = Some(json);
        Ok(())
    }

    fn read_object(&self) -> Result<Option<Vec<Region>>, ClipboardError> {
        match self.content.borrow().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }
}

fn clamp_into(bbox: &BoundingBox, bounds: Size) -> BoundingBox {
    let left = bbox.left.clamp(0.0, (bounds.width - bbox.width).max(0.0));
    let top = bbox.top.clamp(0.0, (bounds.height - bbox.height).max(0.0));
    BoundingBox::new(left, top, bbox.width, bbox.height)
}

/// Duplicate `regions` with fresh ids at free positions inside `bounds`.
///
/// Each copy is moved in steps of `offset` along the diagonal until it no
/// longer coincides with an existing region, an original, or an earlier copy.
/// When clamping to the bounds pins the copy, the search walks the opposite
/// way.
pub fn duplicate_regions_and_move(
    regions: &[Region],
    existing: &[Region],
    bounds: Size,
    offset: f64,
) -> EngineResult<Vec<Region>> {
    let offset = if offset.is_finite() && offset > 0.0 {
        offset
    } else {
        log::warn!("⚠️ Unusable paste offset {}, using {}", offset, PASTE_OFFSET);
        PASTE_OFFSET
    };
    let mut occupied: Vec<BoundingBox> = existing
        .iter()
        .chain(regions.iter())
        .map(|r| r.bounding_box)
        .collect();
    let max_steps = ((bounds.width.max(bounds.height) / offset.max(1.0)).ceil() as usize) + 1;
    let mut pasted = Vec::with_capacity(regions.len());

    for region in regions {
        let bbox = region.bounding_box;
        if bbox.width > bounds.width || bbox.height > bounds.height {
            return Err(EngineError::paste_too_big(&region.id));
        }
        let placed = [1.0, -1.0].iter().find_map(|direction| {
            let mut previous: Option<BoundingBox> = None;
            for step in 1..=max_steps {
                let delta = direction * offset * step as f64;
                let candidate = clamp_into(&bbox.translated(delta, delta), bounds);
                if previous.is_some_and(|p| p.approx_eq(&candidate)) {
                    // pinned against the bounds
                    return None;
                }
                previous = Some(candidate);
                if !occupied.iter().any(|o| o.approx_eq(&candidate)) {
                    return Some(candidate);
                }
            }
            None
        });
        let Some(target) = placed else {
            return Err(EngineError::paste_too_big(&region.id));
        };

        let mut copy = region.translated(target.left - bbox.left, target.top - bbox.top);
        copy.id = new_region_id();
        occupied.push(copy.bounding_box);
        pasted.push(copy);
    }
    Ok(pasted)
}
