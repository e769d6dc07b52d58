//! Toolbar item registry.
//!
//! Items declare the contexts they appear in and their keyboard
//! accelerators. The registry is a plain value owned by the session.

use crate::context::EditingContext;
use crate::error::{EngineError, EngineResult};

/// Identifies a toolbar item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarItemName {
    SelectCanvas,
    DrawRectangle,
    DrawPoint,
    DrawPolygon,
    SubmitPoints,
    PreviousAsset,
    NextAsset,
    Approve,
    Reject,
    Disable,
    Comment,
    Complete,
    CopyRegions,
    CutRegions,
    PasteRegions,
    RemoveAllRegions,
    ResetZoom,
    SaveProject,
}

impl ToolbarItemName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolbarItemName::SelectCanvas => "selectCanvas",
            ToolbarItemName::DrawRectangle => "drawRectangle",
            ToolbarItemName::DrawPoint => "drawPoint",
            ToolbarItemName::DrawPolygon => "drawPolygon",
            ToolbarItemName::SubmitPoints => "submitPoints",
            ToolbarItemName::PreviousAsset => "previousAsset",
            ToolbarItemName::NextAsset => "nextAsset",
            ToolbarItemName::Approve => "approve",
            ToolbarItemName::Reject => "reject",
            ToolbarItemName::Disable => "disable",
            ToolbarItemName::Comment => "comment",
            ToolbarItemName::Complete => "completeRevision",
            ToolbarItemName::CopyRegions => "copyRegions",
            ToolbarItemName::CutRegions => "cutRegions",
            ToolbarItemName::PasteRegions => "pasteRegions",
            ToolbarItemName::RemoveAllRegions => "removeAllRegions",
            ToolbarItemName::ResetZoom => "resetZoom",
            ToolbarItemName::SaveProject => "saveProject",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarGroup {
    Canvas,
    Regions,
    Navigation,
    Project,
}

/// State items stay selected (tools); actions fire once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItemKind {
    State,
    Action,
}

/// One registered toolbar entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarItem {
    pub name: ToolbarItemName,
    pub tooltip: String,
    pub icon: String,
    pub group: ToolbarGroup,
    pub kind: ToolbarItemKind,
    pub accelerators: Vec<String>,
    pub contexts: Vec<EditingContext>,
}

impl ToolbarItem {
    pub fn new(
        name: ToolbarItemName,
        tooltip: &str,
        icon: &str,
        group: ToolbarGroup,
        kind: ToolbarItemKind,
        accelerators: &[&str],
        contexts: &[EditingContext],
    ) -> Self {
        Self {
            name,
            tooltip: tooltip.to_string(),
            icon: icon.to_string(),
            group,
            kind,
            accelerators: accelerators.iter().map(|a| a.to_string()).collect(),
            contexts: contexts.to_vec(),
        }
    }

    pub fn is_visible_in(&self, context: EditingContext) -> bool {
        self.contexts.contains(&context)
    }

    pub fn responds_to(&self, accelerator: &str) -> bool {
        self.accelerators.iter().any(|a| a == accelerator)
    }
}

/// Ordered set of toolbar items.
#[derive(Debug, Clone, Default)]
pub struct ToolbarRegistry {
    items: Vec<ToolbarItem>,
}

impl ToolbarRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding [`ToolbarRegistry::default_items`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for item in Self::default_items() {
            if let Err(e) = registry.register(item) {
                log::warn!("⚠️ Skipping toolbar item: {}", e);
            }
        }
        registry
    }

    /// Register an item.
    ///
    /// Fails when an accelerator is already bound to another item in a
    /// context both items share. Re-registering a name replaces it.
    pub fn register(&mut self, item: ToolbarItem) -> EngineResult<()> {
        for existing in self.items.iter().filter(|i| i.name != item.name) {
            let shares_context = existing.contexts.iter().any(|c| item.contexts.contains(c));
            if !shares_context {
                continue;
            }
            if let Some(acc) = item.accelerators.iter().find(|a| existing.responds_to(a)) {
                return Err(EngineError::OverloadedKeyBinding {
                    accelerator: acc.clone(),
                    existing: existing.name.as_str().to_string(),
                });
            }
        }
        match self.items.iter_mut().find(|i| i.name == item.name) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
        Ok(())
    }

    pub fn items(&self) -> &[ToolbarItem] {
        &self.items
    }

    pub fn get(&self, name: ToolbarItemName) -> Option<&ToolbarItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Items shown in a context, in registration order.
    pub fn visible_items(&self, context: EditingContext) -> Vec<&ToolbarItem> {
        self.items.iter().filter(|i| i.is_visible_in(context)).collect()
    }

    /// The item an accelerator triggers in a context.
    pub fn item_for_accelerator(&self, context: EditingContext, accelerator: &str) -> Option<&ToolbarItem> {
        self.items
            .iter()
            .find(|i| i.is_visible_in(context) && i.responds_to(accelerator))
    }

    /// Stock registrations.
    pub fn default_items() -> Vec<ToolbarItem> {
        use EditingContext::{EditDot, EditRect, Paint, Purify, Revise};
        use ToolbarGroup::*;
        use ToolbarItemKind::*;
        use ToolbarItemName as N;

        let editing = [EditDot, EditRect, Purify, Revise, Paint];
        let region_editing = [EditDot, EditRect, Revise, Paint];

        vec![
            ToolbarItem::new(N::SelectCanvas, "Select", "fa-mouse-pointer", Canvas, State, &["V", "v"], &[EditDot, EditRect, Revise, Paint]),
            ToolbarItem::new(N::DrawRectangle, "Draw rectangle", "fa-vector-square", Canvas, State, &["R", "r"], &[EditRect]),
            ToolbarItem::new(N::DrawPolygon, "Draw polygon", "fa-draw-polygon", Canvas, State, &["G", "g"], &[EditRect]),
            ToolbarItem::new(N::DrawPoint, "Draw point", "fa-dot-circle", Canvas, State, &["D", "d"], &[EditDot]),
            ToolbarItem::new(N::SubmitPoints, "Submit points", "fas fa-upload", Canvas, Action, &["P", "p"], &[EditDot]),
            ToolbarItem::new(N::Approve, "Approve", "fas fa-check", Canvas, Action, &["A", "a"], &[Purify, Revise]),
            ToolbarItem::new(N::Reject, "Reject", "fas fa-times", Canvas, Action, &["R", "r"], &[Purify, Revise]),
            ToolbarItem::new(N::Disable, "Disable", "fas fa-ban", Canvas, Action, &["Z", "z"], &[Purify]),
            ToolbarItem::new(N::Comment, "Comment", "fas fa-comment-dots", Canvas, Action, &["X", "x"], &[Purify, Revise]),
            ToolbarItem::new(N::Complete, "Complete revision", "fas fa-user-check", Canvas, Action, &["C", "c"], &[EditRect, Revise]),
            ToolbarItem::new(N::CopyRegions, "Copy regions", "fa-copy", Regions, Action, &["CmdOrCtrl+C", "CmdOrCtrl+c"], &region_editing),
            ToolbarItem::new(N::CutRegions, "Cut regions", "fa-cut", Regions, Action, &["CmdOrCtrl+X", "CmdOrCtrl+x"], &region_editing),
            ToolbarItem::new(N::PasteRegions, "Paste regions", "fa-paste", Regions, Action, &["CmdOrCtrl+V", "CmdOrCtrl+v"], &region_editing),
            ToolbarItem::new(N::RemoveAllRegions, "Remove all regions", "fa-trash", Regions, Action, &["CmdOrCtrl+Delete", "CmdOrCtrl+Backspace"], &region_editing),
            ToolbarItem::new(N::PreviousAsset, "Previous asset", "fas fa-arrow-circle-up", Navigation, Action, &["ArrowUp", "W", "w"], &editing),
            ToolbarItem::new(N::NextAsset, "Next asset", "fas fa-arrow-circle-down", Navigation, Action, &["ArrowDown", "S", "s"], &editing),
            ToolbarItem::new(N::ResetZoom, "Reset zoom", "fa-search", Navigation, Action, &["CmdOrCtrl+0"], &editing),
            ToolbarItem::new(N::SaveProject, "Save project", "fa-save", Project, Action, &["CmdOrCtrl+S", "CmdOrCtrl+s"], &editing),
        ]
    }
}
