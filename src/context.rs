//! Editing context derived from the project's workflow stage.
//!
//! The context decides whether region mutations are allowed, which region
//! types the surface shows and which toolbar items are visible.

use serde::{Deserialize, Serialize};

use crate::model::{RegionType, TaskStatus, TaskType};

/// What kind of editing the current stage permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditingContext {
    /// Read-only.
    #[default]
    None,
    /// Place and tag dots.
    EditDot,
    /// Draw and tag rectangles.
    EditRect,
    /// Approve, reject or disable assets.
    Purify,
    /// Review purification results.
    Revise,
    /// Pixel-level strokes.
    Paint,
}

impl EditingContext {
    pub fn all() -> &'static [EditingContext] {
        &[
            EditingContext::None,
            EditingContext::EditDot,
            EditingContext::EditRect,
            EditingContext::Purify,
            EditingContext::Revise,
            EditingContext::Paint,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditingContext::None => "None",
            EditingContext::EditDot => "EditDot",
            EditingContext::EditRect => "EditRect",
            EditingContext::Purify => "Purify",
            EditingContext::Revise => "Revise",
            EditingContext::Paint => "Paint",
        }
    }
}

/// Context for a task type and status.
pub fn editing_context(task_type: TaskType, status: TaskStatus) -> EditingContext {
    if status == TaskStatus::Finished {
        return EditingContext::None;
    }
    match (task_type, status) {
        (TaskType::Cleansing, TaskStatus::InProgress) => EditingContext::Purify,
        (TaskType::Cleansing, TaskStatus::Review) => EditingContext::Revise,
        (TaskType::Annotation, TaskStatus::InProgress) => EditingContext::EditDot,
        (TaskType::Annotation, TaskStatus::Review) => EditingContext::EditRect,
        (TaskType::Evaluation, _) => EditingContext::EditRect,
        (TaskType::Segmentation, TaskStatus::InProgress | TaskStatus::Review) => EditingContext::Paint,
        _ => EditingContext::None,
    }
}

/// False exactly for [`EditingContext::None`].
pub fn is_mutation_allowed(context: EditingContext) -> bool {
    context != EditingContext::None
}

/// Region types the surface shows in a context.
pub fn visible_region_types(context: EditingContext) -> &'static [RegionType] {
    match context {
        EditingContext::None | EditingContext::EditDot => {
            &[RegionType::Point, RegionType::Rectangle, RegionType::Polygon]
        }
        EditingContext::EditRect => &[RegionType::Rectangle, RegionType::Polygon],
        EditingContext::Purify | EditingContext::Revise => RegionType::all(),
        EditingContext::Paint => &[RegionType::Polyline],
    }
}

/// Current context plus the checks built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextGate {
    context: EditingContext,
}

impl ContextGate {
    pub fn new(context: EditingContext) -> Self {
        Self { context }
    }

    pub fn for_stage(task_type: TaskType, status: TaskStatus) -> Self {
        Self::new(editing_context(task_type, status))
    }

    pub fn context(&self) -> EditingContext {
        self.context
    }

    /// Switch context. Returns true if it changed.
    pub fn set_context(&mut self, context: EditingContext) -> bool {
        if self.context == context {
            return false;
        }
        log::debug!("🔀 Editing context {} -> {}", self.context.name(), context.name());
        self.context = context;
        true
    }

    /// Check a mutation, logging the denial.
    pub fn allows(&self, operation: &str) -> bool {
        let allowed = is_mutation_allowed(self.context);
        if !allowed {
            log::debug!("🔒 {} ignored in context {}", operation, self.context.name());
        }
        allowed
    }

    pub fn shows(&self, region_type: RegionType) -> bool {
        visible_region_types(self.context).contains(&region_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: [TaskType; 5] = [
        TaskType::Cleansing,
        TaskType::Annotation,
        TaskType::Evaluation,
        TaskType::Segmentation,
        TaskType::NotAssigned,
    ];
    const STATUSES: [TaskStatus; 4] = [
        TaskStatus::New,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Finished,
    ];

    #[test]
    fn test_context_table() {
        use EditingContext as C;
        assert_eq!(editing_context(TaskType::Cleansing, TaskStatus::InProgress), C::Purify);
        assert_eq!(editing_context(TaskType::Cleansing, TaskStatus::Review), C::Revise);
        assert_eq!(editing_context(TaskType::Annotation, TaskStatus::InProgress), C::EditDot);
        assert_eq!(editing_context(TaskType::Annotation, TaskStatus::Review), C::EditRect);
        assert_eq!(editing_context(TaskType::Evaluation, TaskStatus::New), C::EditRect);
        assert_eq!(editing_context(TaskType::Segmentation, TaskStatus::Review), C::Paint);
        assert_eq!(editing_context(TaskType::Annotation, TaskStatus::New), C::None);
        assert_eq!(editing_context(TaskType::NotAssigned, TaskStatus::InProgress), C::None);
    }

    #[test]
    fn test_finished_is_read_only() {
        for task_type in TYPES {
            let ctx = editing_context(task_type, TaskStatus::Finished);
            assert_eq!(ctx, EditingContext::None);
            assert!(!is_mutation_allowed(ctx));
        }
    }

    #[test]
    fn test_gate_is_total() {
        for task_type in TYPES {
            for status in STATUSES {
                let ctx = editing_context(task_type, status);
                assert_eq!(is_mutation_allowed(ctx), ctx != EditingContext::None);
                assert!(!visible_region_types(ctx).is_empty());
            }
        }
    }

    #[test]
    fn test_visible_types() {
        let gate = ContextGate::new(EditingContext::EditRect);
        assert!(gate.shows(RegionType::Rectangle));
        assert!(!gate.shows(RegionType::Point));
        assert!(ContextGate::new(EditingContext::EditDot).shows(RegionType::Point));
        assert!(ContextGate::new(EditingContext::Revise).shows(RegionType::Polyline));
    }

    #[test]
    fn test_set_context_reports_change() {
        let mut gate = ContextGate::default();
        assert!(!gate.allows("draw"));
        assert!(gate.set_context(EditingContext::EditDot));
        assert!(!gate.set_context(EditingContext::EditDot));
        assert!(gate.allows("draw"));
    }
}
