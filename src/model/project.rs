//! Project-level definitions: tags, attribute keys, workflow stage and
//! collaborator settings.
//!
//! The engine treats these as read-only inputs except for tag rename and
//! delete, which rewrite the definition list.

use serde::{Deserialize, Serialize};

/// A tag definition with a display color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique name of the tag
    pub name: String,
    /// CSS-style color string, e.g. `#ff0000`
    pub color: String,
}

impl Tag {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// A region attribute key. Values live on the regions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AttributeKey {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl AttributeKey {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Kind of work a project is set up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    Cleansing,
    Annotation,
    Evaluation,
    Segmentation,
    #[default]
    NotAssigned,
}

/// Workflow stage within the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    New,
    InProgress,
    Review,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLearningSettings {
    /// Run prediction automatically when an unpredicted asset is rendered.
    #[serde(default)]
    pub auto_detect: bool,
    /// Tag predicted regions with the predicted class name.
    #[serde(default)]
    pub predict_tag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DotToRectSettings {
    /// Endpoint of the dot-to-rect service; empty when not configured.
    #[serde(default)]
    pub url: String,
}

/// A tagging project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub task_status: TaskStatus,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub attribute_keys: Vec<AttributeKey>,
    #[serde(default)]
    pub active_learning: ActiveLearningSettings,
    #[serde(default)]
    pub dot_to_rect: DotToRectSettings,
    #[serde(default)]
    pub auto_save: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visited_asset_id: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: crate::VERSION.to_string(),
            ..Default::default()
        }
    }

    pub fn with_stage(mut self, task_type: TaskType, task_status: TaskStatus) -> Self {
        self.task_type = task_type;
        self.task_status = task_status;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_attribute_keys(mut self, keys: Vec<AttributeKey>) -> Self {
        self.attribute_keys = keys;
        self
    }

    /// Tag at a zero-based position, used by digit hot keys.
    pub fn tag_at(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }

    /// Exact, case-sensitive key lookup.
    pub fn has_attribute_key(&self, name: &str) -> bool {
        self.attribute_keys.iter().any(|k| k.name == name)
    }

    /// Rename a tag definition in place. Returns false if `from` is unknown.
    ///
    /// When `to` is already defined the two merge: the `from` definition is
    /// dropped and `to` keeps its color and position.
    pub fn rename_tag_definition(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.has_tag(from);
        }
        if self.has_tag(to) {
            return self.remove_tag_definition(from);
        }
        match self.tags.iter_mut().find(|t| t.name == from) {
            Some(tag) => {
                tag.name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a tag definition. Returns false if it was not defined.
    pub fn remove_tag_definition(&mut self, name: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.name != name);
        self.tags.len() != before
    }

    /// True when a dot-to-rect endpoint is configured.
    pub fn has_dot_to_rect(&self) -> bool {
        !self.dot_to_rect.url.trim().is_empty()
    }
}
