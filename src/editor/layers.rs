use serde::{Deserialize, Serialize};

use super::history::DesignSnapshot;
use super::text::TextStyle;
use crate::geometry::{Position, Size, Transform};

/// Identity of a design layer. Declaration order is render order: later
/// layers draw on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    Image,
    Text,
}

impl LayerId {
    pub const ALL: [LayerId; 2] = [LayerId::Image, LayerId::Text];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    pub const fn default_transform(self) -> Transform {
        match self {
            Self::Image => Transform::new(Position::new(35.0, 25.0), Size::new(150, 150), 0.0, 1.0),
            Self::Text => Transform::new(Position::new(30.0, 60.0), Size::new(200, 60), 0.0, 1.0),
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Image => 0,
            Self::Text => 1,
        }
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LayerContent {
    Empty,
    Image { url: String },
    Text { text: String, style: TextStyle },
}

impl LayerContent {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Image { url } => url.trim().is_empty(),
            Self::Text { text, .. } => text.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub visible: bool,
    pub locked: bool,
    pub rotatable: bool,
    pub content: LayerContent,
    pub transform: Transform,
}

impl Layer {
    fn new(id: LayerId, transform: Transform) -> Self {
        Self {
            id,
            visible: true,
            locked: false,
            rotatable: true,
            content: LayerContent::Empty,
            transform: transform.clamped(),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    /// Hidden layers keep their stored opacity but draw fully transparent.
    pub fn effective_opacity(&self) -> f64 {
        if self.visible {
            self.transform.opacity
        } else {
            0.0
        }
    }

    pub fn accepts_pointer_transform(&self) -> bool {
        self.has_content() && self.visible && !self.locked
    }
}

/// Ordered layer stack plus the single selection.
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    layers: [Layer; 2],
    selected: Option<LayerId>,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new(&DesignSnapshot::defaults())
    }
}

impl LayerRegistry {
    pub fn new(defaults: &DesignSnapshot) -> Self {
        let transform_for = |id: LayerId| defaults.transform(id).unwrap_or(id.default_transform());
        Self {
            layers: [
                Layer::new(LayerId::Image, transform_for(LayerId::Image)),
                Layer::new(LayerId::Text, transform_for(LayerId::Text)),
            ],
            selected: None,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.index()]
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        &mut self.layers[id.index()]
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn is_selected(&self, id: LayerId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_selectable(&self, id: LayerId) -> bool {
        let layer = self.layer(id);
        layer.has_content() && !layer.locked
    }

    pub fn select(&mut self, id: LayerId) -> bool {
        if !self.is_selectable(id) {
            tracing::debug!(layer = %id, "selection ignored for locked or empty layer");
            return false;
        }
        if self.selected != Some(id) {
            tracing::debug!(layer = %id, previous = ?self.selected, "layer selected");
        }
        self.selected = Some(id);
        true
    }

    /// Selection by host-supplied name; unknown names leave selection unchanged.
    pub fn select_named(&mut self, name: &str) -> bool {
        match LayerId::parse(name) {
            Some(id) => self.select(id),
            None => {
                tracing::debug!(name, "selection ignored for unknown layer id");
                false
            }
        }
    }

    pub fn deselect(&mut self) {
        if let Some(previous) = self.selected.take() {
            tracing::debug!(layer = %previous, "selection cleared");
        }
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        self.layer_mut(id).visible = visible;
    }

    pub fn toggle_visible(&mut self, id: LayerId) -> bool {
        let layer = self.layer_mut(id);
        layer.visible = !layer.visible;
        layer.visible
    }

    pub fn set_locked(&mut self, id: LayerId, locked: bool) {
        self.layer_mut(id).locked = locked;
    }

    pub fn toggle_locked(&mut self, id: LayerId) -> bool {
        let layer = self.layer_mut(id);
        layer.locked = !layer.locked;
        layer.locked
    }

    pub fn set_rotatable(&mut self, id: LayerId, rotatable: bool) {
        self.layer_mut(id).rotatable = rotatable;
    }

    pub fn set_image(&mut self, url: impl Into<String>) {
        let url = url.into();
        let content = if url.trim().is_empty() {
            LayerContent::Empty
        } else {
            LayerContent::Image { url }
        };
        self.replace_content(LayerId::Image, content);
    }

    pub fn set_text(&mut self, text: impl Into<String>, style: TextStyle) {
        let text = text.into();
        let content = if text.trim().is_empty() {
            LayerContent::Empty
        } else {
            LayerContent::Text {
                text,
                style: style.normalized(),
            }
        };
        self.replace_content(LayerId::Text, content);
    }

    pub fn clear_content(&mut self, id: LayerId) {
        self.replace_content(id, LayerContent::Empty);
    }

    fn replace_content(&mut self, id: LayerId, content: LayerContent) {
        self.layer_mut(id).content = content;
        if self.selected == Some(id) && !self.layer(id).has_content() {
            self.deselect();
        }
    }

    pub fn snapshot(&self) -> DesignSnapshot {
        DesignSnapshot::from_layers(self.layers.iter().map(|layer| (layer.id, layer.transform)))
    }

    /// Applies a snapshot; values are clamped on read and layers missing from
    /// the snapshot keep their current transform.
    pub fn apply_snapshot(&mut self, snapshot: &DesignSnapshot) {
        for layer in &mut self.layers {
            if let Some(transform) = snapshot.transform(layer.id) {
                layer.transform = transform.clamped();
            }
        }
    }
}
