use serde::Serialize;

use crate::editor::{LayerContent, LayerId, LayerRegistry, PreviewMode};
use crate::geometry::Transform;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedLayer {
    pub id: LayerId,
    pub transform: Transform,
    pub content: LayerContent,
}

/// Design state handed to the external order flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSubmission {
    pub product_id: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub preview_mode: PreviewMode,
    pub mockup_url: Option<String>,
    pub layers: Vec<SubmittedLayer>,
}

impl DesignSubmission {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Visible, content-bearing layers in render order.
pub fn submitted_layers(registry: &LayerRegistry) -> Vec<SubmittedLayer> {
    registry
        .layers()
        .iter()
        .filter(|layer| layer.visible && layer.has_content())
        .map(|layer| SubmittedLayer {
            id: layer.id,
            transform: layer.transform,
            content: layer.content.clone(),
        })
        .collect()
}
