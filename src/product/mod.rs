//! Static product descriptor supplied by the catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::{DesignSnapshot, LayerId, PreviewMode};
use crate::geometry::Transform;

pub type ProductResult<T> = std::result::Result<T, ProductError>;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("failed to parse product descriptor")]
    Parse(#[from] serde_json::Error),
    #[error("product {product_id} declares no color variants")]
    NoColorVariants { product_id: String },
}

/// Mockup imagery for one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorVariant {
    Sides { front: String, back: String },
    Flat(String),
}

impl ColorVariant {
    fn image_for(&self, mode: PreviewMode) -> &str {
        match (self, mode) {
            (Self::Sides { front, .. }, PreviewMode::Front) => front,
            (Self::Sides { back, .. }, PreviewMode::Back) => back,
            (Self::Flat(url), _) => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub color_variants: BTreeMap<String, ColorVariant>,
    #[serde(default)]
    pub has_front_back: bool,
    #[serde(default)]
    pub has_color_options: bool,
    #[serde(default)]
    pub has_size: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub default_transforms: BTreeMap<LayerId, Transform>,
}

impl ProductDescriptor {
    pub fn from_json(json: &str) -> ProductResult<Self> {
        let product: Self = serde_json::from_str(json)?;
        product.validated()
    }

    pub fn validated(self) -> ProductResult<Self> {
        if self.color_variants.is_empty() {
            return Err(ProductError::NoColorVariants {
                product_id: self.id,
            });
        }
        Ok(self)
    }

    /// Product-declared layer defaults, falling back to the built-in ones.
    pub fn default_snapshot(&self) -> DesignSnapshot {
        DesignSnapshot::from_layers(LayerId::ALL.map(|id| {
            let transform = self
                .default_transforms
                .get(&id)
                .copied()
                .unwrap_or(id.default_transform());
            (id, transform.clamped())
        }))
    }

    pub fn first_color(&self) -> Option<&str> {
        self.color_variants.keys().next().map(String::as_str)
    }

    pub fn has_color(&self, color: &str) -> bool {
        self.color_variants.contains_key(color)
    }

    pub fn first_size(&self) -> Option<&str> {
        if self.has_size {
            self.options.first().map(String::as_str)
        } else {
            None
        }
    }

    pub fn has_size_option(&self, size: &str) -> bool {
        self.has_size && self.options.iter().any(|option| option == size)
    }

    pub fn front_back_toggle_available(&self) -> bool {
        self.has_front_back
    }

    pub fn color_picker_available(&self) -> bool {
        self.has_color_options && self.color_variants.len() > 1
    }

    pub fn size_picker_available(&self) -> bool {
        self.has_size && !self.options.is_empty()
    }

    /// Mockup image under the layer stack. Products without a front/back
    /// distinction always show the same image regardless of `mode`; unknown
    /// colors fall back to the first variant.
    pub fn effective_image(&self, color: &str, mode: PreviewMode) -> Option<&str> {
        let variant = self
            .color_variants
            .get(color)
            .or_else(|| self.color_variants.values().next())?;
        let mode = if self.has_front_back {
            mode
        } else {
            PreviewMode::Front
        };
        Some(variant.image_for(mode))
    }
}
