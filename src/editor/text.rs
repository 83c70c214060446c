use serde::{Deserialize, Serialize};

use crate::geometry::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TextFill {
    Solid {
        color: Color,
    },
    Gradient {
        from: Color,
        to: Color,
        angle: f64,
    },
}

impl Default for TextFill {
    fn default() -> Self {
        Self::Solid {
            color: Color::new(17, 17, 17),
        }
    }
}

/// Typographic style of the text layer, as chosen in the host's text panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_weight: u16,
    pub font_size: u16,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub uppercase: bool,
    pub text_align: TextAlign,
    pub shadow: bool,
    pub outline: bool,
    pub blur: f64,
    pub fill: TextFill,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: 600,
            font_size: 32,
            letter_spacing: 0.0,
            line_height: 1.2,
            uppercase: false,
            text_align: TextAlign::Center,
            shadow: false,
            outline: false,
            blur: 0.0,
            fill: TextFill::default(),
        }
    }
}

impl TextStyle {
    pub fn set_font_family(&mut self, family: impl Into<String>) {
        let family = family.into();
        self.font_family = if family.trim().is_empty() {
            DEFAULT_FONT_FAMILY.to_string()
        } else {
            family
        };
    }

    pub fn set_font_weight(&mut self, weight: u16) {
        self.font_weight = clamp_font_weight(weight);
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size.max(1);
    }

    pub fn set_line_height(&mut self, line_height: f64) {
        self.line_height = if line_height.is_finite() && line_height > 0.0 {
            line_height
        } else {
            DEFAULT_LINE_HEIGHT
        };
    }

    pub fn set_blur(&mut self, blur: f64) {
        self.blur = if blur.is_finite() { blur.max(0.0) } else { 0.0 };
    }

    /// Brings a host-supplied style back into range.
    pub fn normalized(mut self) -> Self {
        let family = std::mem::take(&mut self.font_family);
        self.set_font_family(family);
        self.set_font_weight(self.font_weight);
        self.set_font_size(self.font_size);
        self.set_line_height(self.line_height);
        self.set_blur(self.blur);
        if !self.letter_spacing.is_finite() {
            self.letter_spacing = 0.0;
        }
        self
    }

    pub fn display_text(&self, content: &str) -> String {
        if self.uppercase {
            content.to_uppercase()
        } else {
            content.to_string()
        }
    }
}

const DEFAULT_FONT_FAMILY: &str = "Inter";
const DEFAULT_LINE_HEIGHT: f64 = 1.2;

const fn clamp_font_weight(weight: u16) -> u16 {
    if weight < 100 {
        100
    } else if weight > 900 {
        900
    } else {
        weight
    }
}
