//! Shared geometric and color primitives used by the canvas core.
//!
//! Positions are percentages of the untransformed container so they survive
//! container resizes; sizes are pixels. Every function here coerces out-of-range
//! input instead of rejecting it.

use serde::{Deserialize, Serialize};

pub const POSITION_MIN: f64 = 0.0;
/// Upper bound keeps the layer anchor, and some visible part, inside the container.
pub const POSITION_MAX: f64 = 95.0;
pub const SIZE_MIN: u32 = 20;
pub const DEFAULT_GRID_STEP: f64 = 5.0;
/// Finest grid the studio accepts, in percent.
pub const MIN_GRID_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSize")]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Persisted sizes may be negative or fractional; they are floored on read.
#[derive(Deserialize)]
struct RawSize {
    width: f64,
    height: f64,
}

impl From<RawSize> for Size {
    fn from(raw: RawSize) -> Self {
        clamp_size(raw.width, raw.height)
    }
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Mutable per-layer geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Position,
    pub size: Size,
    pub rotation: f64,
    pub opacity: f64,
}

impl Transform {
    pub const fn new(position: Position, size: Size, rotation: f64, opacity: f64) -> Self {
        Self {
            position,
            size,
            rotation,
            opacity,
        }
    }

    /// Coerces every field into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            position: clamp_position(self.position),
            size: clamp_size(f64::from(self.size.width), f64::from(self.size.height)),
            rotation: if self.rotation.is_finite() {
                self.rotation
            } else {
                0.0
            },
            opacity: clamp_opacity(self.opacity),
        }
    }

    pub fn display_rotation(&self) -> f64 {
        normalize_degrees(self.rotation)
    }
}

/// Whether grid snapping applies to a position update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapMode {
    Free,
    Grid(f64),
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        POSITION_MIN
    } else {
        value.clamp(POSITION_MIN, POSITION_MAX)
    }
}

pub fn clamp_position(position: Position) -> Position {
    Position::new(clamp_axis(position.x), clamp_axis(position.y))
}

pub fn snap(position: Position, grid_step: f64) -> Position {
    if !grid_step.is_finite() || grid_step <= 0.0 {
        return position;
    }
    let snap_axis = |value: f64| (value / grid_step).round() * grid_step;
    Position::new(snap_axis(position.x), snap_axis(position.y))
}

/// Clamp, then snap when requested. The trailing clamp keeps steps that do not
/// divide the upper bound from pushing a value out of range.
pub fn constrain_position(position: Position, snap_mode: SnapMode) -> Position {
    let clamped = clamp_position(position);
    match snap_mode {
        SnapMode::Free => clamped,
        SnapMode::Grid(step) => clamp_position(snap(clamped, step)),
    }
}

fn floor_side(value: f64) -> u32 {
    let floor = f64::from(SIZE_MIN);
    if value.is_nan() || value < floor {
        SIZE_MIN
    } else {
        // `as` saturates for values past u32::MAX.
        value.round() as u32
    }
}

pub fn clamp_size(width: f64, height: f64) -> Size {
    Size::new(floor_side(width), floor_side(height))
}

pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

pub fn rotation_from_vector(center: CanvasPoint, pointer: CanvasPoint) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}

pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// A point in untransformed container pixels (zoom already divided out).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, other: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(self.x - other.x, self.y - other.y)
    }

    /// Rotates this point around `center` by `degrees`.
    pub fn rotated_around(self, center: CanvasPoint, degrees: f64) -> CanvasPoint {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        CanvasPoint::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }
}

/// The container's layout box before the preview zoom is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Top-left corner of a layer anchored at `position`, in canvas pixels.
    pub fn percent_to_px(&self, position: Position) -> CanvasPoint {
        CanvasPoint::new(
            self.left + position.x * self.width / 100.0,
            self.top + position.y * self.height / 100.0,
        )
    }

    pub fn px_to_percent(&self, point: CanvasPoint) -> Option<Position> {
        if !self.is_usable() {
            return None;
        }
        Some(Position::new(
            (point.x - self.left) * 100.0 / self.width,
            (point.y - self.top) * 100.0 / self.height,
        ))
    }

    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#rrggbb` or `#rgb`; the leading `#` is optional.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        let channel = |slice: &str| u8::from_str_radix(slice, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            3 => {
                let expand = |slice: &str| channel(slice).map(|v| v * 17);
                Some(Self::new(
                    expand(hex.get(0..1)?)?,
                    expand(hex.get(1..2)?)?,
                    expand(hex.get(2..3)?)?,
                ))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {raw}")))
    }
}

/// Largest `ratio_x:ratio_y` box that fits inside `width` x `height`.
pub fn fit_aspect(width: f64, height: f64, ratio_x: f64, ratio_y: f64) -> (f64, f64) {
    if ratio_x <= 0.0 || ratio_y <= 0.0 || width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let target_w = height * ratio_x / ratio_y;
    if target_w <= width {
        (target_w, height)
    } else {
        (width, width * ratio_y / ratio_x)
    }
}
