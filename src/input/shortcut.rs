use crate::studio::{NudgeDirection, StudioAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    /// A host text field (e.g. the custom text input) owns the keyboard.
    pub text_input_active: bool,
    pub in_canvas: bool,
}

fn resolve_text_shortcut(key: ShortcutKey) -> Option<StudioAction> {
    match key {
        ShortcutKey::Escape => Some(StudioAction::Deselect),
        _ => None,
    }
}

fn resolve_nudge(key: ShortcutKey, large: bool) -> Option<StudioAction> {
    let direction = match key {
        ShortcutKey::ArrowLeft => NudgeDirection::Left,
        ShortcutKey::ArrowRight => NudgeDirection::Right,
        ShortcutKey::ArrowUp => NudgeDirection::Up,
        ShortcutKey::ArrowDown => NudgeDirection::Down,
        _ => return None,
    };
    Some(StudioAction::Nudge { direction, large })
}

fn resolve_view_shortcut(key: ShortcutKey) -> Option<StudioAction> {
    match key {
        ShortcutKey::Character('g') => Some(StudioAction::ToggleGrid),
        ShortcutKey::Character('s') => Some(StudioAction::ToggleSnap),
        ShortcutKey::Character('a') => Some(StudioAction::ToggleSafeArea),
        ShortcutKey::Character('f') => Some(StudioAction::TogglePreviewMode),
        ShortcutKey::Character('+') | ShortcutKey::Character('=') => Some(StudioAction::ZoomIn),
        ShortcutKey::Character('-') => Some(StudioAction::ZoomOut),
        ShortcutKey::Character('0') => Some(StudioAction::ResetZoom),
        ShortcutKey::Character('l') => Some(StudioAction::ToggleSelectedLock),
        ShortcutKey::Character('h') => Some(StudioAction::ToggleSelectedVisibility),
        _ => None,
    }
}

fn resolve_canvas_shortcut(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<StudioAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Character('z'), true, false) => Some(StudioAction::Undo),
        (ShortcutKey::Character('z'), true, true) | (ShortcutKey::Character('y'), true, false) => {
            Some(StudioAction::Redo)
        }
        (ShortcutKey::Escape, _, _) => Some(StudioAction::Deselect),
        (_, false, shift) => resolve_nudge(key, shift).or_else(|| {
            if shift {
                None
            } else {
                resolve_view_shortcut(key)
            }
        }),
        _ => None,
    }
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<StudioAction> {
    let key = match key {
        ShortcutKey::Character(c) => ShortcutKey::Character(c.to_ascii_lowercase()),
        other => other,
    };

    if !context.in_canvas {
        return None;
    }

    if context.text_input_active {
        return resolve_text_shortcut(key);
    }

    resolve_canvas_shortcut(key, modifiers)
}
