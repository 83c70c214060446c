//! Canvas manipulation core: layers, gestures, history and view state.

pub mod controller;
pub mod gesture;
pub mod history;
pub mod layers;
pub mod text;
pub mod view;

pub use controller::{
    DetachedListenerHost, GestureEnd, ListenerLease, ManipulationController, PointerListenerHost,
};
pub use gesture::{GestureKind, GestureState, PointerTarget};
pub use history::{DesignSnapshot, HistoryStack};
pub use layers::{Layer, LayerContent, LayerId, LayerRegistry};
pub use text::{TextAlign, TextFill, TextStyle};
pub use view::{PreviewMode, ViewState, ZOOM_MAX, ZOOM_MIN};
