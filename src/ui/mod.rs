pub mod info_panel;
pub mod keybindings;
pub mod lightbox;
pub mod resize;

pub use info_panel::{InfoEntry, InfoPanel, InfoSection, InfoValue};
pub use keybindings::{Action, InputEvent, InteractionMode, Key, ModeMachine};
pub use lightbox::{
    frame_bounds, Dismissal, FrameBounds, LightboxNavigator, MediaElement, MediaTarget,
    Presentation,
};
pub use resize::ResizeDebouncer;
