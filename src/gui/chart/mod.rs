pub mod grid;
pub mod model;
pub mod selector;
pub mod view;

pub use model::{ChartState, InputAction, PointerState};
pub use selector::{AnimationClock, Corner, CornerSelector};
pub use view::draw;

/// Footprint of one corner selector widget (width/height of its triangle box).
pub const CATEGORY_UI_SIZE: f64 = 144.0;
/// How far past the outer ring the selector centers sit, relative to
/// CATEGORY_UI_SIZE.
pub const CATEGORY_UI_OFFSET: f64 = 1.1;

pub const HANDLE_RADIUS_NORMAL: f64 = 13.0;
pub const HANDLE_RADIUS_HOVERED: f64 = 16.0;
pub const HANDLE_RADIUS_OTHER: f64 = 8.0;
pub const LINE_SIZE_CURRENT_PROFILE: f64 = 9.6;
pub const LINE_SIZE_OTHER_PROFILE: f64 = 6.4;
pub const LINE_SIZE_SCALE: f64 = 2.4;
pub const LINE_SIZE_MAIN_SCALE: f64 = 4.8;
pub const LINE_SIZE_SPOKE: f64 = 6.4;
pub const CORNER_INDICATOR_RADIUS: f64 = 8.0;
pub const SELECTOR_LINE_SIZE: f64 = 4.8;
/// Hit radius around a selector corner anchor.
pub const SELECTOR_CORNER_HIT_RADIUS: f64 = 18.0;
/// Alpha used for the current profile while its visibility is toggled off.
pub const HIDDEN_PROFILE_ALPHA: f64 = 0.6;
pub const PROFILE_BORDER_SIZE: f64 = 1.0;

pub const SELECTOR_ANIMATION_MS: f64 = 750.0;
pub const BASE_CORNER_ANGLES: [f64; 3] = [0.0, 120.0, 240.0];
