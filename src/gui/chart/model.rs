//! Chart state: categories, profiles, pointer hit-testing and drag handling.

use super::selector::{Corner, CornerSelector};
use super::{
    CATEGORY_UI_OFFSET, CATEGORY_UI_SIZE, HANDLE_RADIUS_HOVERED, HANDLE_RADIUS_NORMAL,
    SELECTOR_CORNER_HIT_RADIUS,
};
use crate::config::{ChartConfig, CornerOption};
use crate::geometry::{self, Point};
use crate::session::{LoadedSession, Profile, ProfileStore};
use palette::Srgba;

#[derive(Debug, Clone)]
pub struct Category {
    pub index: usize,
    pub name: String,
    pub color: Srgba<f64>,
    pub corners: [CornerOption; 3],
    pub angle: f64,
}

/// Pointer interaction state. Hovering and dragging reference a category
/// index; the handle itself is derived geometry, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Hovering {
        category: usize,
    },
    Dragging {
        category: usize,
        grab: Point,
    },
}

impl PointerState {
    pub fn hovered_category(&self) -> Option<usize> {
        match *self {
            PointerState::Idle => None,
            PointerState::Hovering { category } => Some(category),
            PointerState::Dragging { category, .. } => Some(category),
        }
    }

    fn is_dragging(&self) -> bool {
        matches!(self, PointerState::Dragging { .. })
    }
}

/// What the caller owes after a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputAction {
    pub should_redraw: bool,
    /// A selector animation started; the frame scheduler must run.
    pub should_animate: bool,
}

impl InputAction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            should_redraw: true,
            should_animate: false,
        }
    }

    pub fn animate() -> Self {
        Self {
            should_redraw: true,
            should_animate: true,
        }
    }
}

pub struct ChartState {
    pub width: f64,
    pub height: f64,
    pub categories: Vec<Category>,
    pub scale_size: usize,
    pub scale_step: usize,
    pub smoothing: f64,
    pub profiles: ProfileStore,
    pub pointer: PointerState,
    pub selectors: Vec<CornerSelector>,
    pub print_mode: bool,
}

impl ChartState {
    pub fn new(config: &ChartConfig) -> Self {
        let categories = build_categories(config);
        let selectors = build_selectors(&categories);

        if config.dual_scale {
            log::warn!("dual scale requested but not implemented; using a single scale");
        }

        Self {
            width: 0.0,
            height: 0.0,
            categories,
            scale_size: config.scale_size,
            scale_step: config.scale_step,
            smoothing: config.smoothing,
            profiles: ProfileStore::new(),
            pointer: PointerState::Idle,
            selectors,
            print_mode: false,
        }
    }

    /// Swaps in a freshly loaded chart definition. Profiles survive with
    /// their data points realigned to the new category count.
    pub fn reload(&mut self, config: &ChartConfig) {
        self.categories = build_categories(config);
        self.selectors = build_selectors(&self.categories);
        self.scale_size = config.scale_size;
        self.scale_step = config.scale_step;
        self.smoothing = config.smoothing;
        self.pointer = PointerState::Idle;

        let count = self.categories.len();
        let ids: Vec<_> = self.profiles.iter().map(|p| p.id).collect();
        for id in ids {
            if let Some(profile) = self.profiles.get_mut(id) {
                profile.normalize(count);
            }
        }
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn graph_radius(&self) -> f64 {
        geometry::graph_radius(self.width, self.height, CATEGORY_UI_SIZE)
    }

    /// Distance from the chart center to each selector widget center.
    pub fn selector_radius(&self) -> f64 {
        self.graph_radius() + CATEGORY_UI_SIZE * CATEGORY_UI_OFFSET
    }

    pub fn selector_center(&self, category: usize) -> Point {
        geometry::point_on_axis(
            self.center(),
            self.categories[category].angle,
            1.0,
            self.selector_radius(),
        )
    }

    /// Nothing is drawable or interactive without categories and area.
    pub fn is_degenerate(&self) -> bool {
        self.categories.is_empty() || self.graph_radius() <= 0.0
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn handle_position(&self, profile: &Profile, category: usize) -> Point {
        geometry::point_on_axis(
            self.center(),
            self.categories[category].angle,
            profile.data_points[category],
            self.graph_radius(),
        )
    }

    /// Scans the current profile's handles in index order. A handle is hit
    /// when the squared distance stays within its radius (the larger hovered
    /// radius when it is already hovered, so re-acquiring it is easier)
    /// widened by the pointer contact size.
    fn hit_test(&self, p: Point, contact: f64) -> Option<usize> {
        let profile = self.profiles.current()?;
        let hovered = self.pointer.hovered_category();

        (0..self.category_count()).find(|&i| {
            let handle = self.handle_position(profile, i);
            let radius = if hovered == Some(i) {
                HANDLE_RADIUS_HOVERED
            } else {
                HANDLE_RADIUS_NORMAL
            };
            p.distance_squared(handle) <= radius * radius + contact * contact
        })
    }

    /// Finds the selector corner anchor under the pointer, if any.
    fn selector_hit(&self, p: Point) -> Option<(usize, Corner)> {
        for (i, selector) in self.selectors.iter().enumerate() {
            let center = self.selector_center(i);
            let triangle_radius = CATEGORY_UI_SIZE / 3.0_f64.sqrt();
            for (angle, corner) in selector.anchor_angles().into_iter().zip([
                Corner::First,
                Corner::Second,
                Corner::Third,
            ]) {
                let rad = geometry::deg_to_rad(angle);
                let anchor = geometry::point_on_axis(center, rad, 1.0, triangle_radius);
                if p.distance_squared(anchor)
                    <= SELECTOR_CORNER_HIT_RADIUS * SELECTOR_CORNER_HIT_RADIUS
                {
                    return Some((i, corner));
                }
            }
        }
        None
    }

    pub fn pointer_down(&mut self, p: Point, contact: f64, now_ms: f64) -> InputAction {
        if self.is_degenerate() {
            return InputAction::none();
        }

        if let Some(category) = self.hit_test(p, contact) {
            // profiles.current() is present whenever hit_test matched
            if let Some(profile) = self.profiles.current() {
                let grab_origin = self.handle_position(profile, category);
                self.pointer = PointerState::Dragging {
                    category,
                    grab: Point::new(p.x - grab_origin.x, p.y - grab_origin.y),
                };
            }
            return InputAction::none();
        }

        if let Some((category, corner)) = self.selector_hit(p) {
            self.selectors[category].select_corner(corner, now_ms);
            return InputAction::animate();
        }

        InputAction::none()
    }

    pub fn pointer_move(&mut self, p: Point, contact: f64) -> InputAction {
        if self.is_degenerate() || self.profiles.current().is_none() {
            return InputAction::none();
        }

        if let PointerState::Dragging { category, grab } = self.pointer {
            let corrected = Point::new(p.x - grab.x, p.y - grab.y);
            let angle = self.categories[category].angle;
            let t = geometry::project_on_axis(self.center(), angle, self.graph_radius(), corrected);
            if let Some(profile) = self.profiles.current_mut() {
                profile.data_points[category] = t;
            }
            return InputAction::redraw();
        }

        // hover scan; redraw only on a some/none transition
        let hit = self.hit_test(p, contact);
        let had = self.pointer.hovered_category();
        if hit.is_some() != had.is_some() {
            self.pointer = match hit {
                Some(category) => PointerState::Hovering { category },
                None => PointerState::Idle,
            };
            return InputAction::redraw();
        }

        InputAction::none()
    }

    pub fn pointer_up(&mut self) -> InputAction {
        let was_dragging = self.pointer.is_dragging();
        self.pointer = PointerState::Idle;
        if was_dragging {
            InputAction::redraw()
        } else {
            InputAction::none()
        }
    }

    /// One scheduler frame: advances every animating selector. Returns true
    /// while any selector still animates.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut any = false;
        for selector in &mut self.selectors {
            if selector.update(now_ms) {
                any = true;
            }
        }
        any
    }

    pub fn any_selector_animating(&self) -> bool {
        self.selectors.iter().any(CornerSelector::is_animating)
    }

    /// Print-mode hook for the export pipeline: toggles the chart itself and
    /// every selector widget.
    pub fn set_print_mode(&mut self, on: bool) {
        self.print_mode = on;
        for selector in &mut self.selectors {
            selector.print_mode = on;
        }
    }

    pub fn apply_session(&mut self, loaded: &LoadedSession) {
        let category_count = self.category_count();
        crate::session::apply_profiles(&mut self.profiles, loaded, category_count);

        for (i, corner) in loaded.corners.iter().enumerate() {
            let (Some(selector), Some(corner)) = (self.selectors.get_mut(i), corner) else {
                continue;
            };
            match Corner::from_index(*corner) {
                Some(c) => selector.restore(c),
                None => log::warn!("corner index {corner} out of range for category {i}"),
            }
        }
    }

    pub fn to_session(&self) -> crate::session::SessionData {
        crate::session::SessionData {
            profiles: self
                .profiles
                .iter()
                .map(|p| crate::session::SessionProfile {
                    id: p.id.into(),
                    name: p.name.clone(),
                    is_visible: p.visible,
                    data_points: p.data_points.clone(),
                })
                .collect(),
            current_profile_id: self.profiles.current_id().map(Into::into),
            active_category_corners: self
                .selectors
                .iter()
                .map(|s| s.active.index())
                .collect(),
        }
    }
}

fn build_categories(config: &ChartConfig) -> Vec<Category> {
    let count = config.categories.len();
    config
        .categories
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| match raw.validate() {
            Ok((name, color, corners)) => Some(Category {
                index: i,
                name,
                color,
                corners,
                angle: geometry::category_angle(i, count),
            }),
            Err(e) => {
                log::warn!("skipping category at index {i}: {e}");
                None
            }
        })
        .collect()
}

fn build_selectors(categories: &[Category]) -> Vec<CornerSelector> {
    categories
        .iter()
        .map(|c| CornerSelector::new(geometry::rad_to_deg(c.angle) + 180.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChartConfig, RawCategory};

    fn test_config(count: usize) -> ChartConfig {
        ChartConfig {
            categories: (0..count).map(|i| RawCategory::for_tests(&format!("K{i}"))).collect(),
            scale_size: 10,
            scale_step: 1,
            dual_scale: false,
            smoothing: 0.0,
        }
    }

    fn sized_state(count: usize) -> ChartState {
        let mut state = ChartState::new(&test_config(count));
        state.resize(1000.0, 1000.0);
        state
    }

    #[test]
    fn handles_sit_on_their_axes() {
        let mut state = sized_state(5);
        let id = state.profiles.add(5);
        {
            let profile = state.profiles.get_mut(id).unwrap();
            profile.data_points = vec![0.0, 0.25, 0.5, 0.75, 1.0];
        }

        let center = state.center();
        let radius = state.graph_radius();
        let profile = state.profiles.get(id).unwrap();

        // value 0 maps exactly to the center
        assert_eq!(state.handle_position(profile, 0), center);
        // value 1 sits exactly on the outer ring
        let outer = state.handle_position(profile, 4);
        assert!((outer.distance(center) - radius).abs() < 1e-9);
    }

    #[test]
    fn pointer_ops_are_noops_without_a_profile() {
        let mut state = sized_state(5);
        let p = state.center();
        assert_eq!(state.pointer_move(p, 0.0), InputAction::none());
        assert_eq!(state.pointer, PointerState::Idle);
        // down misses handles (none exist) and may only hit selectors
        let action = state.pointer_down(p, 0.0, 0.0);
        assert!(!action.should_animate);
    }

    #[test]
    fn pointer_ops_are_noops_on_degenerate_surface() {
        let mut state = ChartState::new(&test_config(5));
        state.profiles.add(5);
        assert!(state.is_degenerate());
        assert_eq!(state.pointer_down(Point::new(1.0, 1.0), 0.0, 0.0), InputAction::none());
        assert_eq!(state.pointer_move(Point::new(1.0, 1.0), 0.0), InputAction::none());
    }

    #[test]
    fn press_on_handle_starts_drag_with_grab_offset() {
        let mut state = sized_state(4);
        let id = state.profiles.add(4);
        let handle = {
            let profile = state.profiles.get(id).unwrap();
            state.handle_position(profile, 0)
        };

        // press slightly off-center of the handle
        let press = Point::new(handle.x + 4.0, handle.y - 3.0);
        state.pointer_down(press, 0.0, 0.0);

        match state.pointer {
            PointerState::Dragging { category, grab } => {
                assert_eq!(category, 0);
                assert!((grab.x - 4.0).abs() < 1e-9);
                assert!((grab.y + 3.0).abs() < 1e-9);
            }
            other => panic!("expected drag, got {other:?}"),
        }
    }

    #[test]
    fn drag_clamps_value_to_unit_range() {
        let mut state = sized_state(5);
        state.profiles.add(5);
        {
            let profile = state.profiles.current_mut().unwrap();
            profile.data_points[2] = 0.2;
        }

        let handle = {
            let profile = state.profiles.current().unwrap();
            state.handle_position(profile, 2)
        };
        state.pointer_down(handle, 0.0, 0.0);

        // drag to a point corresponding to raw t = 1.4 on category 2's axis
        let angle = state.categories[2].angle;
        let target = geometry::point_on_axis(state.center(), angle, 1.4, state.graph_radius());
        let action = state.pointer_move(target, 0.0);
        assert!(action.should_redraw);
        assert_eq!(state.profiles.current().unwrap().data_points[2], 1.0);

        // and back past the center clamps to 0
        let behind = geometry::point_on_axis(state.center(), angle, -0.5, state.graph_radius());
        state.pointer_move(behind, 0.0);
        assert_eq!(state.profiles.current().unwrap().data_points[2], 0.0);
    }

    #[test]
    fn drag_projects_off_axis_points_onto_the_axis() {
        let mut state = sized_state(4);
        state.profiles.add(4);
        let handle = {
            let profile = state.profiles.current().unwrap();
            state.handle_position(profile, 0)
        };
        state.pointer_down(handle, 0.0, 0.0);

        // category 0 points up; move sideways at 70% height
        let center = state.center();
        let radius = state.graph_radius();
        let target = Point::new(center.x + 40.0, center.y - radius * 0.7);
        state.pointer_move(target, 0.0);
        let value = state.profiles.current().unwrap().data_points[0];
        assert!((value - 0.7).abs() < 1e-9);
    }

    #[test]
    fn hover_is_sticky_at_the_boundary() {
        let mut state = sized_state(4);
        state.profiles.add(4);
        let handle = {
            let profile = state.profiles.current().unwrap();
            state.handle_position(profile, 0)
        };

        // between the normal and hovered radii
        let between = (HANDLE_RADIUS_NORMAL + HANDLE_RADIUS_HOVERED) / 2.0;
        let probe = Point::new(handle.x + between, handle.y);

        // not hovered: miss
        assert_eq!(state.pointer_move(probe, 0.0), InputAction::none());
        assert_eq!(state.pointer.hovered_category(), None);

        // hover it first, then the same probe distance hits
        state.pointer_move(handle, 0.0);
        assert_eq!(state.pointer.hovered_category(), Some(0));
        assert_eq!(state.pointer_move(probe, 0.0), InputAction::none());
        assert_eq!(state.pointer.hovered_category(), Some(0));
    }

    #[test]
    fn contact_size_widens_the_hit_area() {
        let mut state = sized_state(4);
        state.profiles.add(4);
        let handle = {
            let profile = state.profiles.current().unwrap();
            state.handle_position(profile, 0)
        };
        let probe = Point::new(handle.x + HANDLE_RADIUS_NORMAL + 2.0, handle.y);

        state.pointer_down(probe, 0.0, 0.0);
        assert_eq!(state.pointer, PointerState::Idle);

        state.pointer_down(probe, 8.0, 0.0);
        assert!(state.pointer.is_dragging());
    }

    #[test]
    fn hover_transitions_drive_redraws() {
        let mut state = sized_state(4);
        state.profiles.add(4);
        let handle = {
            let profile = state.profiles.current().unwrap();
            state.handle_position(profile, 0)
        };

        let enter = state.pointer_move(handle, 0.0);
        assert!(enter.should_redraw);
        // staying on the handle is quiet
        assert_eq!(state.pointer_move(handle, 0.0), InputAction::none());

        let leave = state.pointer_move(state.center(), 0.0);
        assert!(leave.should_redraw);
    }

    #[test]
    fn pointer_up_always_returns_to_idle() {
        let mut state = sized_state(4);
        state.profiles.add(4);
        let handle = {
            let profile = state.profiles.current().unwrap();
            state.handle_position(profile, 1)
        };
        state.pointer_down(handle, 0.0, 0.0);
        assert!(state.pointer.is_dragging());
        state.pointer_up();
        assert_eq!(state.pointer, PointerState::Idle);
        // idempotent
        assert_eq!(state.pointer_up(), InputAction::none());
    }

    #[test]
    fn selector_corner_press_starts_animation() {
        let mut state = sized_state(4);
        let center = state.selector_center(0);
        let selector = &state.selectors[0];
        let anchor_angle = geometry::deg_to_rad(selector.anchor_angles()[1]);
        let anchor = geometry::point_on_axis(
            center,
            anchor_angle,
            1.0,
            CATEGORY_UI_SIZE / 3.0_f64.sqrt(),
        );

        let action = state.pointer_down(anchor, 0.0, 0.0);
        assert!(action.should_animate);
        assert!(state.selectors[0].is_animating());
        assert_eq!(state.selectors[0].active, Corner::Second);

        // scheduler runs the animation to rest
        assert!(state.tick(100.0));
        assert!(!state.tick(10_000.0));
        assert!(!state.any_selector_animating());
    }

    #[test]
    fn session_round_trip_through_state() {
        let mut state = sized_state(3);
        state.profiles.add(3);
        state.profiles.add(3);
        state.selectors[1].restore(Corner::Third);

        let saved = state.to_session();
        assert_eq!(saved.profiles.len(), 2);
        assert_eq!(saved.active_category_corners, vec![0, 2, 0]);

        let json = serde_json::to_string(&saved).unwrap();
        let loaded = crate::session::decode_session(&json).unwrap();

        let mut fresh = sized_state(3);
        fresh.apply_session(&loaded);
        assert_eq!(fresh.profiles.len(), 2);
        assert_eq!(fresh.selectors[1].active, Corner::Third);
        assert_eq!(fresh.profiles.current_id(), state.profiles.current_id());
    }

    #[test]
    fn reload_realigns_profile_data() {
        let mut state = sized_state(5);
        state.profiles.add(5);
        state.reload(&test_config(3));
        assert_eq!(state.category_count(), 3);
        assert_eq!(state.profiles.current().unwrap().data_points.len(), 3);
    }
}
