//! Cairo rendering of the chart: background grid, profile polygons with
//! their handles, and the corner selector widgets.

use super::model::ChartState;
use super::selector::CornerSelector;
use super::{
    CATEGORY_UI_SIZE, CORNER_INDICATOR_RADIUS, HANDLE_RADIUS_HOVERED, HANDLE_RADIUS_NORMAL,
    HANDLE_RADIUS_OTHER, HIDDEN_PROFILE_ALPHA, LINE_SIZE_CURRENT_PROFILE, LINE_SIZE_MAIN_SCALE,
    LINE_SIZE_OTHER_PROFILE, LINE_SIZE_SCALE, LINE_SIZE_SPOKE, PROFILE_BORDER_SIZE,
    SELECTOR_LINE_SIZE, grid,
};
use crate::geometry::{self, Point};
use crate::gui::theme::{self, ThemeColors};
use crate::session::Profile;
use cairo::Context;
use palette::Srgba;
use std::f64::consts::PI;

fn set_source(cr: &Context, color: Srgba<f64>) {
    cr.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn trace_path(cr: &Context, points: &[Point]) {
    let Some(first) = points.first() else {
        return;
    };
    cr.move_to(first.x, first.y);
    for p in &points[1..] {
        cr.line_to(p.x, p.y);
    }
}

/// Renders the full frame. Everything is re-derived from `state`; nothing is
/// cached across frames.
pub fn draw(cr: &Context, state: &ChartState, colors: &ThemeColors) -> Result<(), cairo::Error> {
    if state.is_degenerate() {
        return Ok(());
    }

    draw_background(cr, state, colors)?;

    let hovered = state.pointer.hovered_category();
    for profile in state.profiles.iter() {
        let current = state.profiles.current_id() == Some(profile.id);
        if current || !profile.visible {
            continue;
        }
        ProfileRenderer::new(state, profile, false, None).draw(cr, colors)?;
    }

    if let Some(profile) = state.profiles.current() {
        ProfileRenderer::new(state, profile, true, hovered).draw(cr, colors)?;
    }

    for (i, selector) in state.selectors.iter().enumerate() {
        draw_selector(cr, state, i, selector)?;
    }

    Ok(())
}

fn draw_background(
    cr: &Context,
    state: &ChartState,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = state.center();
    let radius = state.graph_radius();
    let angles: Vec<f64> = state.categories.iter().map(|c| c.angle).collect();

    cr.save()?;
    set_source(cr, colors.grid);
    cr.set_line_cap(cairo::LineCap::Round);

    for ring in grid::rings(radius, state.scale_size, state.scale_step) {
        let path = grid::ring_path(center, ring.radius, &angles, state.smoothing);
        trace_path(cr, &path);
        cr.close_path();
        cr.set_line_width(if ring.main {
            LINE_SIZE_MAIN_SCALE
        } else {
            LINE_SIZE_SCALE
        });
        cr.stroke()?;
    }

    // spokes and corner indicator disks, independent of ring smoothing
    cr.set_line_width(LINE_SIZE_SPOKE);
    for &angle in &angles {
        let end = geometry::point_on_axis(center, angle, 1.0, radius);
        cr.move_to(center.x, center.y);
        cr.line_to(end.x, end.y);
        cr.stroke()?;

        cr.arc(end.x, end.y, CORNER_INDICATOR_RADIUS, 0.0, 2.0 * PI);
        cr.fill()?;
    }

    cr.restore()
}

struct ProfileRenderer {
    points: Vec<Point>,
    color: Srgba<f64>,
    current: bool,
    hovered: Option<usize>,
    dimmed: bool,
}

impl ProfileRenderer {
    fn new(
        state: &ChartState,
        profile: &Profile,
        current: bool,
        hovered: Option<usize>,
    ) -> Self {
        let points = (0..state.category_count())
            .map(|i| state.handle_position(profile, i))
            .collect();
        Self {
            points,
            color: theme::profile_color(profile.id),
            current,
            hovered: if current { hovered } else { None },
            dimmed: current && !profile.visible,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        cr.save()?;
        cr.push_group();

        // border pass underneath, color pass on top
        self.draw_lines(cr, colors.profile_border, true)?;
        self.draw_points(cr, colors.profile_border, true)?;
        self.draw_lines(cr, self.color, false)?;
        self.draw_points(cr, self.color, false)?;

        cr.pop_group_to_source()?;
        if self.dimmed {
            cr.paint_with_alpha(HIDDEN_PROFILE_ALPHA)?;
        } else {
            cr.paint()?;
        }
        cr.restore()
    }

    fn draw_lines(
        &self,
        cr: &Context,
        color: Srgba<f64>,
        border: bool,
    ) -> Result<(), cairo::Error> {
        let base = if self.current {
            LINE_SIZE_CURRENT_PROFILE
        } else {
            LINE_SIZE_OTHER_PROFILE
        };
        set_source(cr, color);
        cr.set_line_width(if border {
            base
        } else {
            base - PROFILE_BORDER_SIZE * 2.0
        });
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            cr.move_to(a.x, a.y);
            cr.line_to(b.x, b.y);
        }
        cr.stroke()
    }

    fn draw_points(
        &self,
        cr: &Context,
        color: Srgba<f64>,
        border: bool,
    ) -> Result<(), cairo::Error> {
        set_source(cr, color);
        for (i, p) in self.points.iter().enumerate() {
            let mut radius = if self.current {
                HANDLE_RADIUS_NORMAL
            } else {
                HANDLE_RADIUS_OTHER
            };
            if self.hovered == Some(i) {
                radius = HANDLE_RADIUS_HOVERED;
            }
            cr.arc(
                p.x,
                p.y,
                if border {
                    radius
                } else {
                    radius - PROFILE_BORDER_SIZE
                },
                0.0,
                2.0 * PI,
            );
            cr.fill()?;
        }
        Ok(())
    }
}

fn draw_selector(
    cr: &Context,
    state: &ChartState,
    index: usize,
    selector: &CornerSelector,
) -> Result<(), cairo::Error> {
    let category = &state.categories[index];
    let center = state.selector_center(index);
    let triangle_radius = CATEGORY_UI_SIZE / 3.0_f64.sqrt();

    let corners: Vec<Point> = selector
        .anchor_angles()
        .into_iter()
        .map(|deg| geometry::point_on_axis(center, geometry::deg_to_rad(deg), 1.0, triangle_radius))
        .collect();

    cr.save()?;
    set_source(cr, category.color);
    cr.set_line_width(SELECTOR_LINE_SIZE);
    cr.set_line_cap(cairo::LineCap::Round);
    trace_path(cr, &corners);
    cr.close_path();
    cr.stroke()?;

    // active corner marker
    let active = corners[selector.active.index()];
    cr.arc(active.x, active.y, CATEGORY_UI_SIZE * 0.05, 0.0, 2.0 * PI);
    cr.fill()?;
    cr.restore()?;

    draw_selector_labels(cr, state, category, selector, center, &corners)
}

fn draw_selector_labels(
    cr: &Context,
    state: &ChartState,
    category: &crate::gui::chart::model::Category,
    selector: &CornerSelector,
    center: Point,
    corners: &[Point],
) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(13.0);
    set_source(cr, theme::shade(category.color, -20.0));

    let centered_text = |cr: &Context, text: &str, at: Point| -> Result<(), cairo::Error> {
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(at.x - ext.width() / 2.0, at.y + ext.height() / 2.0);
            cr.show_text(text)?;
        }
        Ok(())
    };

    centered_text(cr, &category.name, center)?;

    cr.set_font_size(10.0);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);

    if state.print_mode || selector.print_mode {
        // print output shows only the active choice, below the name
        let active = &category.corners[selector.active.index()];
        let below = Point::new(center.x, center.y + 16.0);
        centered_text(cr, &active.title, below)?;
    } else {
        for (corner, option) in corners.iter().zip(category.corners.iter()) {
            // push the label outward from the widget center
            let away = Point::new(
                corner.x + (corner.x - center.x) * 0.25,
                corner.y + (corner.y - center.y) * 0.25,
            );
            centered_text(cr, &option.title, away)?;
        }
    }

    cr.restore()
}
