//! PNG export: renders the chart in print mode onto an offscreen surface.

use super::chart::{self, ChartState};
use super::theme::ThemeColors;
use std::path::Path;
use thiserror::Error;

const EXPORT_SCALE: f64 = 2.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: surface has no area")]
    EmptySurface,
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("png write error: {0}")]
    Png(#[from] cairo::IoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rasterizes the full chart at 2x over a white background. Print mode is
/// toggled on every widget for the duration of the render.
pub fn export_png(
    state: &mut ChartState,
    colors: &ThemeColors,
    path: &Path,
) -> Result<(), ExportError> {
    if state.width <= 0.0 || state.height <= 0.0 {
        return Err(ExportError::EmptySurface);
    }

    let surface = cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        (state.width * EXPORT_SCALE) as i32,
        (state.height * EXPORT_SCALE) as i32,
    )?;

    state.set_print_mode(true);
    let rendered = render(&surface, state, colors);
    state.set_print_mode(false);
    rendered?;

    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    let mut file = fs_err::File::create(path)?;
    surface.write_to_png(&mut file)?;
    Ok(())
}

fn render(
    surface: &cairo::ImageSurface,
    state: &ChartState,
    colors: &ThemeColors,
) -> Result<(), ExportError> {
    let cr = cairo::Context::new(surface)?;
    cr.scale(EXPORT_SCALE, EXPORT_SCALE);
    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.paint()?;
    chart::draw(&cr, state, colors)?;
    Ok(())
}
