use gtk::prelude::*;
use gtk4 as gtk;
use palette::{FromColor, Hsl, Srgb, Srgba};

/// Hue step between successive profile ids. Golden-angle stepping keeps
/// adjacent ids visually distinct.
const PROFILE_HUE_STEP: f64 = 137.508;
const PROFILE_SATURATION: f64 = 0.8;
const PROFILE_LIGHTNESS: f64 = 0.4;

pub struct ThemeColors {
    pub grid: Srgba<f64>,
    pub profile_border: Srgba<f64>,
    pub background: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            grid: Self::lookup_color(
                context,
                "borders",
                Srgba::new(0.42, 0.42, 0.42, 1.0),
                Some(1.0),
            ),
            profile_border: Srgba::new(0.0, 0.0, 0.0, 1.0),
            background: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(0.98, 0.98, 0.98, 1.0),
                Some(1.0),
            ),
        }
    }

    /// Style-independent colors, used for PNG export and tests.
    pub fn fallback() -> Self {
        Self {
            grid: Srgba::new(0.42, 0.42, 0.42, 1.0),
            profile_border: Srgba::new(0.0, 0.0, 0.0, 1.0),
            background: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

/// Deterministic display color for a profile id.
pub fn profile_color(id: crate::session::ProfileId) -> Srgba<f64> {
    let hue = (u64::from(id) as f64 * PROFILE_HUE_STEP).rem_euclid(360.0);
    let rgb: Srgb<f64> = Srgb::from_color(Hsl::new_srgb(hue, PROFILE_SATURATION, PROFILE_LIGHTNESS));
    Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0)
}

/// Darkens (negative percent) or lightens a color for selector labels.
pub fn shade(color: Srgba<f64>, percent: f64) -> Srgba<f64> {
    let amount = percent / 100.0;
    let adjust = |c: f64| (c + amount).clamp(0.0, 1.0);
    Srgba::new(
        adjust(color.red),
        adjust(color.green),
        adjust(color.blue),
        color.alpha,
    )
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.motivrad-window, .motivrad-drawing-area {
    background-color: @theme_base_color;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gtk::gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
