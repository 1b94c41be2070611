//! Event color assignment.
//!
//! Generated colors are kept dark so white-background printouts stay
//! legible: lightness is capped well below the midpoint of the HSL cylinder.

use crate::row::non_empty;
use crate::settings::{ColorSettings, ColorTrigger};

/// Perceived brightness below which a color counts as dark.
pub const DARK_THRESHOLD: f32 = 0.5;

/// Pick the color for a row: the COLOR cell, or a generated dark color.
pub fn assign_color(cell: &Option<String>, settings: &ColorSettings, rng: &mut fastrand::Rng) -> String {
    let cell = non_empty(cell);

    match settings.trigger {
        ColorTrigger::Blank => match cell {
            Some(color) => color.to_string(),
            None => random_dark_color(rng),
        },
        ColorTrigger::Sentinel => match cell {
            Some(token) if token.eq_ignore_ascii_case(&settings.sentinel) => random_dark_color(rng),
            Some(color) => color.to_string(),
            None => settings.fallback.clone(),
        },
    }
}

/// Random saturated color with low lightness, as `#rrggbb`.
pub fn random_dark_color(rng: &mut fastrand::Rng) -> String {
    let h = rng.f32() * 360.0;
    // Saturation: 55% - 95%
    let s = 0.55 + rng.f32() * 0.40;
    // Lightness: 15% - 28%, keeps even saturated yellows under the threshold
    let l = 0.15 + rng.f32() * 0.13;

    let (r, g, b) = hsl_to_rgb(h, s, l);
    format!(
        "#{:02x}{:02x}{:02x}",
        to_byte(r),
        to_byte(g),
        to_byte(b)
    )
}

fn to_byte(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// HSL to RGB, components in [0.0, 1.0]
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = if (0.0..60.0).contains(&h) {
        (c, x, 0.0)
    } else if (60.0..120.0).contains(&h) {
        (x, c, 0.0)
    } else if (120.0..180.0).contains(&h) {
        (0.0, c, x)
    } else if (180.0..240.0).contains(&h) {
        (0.0, x, c)
    } else if (240.0..300.0).contains(&h) {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r1 + m, g1 + m, b1 + m)
}

/// Perceptual brightness of a `#rrggbb` color, or None if it is not one.
pub fn brightness(hex: &str) -> Option<f32> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
    Some(0.299 * r + 0.587 * g + 0.114 * b)
}
