//! Heatmap color scale: white → cyan → green → yellow → red.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// An anchor of the gradient: the color reached at ratio `pct`.
pub struct ColorStop {
    pub pct: f64,
    pub color: Rgb,
}

pub const STOPS: &[ColorStop] = &[
    ColorStop {
        pct: 0.0,
        color: Rgb {
            r: 0xff,
            g: 0xff,
            b: 0xff,
        },
    },
    ColorStop {
        pct: 0.25,
        color: Rgb {
            r: 0,
            g: 0xff,
            b: 0xff,
        },
    },
    ColorStop {
        pct: 0.5,
        color: Rgb {
            r: 0,
            g: 0xff,
            b: 0,
        },
    },
    ColorStop {
        pct: 0.75,
        color: Rgb {
            r: 0xff,
            g: 0xff,
            b: 0,
        },
    },
    ColorStop {
        pct: 1.0,
        color: Rgb { r: 0xff, g: 0, b: 0 },
    },
];

fn mix(lower: u8, upper: u8, t: f64) -> u8 {
    let lower = f64::from(lower);
    // Exact when both stops share the channel. `as` saturates out-of-range values.
    (lower + (f64::from(upper) - lower) * t).floor() as u8
}

/// Map a normalized ratio to a color by linear interpolation between the
/// two surrounding stops. Inputs outside [0, 1] are not clamped.
pub fn color_for(pct: f64) -> Rgb {
    // Upper stop: first stop past `pct`, never beyond the last one.
    let last = STOPS.len() - 1;
    let upper_idx = (1..last).find(|&i| pct < STOPS[i].pct).unwrap_or(last);
    let lower = &STOPS[upper_idx - 1];
    let upper = &STOPS[upper_idx];

    let t = (pct - lower.pct) / (upper.pct - lower.pct);

    Rgb {
        r: mix(lower.color.r, upper.color.r, t),
        g: mix(lower.color.g, upper.color.g, t),
        b: mix(lower.color.b, upper.color.b, t),
    }
}

#[cfg(test)]
#[path = "color_test.rs"]
mod tests;
