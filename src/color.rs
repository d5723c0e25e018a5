//! sRGB hex swatches to linear-light colours.
//!
//! Every colour in a generated scene starts life as an sRGB hex triplet and is converted here;
//! the linear types have no public constructor taking raw channel values.

use rand::Rng;

use crate::foundation::error::{MetaloopError, MetaloopResult};

/// Fixed swatch list sampled by [`random_palette_color`].
pub const PALETTE: [&str; 14] = [
    "#FC766A", "#5B84B1", "#5F4B8B", "#E69A8D", "#42EADD", "#CDB599", "#00A4CC", "#F95700",
    "#00203F", "#ADEFD1", "#606060", "#D6ED17", "#ED2B33", "#D85A7F",
];

/// Linear-light RGB, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LinearRgb {
    r: f64,
    g: f64,
    b: f64,
}

/// Linear-light RGBA, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LinearRgba {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl LinearRgb {
    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl LinearRgba {
    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    /// Drop the alpha channel.
    pub fn rgb(self) -> LinearRgb {
        LinearRgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn check_unit(c: f64) -> MetaloopResult<f64> {
    if (0.0..=1.0).contains(&c) {
        Ok(c)
    } else {
        Err(MetaloopError::InvalidColorComponent(c))
    }
}

/// Piecewise sRGB transfer function (encoded -> linear).
pub fn srgb_to_linear(c: f64) -> MetaloopResult<f64> {
    let c = check_unit(c)?;
    if c <= 0.04045 {
        Ok(c / 12.92)
    } else {
        Ok(((c + 0.055) / 1.055).powf(2.4))
    }
}

/// Inverse of [`srgb_to_linear`] (linear -> encoded).
pub fn linear_to_srgb(c: f64) -> MetaloopResult<f64> {
    let c = check_unit(c)?;
    if c <= 0.003_130_8 {
        Ok(c * 12.92)
    } else {
        Ok(1.055 * c.powf(1.0 / 2.4) - 0.055)
    }
}

/// Parse `RRGGBB` or `#RRGGBB` (case-insensitive) into linear RGB.
pub fn hex_to_linear_rgb(hex: &str) -> MetaloopResult<LinearRgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MetaloopError::invalid_hex(hex));
    }

    let channel = |range: std::ops::Range<usize>| -> MetaloopResult<f64> {
        let byte = u8::from_str_radix(&digits[range], 16)
            .map_err(|_| MetaloopError::invalid_hex(hex))?;
        srgb_to_linear(f64::from(byte) / 255.0)
    };

    Ok(LinearRgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// [`hex_to_linear_rgb`] with an explicit alpha (straight, not premultiplied).
pub fn hex_to_linear_rgba(hex: &str, alpha: f64) -> MetaloopResult<LinearRgba> {
    let alpha = check_unit(alpha)?;
    let rgb = hex_to_linear_rgb(hex)?;
    Ok(LinearRgba {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
        a: alpha,
    })
}

/// Pick one [`PALETTE`] swatch uniformly, as opaque linear RGBA.
pub fn random_palette_color<R: Rng + ?Sized>(rng: &mut R) -> MetaloopResult<LinearRgba> {
    let hex = PALETTE[rng.gen_range(0..PALETTE.len())];
    hex_to_linear_rgba(hex, 1.0)
}
