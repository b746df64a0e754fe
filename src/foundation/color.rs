/// Straight-alpha RGBA color.
///
/// The engine serializes to SVG markup, so channels stay straight (not
/// premultiplied) and alpha is kept as a fraction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// White at the given alpha.
    pub const fn white(a: f32) -> Self {
        Self::rgba(255, 255, 255, a)
    }

    /// Invisible-but-hittable paint used for pointer-target strokes.
    pub const fn hit() -> Self {
        Self::rgba(0, 0, 0, 0.001)
    }

    /// SVG paint string: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_svg(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert HSL (`h` in degrees, `s`/`l` in `[0, 100]`) to an opaque color.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let s = s / 100.0;
        let l = l / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hh = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hh % 2.0 - 1.0).abs());

        let (r, g, b) = match hh {
            v if v < 1.0 => (c, x, 0.0),
            v if v < 2.0 => (x, c, 0.0),
            v if v < 3.0 => (0.0, c, x),
            v if v < 4.0 => (0.0, x, c),
            v if v < 5.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
