//! Temperature to colour mapping for the heat map
//!
//! The scale spreads a fixed spectrum of colour stops evenly over a numeric
//! range. Each pair of neighbouring stops forms one gradient segment of equal
//! width; inside a segment every RGB channel is interpolated linearly and
//! rounded to the nearest integer.

/// Spectrum used for the heat map, coldest (violet) to hottest (red)
pub const SPECTRUM: [&str; 11] = [
    "#8b00ff", "#4b0082", "#0000ff", "#0080ff", "#00ffff", "#00ff80", "#00ff00", "#80ff00",
    "#ffff00", "#ff8000", "#ff0000",
];

/// Colour used for cells that carry no data
pub const BLACK: &str = "#000";

pub const WHITE: &str = "#fff";

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            6 => Some(Self {
                r: u8::from_str_radix(&digits[0..2], 16).ok()?,
                g: u8::from_str_radix(&digits[2..4], 16).ok()?,
                b: u8::from_str_radix(&digits[4..6], 16).ok()?,
            }),
            3 => {
                let short = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
                Some(Self {
                    r: short(0).ok()?,
                    g: short(1).ok()?,
                    b: short(2).ok()?,
                })
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Maps numbers in `[min, max]` onto the spectrum
#[derive(Debug, Clone)]
pub struct ColourScale {
    min: f64,
    max: f64,
    stops: Vec<Rgb>,
}

impl ColourScale {
    /// Scale over the heat map spectrum
    pub fn new(min: f64, max: f64) -> Self {
        let stops = SPECTRUM.iter().filter_map(|hex| Rgb::from_hex(hex)).collect();
        Self::with_stops(min, max, stops)
    }

    /// Scale over custom colour stops
    pub fn with_stops(min: f64, max: f64, stops: Vec<Rgb>) -> Self {
        Self { min, max, stops }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Interpolated colour for `value`, as `#rrggbb`
    pub fn colour_at(&self, value: f64) -> String {
        self.rgb_at(value).to_hex()
    }

    pub fn rgb_at(&self, value: f64) -> Rgb {
        let first = self.stops.first().copied().unwrap_or(Rgb { r: 0, g: 0, b: 0 });
        let segments = self.stops.len().saturating_sub(1);
        let span = self.max - self.min;
        // A single stop, an empty range or a non-numeric input pins the first stop.
        if segments == 0 || !span.is_finite() || span <= 0.0 || value.is_nan() {
            return first;
        }

        let value = value.clamp(self.min, self.max);
        let width = span / segments as f64;
        let index = (((value - self.min) / width).floor() as usize).min(segments - 1);
        let lower = self.min + width * index as f64;
        let fraction = ((value - lower) / width).clamp(0.0, 1.0);

        let from = self.stops[index];
        let to = self.stops[index + 1];
        Rgb {
            r: channel(from.r, to.r, fraction),
            g: channel(from.g, to.g, fraction),
            b: channel(from.b, to.b, fraction),
        }
    }
}

fn channel(from: u8, to: u8, fraction: f64) -> u8 {
    let value = f64::from(from) + (f64::from(to) - f64::from(from)) * fraction;
    value.round().clamp(0.0, 255.0) as u8
}
