//! Color types and utilities

use std::cell::Cell;

use bytemuck::{Pod, Zeroable};

/// RGBA color with f32 components (0.0 to 1.0), as handed to the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create from a packed 0xAARRGGBB value
    pub fn from_argb(argb: u32) -> Self {
        Self::from_rgba8(
            ((argb >> 16) & 0xFF) as u8,
            ((argb >> 8) & 0xFF) as u8,
            (argb & 0xFF) as u8,
            ((argb >> 24) & 0xFF) as u8,
        )
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Convert to u8 array [r, g, b, a]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

/// Largest value a channel can hold
pub const MAX_CHANNEL: u8 = u8::MAX;

/// Mutable ARGB color
///
/// Channels are edited in place; the packed `0xAARRGGBB` integer handed to
/// the canvas is cached and only rebuilt after a channel changed.
#[derive(Clone, Debug)]
pub struct MutableColor {
    alpha: u8,
    red: u8,
    green: u8,
    blue: u8,
    packed: Cell<u32>,
    dirty: Cell<bool>,
}

impl MutableColor {
    pub fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
            packed: Cell::new(0),
            dirty: Cell::new(true),
        }
    }

    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::argb(MAX_CHANNEL, red, green, blue)
    }

    /// Unpack a `0xAARRGGBB` integer
    pub fn from_argb(argb: u32) -> Self {
        Self::argb(
            ((argb >> 24) & 0xFF) as u8,
            ((argb >> 16) & 0xFF) as u8,
            ((argb >> 8) & 0xFF) as u8,
            (argb & 0xFF) as u8,
        )
    }

    pub fn white() -> Self {
        Self::rgb(MAX_CHANNEL, MAX_CHANNEL, MAX_CHANNEL)
    }

    pub fn transparent() -> Self {
        Self::argb(0, 0, 0, 0)
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn set_alpha(&mut self, alpha: u8) -> &mut Self {
        if self.alpha != alpha {
            self.alpha = alpha;
            self.dirty.set(true);
        }
        self
    }

    /// Set alpha from a 0..1 fraction
    pub fn set_opacity(&mut self, opacity: f32) -> &mut Self {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        self.set_alpha((opacity * MAX_CHANNEL as f32).round() as u8)
    }

    /// Copy of this color with a different alpha
    pub fn with_alpha(&self, alpha: u8) -> Self {
        Self::argb(alpha, self.red, self.green, self.blue)
    }

    /// Scale the RGB channels by `amount`, leaving alpha untouched
    ///
    /// Channels are rounded to the nearest integer and saturate at 0 and 255.
    pub fn adjust(&self, amount: f32) -> Self {
        let amount = if amount.is_nan() { 1.0 } else { amount.max(0.0) };
        let scale = |channel: u8| (channel as f32 * amount).round().clamp(0.0, MAX_CHANNEL as f32) as u8;
        Self::argb(
            self.alpha,
            scale(self.red),
            scale(self.green),
            scale(self.blue),
        )
    }

    /// True when the packed form must be rebuilt on next read
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Packed `0xAARRGGBB` value
    pub fn to_argb(&self) -> u32 {
        if self.dirty.get() {
            let packed = (self.alpha as u32) << 24
                | (self.red as u32) << 16
                | (self.green as u32) << 8
                | self.blue as u32;
            self.packed.set(packed);
            self.dirty.set(false);
        }
        self.packed.get()
    }

    pub fn to_color(&self) -> Color {
        Color::from_argb(self.to_argb())
    }
}

impl PartialEq for MutableColor {
    fn eq(&self, other: &Self) -> bool {
        (self.alpha, self.red, self.green, self.blue) == (other.alpha, other.red, other.green, other.blue)
    }
}

impl Eq for MutableColor {}

impl Default for MutableColor {
    fn default() -> Self {
        Self::transparent()
    }
}

impl From<&MutableColor> for Color {
    fn from(color: &MutableColor) -> Self {
        color.to_color()
    }
}
