//! Color packing and alpha compositing
//!
//! The ledger stores one opaque 24-bit RGB integer per cell. A
//! translucent brush stroke is resolved to an opaque color at edit
//! time by compositing against the cell's current background; the
//! same arithmetic applies to single-cell edits and image stamps.

/// Pack RGB channels into a 24-bit color integer
pub fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Unpack a 24-bit color integer into its RGB channels
pub fn channels(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
    )
}

/// Composite a drawn color with alpha over an opaque background
///
/// Per channel: `round(draw * alpha + background * (1 - alpha))`,
/// rounding half away from zero. `alpha` is expected in `[0, 1]`.
pub fn composite(r: u8, g: u8, b: u8, alpha: f64, background: u32) -> u32 {
    let (br, bg, bb) = channels(background);

    let blend = |draw: u8, back: u8| -> u8 {
        (draw as f64 * alpha + back as f64 * (1.0 - alpha)).round() as u8
    };

    pack_color(blend(r, br), blend(g, bg), blend(b, bb))
}

/// Resolve a packed RGBA image pixel against a background color
///
/// Image pixels use the canvas byte layout: red in bits 0-7, green in
/// 8-15, blue in 16-23 and an 8-bit alpha channel in 24-31.
pub fn image_pixel_color(rgba: u32, background: u32) -> u32 {
    let r = (rgba & 0xff) as u8;
    let g = ((rgba >> 8) & 0xff) as u8;
    let b = ((rgba >> 16) & 0xff) as u8;
    let alpha = ((rgba >> 24) & 0xff) as f64 / 255.0;
    composite(r, g, b, alpha, background)
}

/// Display form of a color: `#rrggbb`
pub fn color_hex(color: u32) -> String {
    format!("#{color:06x}")
}

/// Display form of a color with transparency: `#rrggbbaa`
pub fn color_hex_alpha(color: u32, alpha: f64) -> String {
    format!("#{color:06x}{:02x}", (255.0 * alpha).round() as u8)
}
