//! Gradient Painting
//!
//! Per-pixel painting of the picker's gradient fields and pin markers into a
//! [`PixelBuffer`]. Every routine repaints its whole target; there is no
//! partial update.

use crate::color::{hsv_to_rgb, hue_stop_color, Rgb};
use crate::surface::PixelBuffer;

/// Spacing of the hue slider's color stops, in degrees
pub const HUE_STOP_STEP: u32 = 30;

/// Paint the saturation/value field for a fixed hue.
///
/// Saturation grows left to right (`x / width`), value falls top to bottom
/// (`1 - y / height`).
pub fn paint_saturation_value_field(buf: &mut PixelBuffer, hue: f64) {
    let width = buf.width();
    let height = buf.height();

    for y in 0..height {
        let value = 1.0 - y as f64 / height as f64;
        for x in 0..width {
            let saturation = x as f64 / width as f64;
            buf.put_pixel(x, y, hsv_to_rgb(hue, saturation, value));
        }
    }

    log::debug!("Painted {}x{} field for hue {:.1}", width, height, hue);
}

/// Paint the hue/saturation field used by the single-click picker layout.
///
/// Hue sweeps 0..360 left to right, saturation grows top to bottom, value is
/// always 1.
pub fn paint_hue_saturation_field(buf: &mut PixelBuffer) {
    let width = buf.width();
    let height = buf.height();

    for y in 0..height {
        let saturation = y as f64 / height as f64;
        for x in 0..width {
            let hue = x as f64 / width as f64 * 360.0;
            buf.put_pixel(x, y, hsv_to_rgb(hue, saturation, 1.0));
        }
    }
}

/// Color stops of the hue slider gradient: one every 30 degrees, 0 to 360 inclusive
pub fn hue_slider_stops() -> Vec<Rgb> {
    (0..=360)
        .step_by(HUE_STOP_STEP as usize)
        .map(|hue| hue_stop_color(hue as f64))
        .collect()
}

/// Paint the horizontal hue slider.
///
/// Colors are interpolated linearly in RGB between neighbouring stops and
/// sampled at pixel centers, the way a canvas linear gradient fills a rect.
pub fn paint_hue_slider(buf: &mut PixelBuffer) {
    let width = buf.width();
    let height = buf.height();
    if width == 0 {
        return;
    }

    let stops = hue_slider_stops();
    let segments = stops.len() - 1;

    for x in 0..width {
        let t = (x as f64 + 0.5) / width as f64;
        let pos = t * segments as f64;
        let segment = (pos.floor() as usize).min(segments - 1);
        let color = stops[segment].lerp(stops[segment + 1], pos - segment as f64);
        for y in 0..height {
            buf.put_pixel(x, y, color);
        }
    }
}

/// Appearance of a pin marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinStyle {
    /// Outer diameter in pixels
    pub diameter: f32,
    /// Ring thickness in pixels
    pub border: f32,
    pub color: Rgb,
}

impl Default for PinStyle {
    fn default() -> Self {
        Self {
            diameter: 24.0,
            border: 4.0,
            color: Rgb::WHITE,
        }
    }
}

/// Draw a ring-shaped pin marker centered on `center`.
///
/// Only pixels whose centers fall inside the ring are touched; anything off
/// the buffer is clipped.
pub fn draw_pin(buf: &mut PixelBuffer, center: [f32; 2], style: &PinStyle) {
    let outer = style.diameter / 2.0;
    let inner = (outer - style.border).max(0.0);

    let min_x = (center[0] - outer).floor().max(0.0) as u32;
    let min_y = (center[1] - outer).floor().max(0.0) as u32;
    let max_x = ((center[0] + outer).ceil().max(0.0) as u32).min(buf.width());
    let max_y = ((center[1] + outer).ceil().max(0.0) as u32).min(buf.height());

    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f32 + 0.5 - center[0];
            let dy = y as f32 + 0.5 - center[1];
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= inner && dist <= outer {
                buf.put_pixel(x, y, style.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_corners() {
        let mut buf = PixelBuffer::new(100, 50);
        paint_saturation_value_field(&mut buf, 120.0);

        // No saturation, full value: white
        assert_eq!(buf.get_pixel(0, 0), Some(Rgb::WHITE));
        // Top right approaches the pure hue
        assert_eq!(buf.get_pixel(99, 0), Some(hsv_to_rgb(120.0, 0.99, 1.0)));
        // Value falls towards the bottom row
        let bottom = buf.get_pixel(50, 49).unwrap();
        assert!(bottom.g <= 6, "{:?}", bottom);
    }

    #[test]
    fn test_field_is_opaque() {
        let mut buf = PixelBuffer::new(8, 8);
        paint_saturation_value_field(&mut buf, 200.0);
        assert!(buf.as_bytes().chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_field_repaint_follows_hue() {
        let mut buf = PixelBuffer::new(10, 10);
        paint_saturation_value_field(&mut buf, 0.0);
        let red_side = buf.get_pixel(9, 0).unwrap();
        paint_saturation_value_field(&mut buf, 240.0);
        let blue_side = buf.get_pixel(9, 0).unwrap();
        assert!(red_side.r > red_side.b);
        assert!(blue_side.b > blue_side.r);
    }

    #[test]
    fn test_hue_saturation_field() {
        let mut buf = PixelBuffer::new(360, 10);
        paint_hue_saturation_field(&mut buf);
        // First row has no saturation
        assert_eq!(buf.get_pixel(200, 0), Some(Rgb::WHITE));
        assert_eq!(buf.get_pixel(180, 5), Some(hsv_to_rgb(180.0, 0.5, 1.0)));
    }

    #[test]
    fn test_slider_stops() {
        let stops = hue_slider_stops();
        assert_eq!(stops.len(), 13);
        assert_eq!(stops[0], Rgb::new(255, 0, 0));
        assert_eq!(stops[4], Rgb::new(0, 255, 0));
        assert_eq!(stops[12], Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_slider_gradient() {
        // 12 segments of 2 pixels each: the first pixel of each segment sits a
        // quarter of the way in
        let mut buf = PixelBuffer::new(24, 3);
        paint_hue_slider(&mut buf);
        assert_eq!(buf.get_pixel(0, 0), Some(Rgb::new(255, 32, 0)));
        assert_eq!(buf.get_pixel(8, 2), Some(Rgb::new(0, 255, 32)));
        // Every row identical
        assert_eq!(buf.get_pixel(13, 0), buf.get_pixel(13, 2));
    }

    #[test]
    fn test_draw_pin_ring() {
        let mut buf = PixelBuffer::new(40, 40);
        draw_pin(&mut buf, [20.0, 20.0], &PinStyle::default());

        // Hollow center
        assert_eq!(buf.get_pixel(20, 20), Some(Rgb::BLACK));
        // On the ring, 10px right of center
        assert_eq!(buf.get_pixel(29, 19), Some(Rgb::WHITE));
        // Outside the outer radius
        assert_eq!(buf.get_pixel(33, 20), Some(Rgb::BLACK));
    }

    #[test]
    fn test_draw_pin_clips_at_edges() {
        let mut buf = PixelBuffer::new(10, 10);
        draw_pin(&mut buf, [0.0, 0.0], &PinStyle::default());
        draw_pin(&mut buf, [10.0, 10.0], &PinStyle::default());
        assert_eq!(buf.get_pixel(9, 0), Some(Rgb::WHITE));
    }
}
