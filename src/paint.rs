use crate::node::{Color, Paint, PaintKind};
use crate::types::{PaintDetail, SimplifiedPaint};

pub fn simplify_paint(paint: &Paint) -> SimplifiedPaint {
    let detail = match paint.kind() {
        PaintKind::Solid => match &paint.color {
            Some(color) => PaintDetail::Solid { color: color_to_hex(color) },
            None => PaintDetail::None,
        },
        PaintKind::Image => PaintDetail::Image {
            image_ref: paint.image_ref.clone(),
            scale_mode: paint.scale_mode.clone(),
        },
        PaintKind::Other => PaintDetail::None,
    };
    SimplifiedPaint {
        paint_type: paint.paint_type.clone(),
        opacity: paint.opacity(),
        detail,
    }
}

pub fn simplify_paints(paints: &[Paint]) -> Vec<SimplifiedPaint> {
    paints.iter().map(simplify_paint).collect()
}

/// `#RRGGBB` when fully opaque, `#RRGGBBAA` otherwise.
pub fn color_to_hex(color: &Color) -> String {
    let [r, g, b, a] = color.rgba().map(channel);
    if a == 255 {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}

// Halves round to even: 127.5 -> 128, 126.5 -> 126.
fn channel(value: f64) -> u8 {
    (value * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}
