//! Tessellation of scene primitives into triangles
//!
//! Everything comes out as a triangle list in logical field coordinates;
//! the pipeline maps to clip space. Text is left to the overlay.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::palette::Color;
use crate::scene::DrawCmd;

/// 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    fn at(p: Vec2, color: Color) -> Self {
        Self::new(p.x, p.y, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Segments used for round shapes
const CIRCLE_SEGMENTS: u32 = 24;

/// Append the triangles for one draw command (text produces none)
pub fn tessellate(cmd: &DrawCmd, offset: Vec2, out: &mut Vec<Vertex>) {
    match cmd {
        DrawCmd::Rect { pos, size, color } => rect(out, *pos + offset, *size, *color),
        DrawCmd::StrokeRect {
            pos,
            size,
            width,
            color,
        } => stroke_rect(out, *pos + offset, *size, *width, *color),
        DrawCmd::Circle {
            center,
            radius,
            color,
        } => circle(out, *center + offset, *radius, *color),
        DrawCmd::Ring {
            center,
            radius,
            width,
            color,
        } => ellipse_outline(out, *center + offset, Vec2::splat(*radius), *width, *color),
        DrawCmd::Ellipse {
            center,
            radii,
            width,
            color,
        } => ellipse_outline(out, *center + offset, *radii, *width, *color),
        DrawCmd::Line {
            from,
            to,
            width,
            color,
        } => line(out, *from + offset, *to + offset, *width, *color),
        DrawCmd::Digits {
            pos,
            value,
            width,
            scale,
            color,
        } => number(out, *pos + offset, *value, *width, *scale, *color),
        DrawCmd::Text { .. } => {}
    }
}

/// Filled quad
pub fn rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, color: Color) {
    let a = pos;
    let b = pos + Vec2::new(size.x, 0.0);
    let c = pos + size;
    let d = pos + Vec2::new(0.0, size.y);
    out.extend_from_slice(&[
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(a, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
    ]);
}

/// Four edge quads centred on the outline
pub fn stroke_rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, width: f32, color: Color) {
    let h = width / 2.0;
    rect(out, pos - Vec2::splat(h), Vec2::new(size.x + width, width), color);
    rect(out, Vec2::new(pos.x - h, pos.y + size.y - h), Vec2::new(size.x + width, width), color);
    rect(out, Vec2::new(pos.x - h, pos.y + h), Vec2::new(width, size.y - width), color);
    rect(out, Vec2::new(pos.x + size.x - h, pos.y + h), Vec2::new(width, size.y - width), color);
}

/// Triangle fan disc
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color) {
    if radius <= 0.0 {
        return;
    }
    for i in 0..CIRCLE_SEGMENTS {
        let t1 = i as f32 / CIRCLE_SEGMENTS as f32 * TAU;
        let t2 = (i + 1) as f32 / CIRCLE_SEGMENTS as f32 * TAU;
        out.push(Vertex::at(center, color));
        out.push(Vertex::at(center + Vec2::from_angle(t1) * radius, color));
        out.push(Vertex::at(center + Vec2::from_angle(t2) * radius, color));
    }
}

/// Band of `width` around an ellipse (a ring when both radii match)
pub fn ellipse_outline(out: &mut Vec<Vertex>, center: Vec2, radii: Vec2, width: f32, color: Color) {
    let inner = (radii - Vec2::splat(width / 2.0)).max(Vec2::ZERO);
    let outer = radii + Vec2::splat(width / 2.0);

    for i in 0..CIRCLE_SEGMENTS {
        let d1 = Vec2::from_angle(i as f32 / CIRCLE_SEGMENTS as f32 * TAU);
        let d2 = Vec2::from_angle((i + 1) as f32 / CIRCLE_SEGMENTS as f32 * TAU);

        let inner1 = center + d1 * inner;
        let outer1 = center + d1 * outer;
        let inner2 = center + d2 * inner;
        let outer2 = center + d2 * outer;

        // Two triangles per segment
        out.push(Vertex::at(inner1, color));
        out.push(Vertex::at(outer1, color));
        out.push(Vertex::at(inner2, color));

        out.push(Vertex::at(inner2, color));
        out.push(Vertex::at(outer1, color));
        out.push(Vertex::at(outer2, color));
    }
}

/// Thick segment as a quad
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Color) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = dir.perp() * (width / 2.0);

    out.extend_from_slice(&[
        Vertex::at(from + perp, color),
        Vertex::at(from - perp, color),
        Vertex::at(to + perp, color),
        Vertex::at(to + perp, color),
        Vertex::at(from - perp, color),
        Vertex::at(to - perp, color),
    ]);
}

// === Seven-segment score digits ===

/// Lit segments per digit, in a b c d e f g order
const SEGMENTS: [[bool; 7]; 10] = {
    const O: bool = false;
    const I: bool = true;
    [
        [I, I, I, I, I, I, O],
        [O, I, I, O, O, O, O],
        [I, I, O, I, I, O, I],
        [I, I, I, I, O, O, I],
        [O, I, I, O, O, I, I],
        [I, O, I, I, O, I, I],
        [I, O, I, I, I, I, I],
        [I, I, I, O, O, O, O],
        [I, I, I, I, I, I, I],
        [I, I, I, I, O, I, I],
    ]
};

/// Horizontal advance of one digit at scale 1
pub const DIGIT_ADVANCE: f32 = 30.0;

/// Segments lit for a single decimal digit (out-of-range shows 0)
pub fn digit_segments(digit: u32) -> [bool; 7] {
    SEGMENTS.get(digit as usize).copied().unwrap_or(SEGMENTS[0])
}

/// One seven-segment digit with its top-left at `pos`
pub fn digit(out: &mut Vec<Vertex>, pos: Vec2, value: u32, scale: f32, color: Color) {
    let sw = 4.0 * scale;
    let sl = 22.0 * scale;
    let gap = 2.0 * scale;
    let (x, y) = (pos.x, pos.y);

    let horizontal = Vec2::new(sl, sw);
    let vertical = Vec2::new(sw, sl);
    let placements = [
        (Vec2::new(x + gap, y), horizontal),
        (Vec2::new(x + sl - sw + gap, y + gap), vertical),
        (Vec2::new(x + sl - sw + gap, y + sl + gap), vertical),
        (Vec2::new(x + gap, y + sl * 2.0), horizontal),
        (Vec2::new(x, y + sl + gap), vertical),
        (Vec2::new(x, y + gap), vertical),
        (Vec2::new(x + gap, y + sl), horizontal),
    ];

    for (lit, (at, size)) in digit_segments(value).into_iter().zip(placements) {
        if lit {
            rect(out, at, size, color);
        }
    }
}

/// Zero-padded number, `width` digits wide
pub fn number(out: &mut Vec<Vertex>, pos: Vec2, value: u32, width: usize, scale: f32, color: Color) {
    let text = format!("{:0width$}", value, width = width);
    for (i, ch) in text.chars().enumerate() {
        let d = ch.to_digit(10).unwrap_or(0);
        let at = pos + Vec2::new(i as f32 * DIGIT_ADVANCE * scale, 0.0);
        digit(out, at, d, scale, color);
    }
}
