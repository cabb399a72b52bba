//! Lyon-based vector drawing.
//!
//! Every visible thing on the table (felt, cushions, pockets, balls, cue,
//! overlays) is tessellated on the CPU into a flat triangle list that the
//! browser renderer reads straight out of wasm memory.
//!
//! ```ignore
//! ctx.vectors.fill_circle(ball_pos, radius, VectorColor::RED);
//! ctx.vectors.fill_rotated_rect(stick_centre, Vec2::new(50.0, 2.0), angle, orange);
//! ctx.vectors.stroke_polyline(&[from, to], 1.0, VectorColor::WHITE);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

/// Tessellation tolerance in world units.
const TOLERANCE: f32 = 0.25;

/// Per-vertex data for vector rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(p: lyon::math::Point, color: VectorColor) -> Self {
        Self {
            x: p.x,
            y: p.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// RGBA color for vector drawing operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    /// Create a color from RGBA components (0.0 - 1.0).
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGB u8 values (0-255) with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Create a color from RGBA u8 values (0-255).
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create a color with the given alpha value.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise blend; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

struct FillVertexCtor {
    color: VectorColor,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

struct StrokeVertexCtor {
    color: VectorColor,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

fn polygon_path(points: &[Vec2], closed: bool) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(closed);
    builder.build()
}

fn circle_path(center: Vec2, radius: f32) -> Path {
    let mut builder = Path::builder();
    builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
    builder.build()
}

/// Holds lyon tessellators and the output triangle list.
/// Cleared each frame and repopulated by drawing commands, in paint order.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * VectorVertex::FLOATS),
        }
    }

    /// Clear the vertex buffer. Called at the start of each frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of vertices currently in the buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// The triangle list as typed vertices.
    pub fn vertices(&self) -> &[VectorVertex] {
        bytemuck::cast_slice(self.buffer.as_slice())
    }

    /// Raw pointer to the flat float buffer (for SAB copy).
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    /// Expand indexed geometry into the flat triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(v)));
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill(&mut self, path: &Path, color: VectorColor) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );
        match result {
            Ok(_) => self.flush_geometry(),
            Err(e) => {
                log::debug!("fill tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn stroke(&mut self, path: &Path, width: f32, color: VectorColor) {
        if width <= 0.0 {
            return;
        }
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );
        match result {
            Ok(_) => self.flush_geometry(),
            Err(e) => {
                log::debug!("stroke tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Fill a closed polygon (convex or concave).
    pub fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() < 3 {
            return;
        }
        let path = polygon_path(points, true);
        self.fill(&path, color);
    }

    /// Fill an axis-aligned rectangle with its top-left corner at `pos`.
    pub fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, color: VectorColor) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let points = [
            pos,
            Vec2::new(pos.x + width, pos.y),
            Vec2::new(pos.x + width, pos.y + height),
            Vec2::new(pos.x, pos.y + height),
        ];
        self.fill_polygon(&points, color);
    }

    /// Fill a rectangle centred at `center`, rotated by `angle` radians.
    pub fn fill_rotated_rect(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        angle: f32,
        color: VectorColor,
    ) {
        let rot = Vec2::from_angle(angle);
        let corners = [
            Vec2::new(-half_extents.x, -half_extents.y),
            Vec2::new(half_extents.x, -half_extents.y),
            Vec2::new(half_extents.x, half_extents.y),
            Vec2::new(-half_extents.x, half_extents.y),
        ]
        .map(|c| center + rot.rotate(c));
        self.fill_polygon(&corners, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }
        let path = circle_path(center, radius);
        self.fill(&path, color);
    }

    /// Stroke an open polyline.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 2 {
            return;
        }
        let path = polygon_path(points, false);
        self.stroke(&path, width, color);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }
        let path = circle_path(center, radius);
        self.stroke(&path, width, color);
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn vector_vertex_is_24_bytes() {
        assert_eq!(size_of::<VectorVertex>(), 24);
        assert_eq!(VectorVertex::STRIDE_BYTES, 24);
    }

    #[test]
    fn color_from_bytes() {
        let c = VectorColor::rgba8(255, 128, 0, 100);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.5).abs() < 0.01);
        assert_eq!(c.b, 0.0);
        assert!((c.a - 0.392).abs() < 0.01);
    }

    #[test]
    fn color_lerp_clamps() {
        let mid = VectorColor::BLACK.lerp(VectorColor::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert_eq!(VectorColor::BLACK.lerp(VectorColor::WHITE, 3.0), VectorColor::WHITE);
        assert_eq!(VectorColor::BLACK.lerp(VectorColor::WHITE, -1.0), VectorColor::BLACK);
    }

    #[test]
    fn fill_polygon_triangle() {
        let mut state = VectorState::new();
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 100.0),
        ];
        state.fill_polygon(&points, VectorColor::RED);
        assert_eq!(state.vertex_count(), 3);
        assert!(state.vertices().iter().all(|v| v.r == 1.0 && v.g == 0.0));
    }

    #[test]
    fn fill_rect_produces_two_triangles() {
        let mut state = VectorState::new();
        state.fill_rect(Vec2::ZERO, 100.0, 50.0, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 6);

        state.fill_rect(Vec2::ZERO, 0.0, 50.0, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 6);
    }

    #[test]
    fn rotated_rect_stays_around_its_centre() {
        let mut state = VectorState::new();
        let centre = Vec2::new(200.0, 100.0);
        state.fill_rotated_rect(
            centre,
            Vec2::new(50.0, 2.0),
            std::f32::consts::FRAC_PI_2,
            VectorColor::WHITE,
        );
        assert_eq!(state.vertex_count(), 6);
        for v in state.vertices() {
            // Rotated a quarter turn: long axis now vertical.
            assert!((v.x - centre.x).abs() <= 2.01, "x={}", v.x);
            assert!((v.y - centre.y).abs() <= 50.01, "y={}", v.y);
        }
    }

    #[test]
    fn fill_circle_produces_vertices() {
        let mut state = VectorState::new();
        state.fill_circle(Vec2::new(50.0, 50.0), 25.0, VectorColor::YELLOW);
        assert!(state.vertex_count() > 0);
        assert_eq!(state.vertex_count() % 3, 0);
    }

    #[test]
    fn strokes_produce_vertices() {
        let mut state = VectorState::new();
        state.stroke_polyline(&[Vec2::ZERO, Vec2::new(100.0, 100.0)], 5.0, VectorColor::WHITE);
        let after_line = state.vertex_count();
        assert!(after_line > 0);

        state.stroke_circle(Vec2::new(10.0, 10.0), 5.0, 1.0, VectorColor::WHITE);
        assert!(state.vertex_count() > after_line);
    }

    #[test]
    fn clear_resets_buffer() {
        let mut state = VectorState::new();
        state.fill_rect(Vec2::ZERO, 100.0, 50.0, VectorColor::WHITE);
        assert!(state.vertex_count() > 0);

        state.clear();
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn degenerate_shapes_produce_nothing() {
        let mut state = VectorState::new();
        state.fill_polygon(&[], VectorColor::RED);
        state.fill_polygon(&[Vec2::ZERO, Vec2::ONE], VectorColor::RED);
        state.fill_circle(Vec2::ZERO, 0.0, VectorColor::RED);
        state.stroke_polyline(&[Vec2::ZERO], 2.0, VectorColor::RED);
        state.stroke_circle(Vec2::ZERO, 5.0, 0.0, VectorColor::RED);
        assert_eq!(state.vertex_count(), 0);
    }
}
