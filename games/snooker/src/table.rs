//! Static table geometry derived from a single size parameter.
//!
//! `size` is the table's short side; the long side is `2 * size`. Every
//! other measurement (ball, pocket, cushion, spots, D-zone) is a ratio of it.

use glam::Vec2;

use crate::balls::Colour;

/// Canvas the table is centred in.
pub const CANVAS: Vec2 = Vec2::new(1000.0, 600.0);

/// Default short side of the table in world units.
pub const DEFAULT_TABLE_SIZE: f32 = 400.0;

/// Pocket diameter in ball diameters.
const POCKET_SCALE: f32 = 1.5;

/// Fractional narrowing of a cushion's playing edge.
const CUSHION_SLOPE: f32 = 0.08;

/// Middle pockets sit this far outside the corner pockets' line.
const MIDDLE_POCKET_SHIFT: f32 = 3.0;

/// Horizontal cushions are pulled this far towards the middle pocket.
const CUSHION_INSET: f32 = 5.0;

/// How far past the play bounds a ball may travel before it is off the table.
pub const OFF_TABLE_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CushionSide {
    Upper,
    Lower,
    Left,
    Right,
}

impl CushionSide {
    pub fn name(self) -> &'static str {
        match self {
            CushionSide::Upper => "upper",
            CushionSide::Lower => "lower",
            CushionSide::Left => "left",
            CushionSide::Right => "right",
        }
    }

    /// Whether the cushion runs along the long (horizontal) side.
    pub fn is_horizontal(self) -> bool {
        matches!(self, CushionSide::Upper | CushionSide::Lower)
    }
}

/// A trapezoidal cushion. `outline` is in body-local coordinates around the
/// centroid, before rotation; the short parallel edge is at local -y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cushion {
    pub side: CushionSide,
    pub centre: Vec2,
    pub angle: f32,
    pub length: f32,
    pub thickness: f32,
    pub outline: [Vec2; 4],
}

impl Cushion {
    fn new(side: CushionSide, centre: Vec2, angle: f32, length: f32, thickness: f32) -> Self {
        Self {
            side,
            centre,
            angle,
            length,
            thickness,
            outline: trapezoid_outline(length, thickness, CUSHION_SLOPE),
        }
    }

    /// Outline in world coordinates.
    pub fn world_outline(&self) -> [Vec2; 4] {
        let rot = Vec2::from_angle(self.angle);
        self.outline.map(|p| self.centre + rot.rotate(p))
    }
}

/// Trapezoid of the given base width and height, centred on its centroid.
/// The base lies at +y, the narrower roof at -y.
fn trapezoid_outline(width: f32, height: f32, slope: f32) -> [Vec2; 4] {
    let roof = (1.0 - slope) * width;
    // Distance of the centroid from the base.
    let base_to_centroid = height * (width + 2.0 * roof) / (3.0 * (width + roof));
    let base_y = base_to_centroid;
    let roof_y = base_to_centroid - height;
    [
        Vec2::new(-width / 2.0, base_y),
        Vec2::new(-roof / 2.0, roof_y),
        Vec2::new(roof / 2.0, roof_y),
        Vec2::new(width / 2.0, base_y),
    ]
}

/// Pocket capture zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub centre: Vec2,
    pub radius: f32,
}

impl Pocket {
    /// Strictly inside the capture radius; a centre exactly on the rim stays in play.
    pub fn captures(&self, pos: Vec2) -> bool {
        pos.distance(self.centre) < self.radius
    }
}

/// Rectangle balls are racked within and measured against for off-table checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.left && pos.x <= self.right && pos.y >= self.top && pos.y <= self.bottom
    }

    /// Outside the bounds grown by `margin` on every side.
    pub fn is_beyond(&self, pos: Vec2, margin: f32) -> bool {
        pos.x > self.right + margin
            || pos.x < self.left - margin
            || pos.y > self.bottom + margin
            || pos.y < self.top - margin
    }
}

/// Semicircle on the baulk line where the cue ball may be placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DZone {
    pub centre: Vec2,
    pub radius: f32,
}

impl DZone {
    /// Inside the circle and on the baulk side of the line (boundary included).
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.distance(self.centre) <= self.radius && pos.x <= self.centre.x
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub size: f32,
    pub canvas: Vec2,
    pub centre: Vec2,
    pub ball_diameter: f32,
    pub pocket_diameter: f32,
    pub cushion_thickness: f32,
    pub cushions: [Cushion; 6],
    pub pockets: [Pocket; 6],
    pub bounds: Bounds,
    pub baulk_x: f32,
    pub d_zone: DZone,
}

impl TableLayout {
    /// Pure function of the table size and canvas.
    pub fn build(size: f32, canvas: Vec2) -> Self {
        let centre = canvas / 2.0;
        let ball_diameter = size / 36.0;
        let pocket_diameter = ball_diameter * POCKET_SCALE;
        let thickness = size / 32.0;

        let horizontal_len = size * 8.0 / 9.0 + 32.0;
        let vertical_len = size * 6.0 / 7.0 + 34.0;

        let upper_y = centre.y - size / 2.0 + thickness / 2.0;
        let lower_y = centre.y + size / 2.0 - thickness / 2.0;
        let left_half_x = centre.x - size / 2.0 + CUSHION_INSET;
        let right_half_x = centre.x + size / 2.0 - CUSHION_INSET;

        use std::f32::consts::{FRAC_PI_2, PI};
        let cushions = [
            Cushion::new(CushionSide::Upper, Vec2::new(left_half_x, upper_y), PI, horizontal_len, thickness),
            Cushion::new(CushionSide::Upper, Vec2::new(right_half_x, upper_y), PI, horizontal_len, thickness),
            Cushion::new(CushionSide::Lower, Vec2::new(left_half_x, lower_y), 0.0, horizontal_len, thickness),
            Cushion::new(CushionSide::Lower, Vec2::new(right_half_x, lower_y), 0.0, horizontal_len, thickness),
            Cushion::new(
                CushionSide::Right,
                Vec2::new(centre.x + size - thickness / 2.0, centre.y),
                -FRAC_PI_2,
                vertical_len,
                thickness,
            ),
            Cushion::new(
                CushionSide::Left,
                Vec2::new(centre.x - size + thickness / 2.0, centre.y),
                FRAC_PI_2,
                vertical_len,
                thickness,
            ),
        ];

        let radius = pocket_diameter / 2.0;
        let pocket_left = centre.x - size + radius;
        let pocket_right = centre.x + size - radius;
        let pocket_upper = centre.y - size / 2.0 + radius;
        let pocket_lower = centre.y + size / 2.0 - radius;
        let pocket = |x: f32, y: f32| Pocket {
            centre: Vec2::new(x, y),
            radius,
        };
        let pockets = [
            pocket(pocket_left, pocket_upper),
            pocket(centre.x, pocket_upper - MIDDLE_POCKET_SHIFT),
            pocket(pocket_right, pocket_upper),
            pocket(pocket_left, pocket_lower),
            pocket(centre.x, pocket_lower + MIDDLE_POCKET_SHIFT),
            pocket(pocket_right, pocket_lower),
        ];

        let left = (canvas.x - 2.0 * size) / 2.0 + 2.0 * ball_diameter;
        let top = (canvas.y - size) / 2.0 + 2.0 * ball_diameter;
        let bounds = Bounds {
            left,
            right: 2.0 * size + left - 4.0 * ball_diameter,
            top,
            bottom: size + top - 4.0 * ball_diameter,
        };

        let baulk_x = centre.x - size * 3.0 / 5.0;
        let d_zone = DZone {
            centre: Vec2::new(baulk_x, centre.y),
            radius: size / 6.0,
        };

        Self {
            size,
            canvas,
            centre,
            ball_diameter,
            pocket_diameter,
            cushion_thickness: thickness,
            cushions,
            pockets,
            bounds,
            baulk_x,
            d_zone,
        }
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_diameter / 2.0
    }

    /// Canonical spot of a colour ball.
    pub fn spot(&self, colour: Colour) -> Vec2 {
        let (cx, cy) = (self.centre.x, self.centre.y);
        let s = self.size;
        match colour {
            Colour::Blue => Vec2::new(cx, cy),
            Colour::Brown => Vec2::new(self.baulk_x, cy),
            Colour::Green => Vec2::new(self.baulk_x, cy - s / 6.0),
            Colour::Yellow => Vec2::new(self.baulk_x, cy + s / 6.0),
            Colour::Pink => Vec2::new(cx + s - s * 70.0 / 144.0, cy),
            Colour::Black => Vec2::new(cx + s - s * 35.0 / 144.0, cy),
        }
    }

    pub fn is_in_pocket(&self, pos: Vec2) -> bool {
        self.pockets.iter().any(|p| p.captures(pos))
    }

    pub fn is_off_table(&self, pos: Vec2) -> bool {
        self.bounds.is_beyond(pos, OFF_TABLE_MARGIN)
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::build(DEFAULT_TABLE_SIZE, CANVAS)
    }
}
