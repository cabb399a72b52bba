//! Scene drawing through the engine's vector layer.
//!
//! Everything is repainted every tick in paint order: background, table,
//! pockets, balls, stick or placement preview, particles, overlays.

use glam::Vec2;
use snooker_engine::{VectorColor, VectorState};

use crate::balls::{BallRole, Colour};
use crate::cue::StickPose;
use crate::particles::{ParticleField, ParticleKind};
use crate::table::TableLayout;
use crate::weather::Weather;

const BAULK_STROKE: f32 = 5.0;
const FRAME_STROKE: f32 = 10.0;
const WOOD_THICKNESS: f32 = 10.0;
const WOOD_OFFSET: f32 = 1.0;
const BALL_OUTLINE: f32 = 1.0;
const HIGHLIGHT_RADIUS: f32 = 3.0;
const PREVIEW_RADIUS: f32 = 10.0;
const STICK_LENGTH: f32 = 100.0;
const STICK_WIDTH: f32 = 4.0;
const TIP_RADIUS: f32 = 2.0;
const GUIDE_LENGTH: f32 = 300.0;
const GUIDE_RING_RADIUS: f32 = 5.0;
const GUIDE_STROKE: f32 = 2.0;
const POWER_BAR_HEIGHT: f32 = 40.0;
/// Tip distance that fills the power bar.
const POWER_BAR_FULL: f32 = 111.2;
const ARC_SEGMENTS: usize = 32;

/// Named CSS colours the table is painted with.
mod css {
    use snooker_engine::VectorColor;

    pub fn green() -> VectorColor {
        VectorColor::rgb8(0, 128, 0)
    }

    pub fn ghostwhite() -> VectorColor {
        VectorColor::rgb8(248, 248, 255)
    }

    pub fn darkgreen() -> VectorColor {
        VectorColor::rgb8(0, 100, 0)
    }

    pub fn darkseagreen() -> VectorColor {
        VectorColor::rgb8(143, 188, 143)
    }

    pub fn darkolivegreen() -> VectorColor {
        VectorColor::rgb8(85, 107, 47)
    }

    pub fn gold() -> VectorColor {
        VectorColor::rgb8(255, 215, 0)
    }

    pub fn brown() -> VectorColor {
        VectorColor::rgb8(165, 42, 42)
    }

    pub fn thistle() -> VectorColor {
        VectorColor::rgb8(216, 191, 216)
    }

    pub fn mintcream() -> VectorColor {
        VectorColor::rgb8(245, 255, 250)
    }

    pub fn darkblue() -> VectorColor {
        VectorColor::rgb8(0, 0, 139)
    }

    pub fn lightgrey() -> VectorColor {
        VectorColor::rgb8(211, 211, 211)
    }

    pub fn whitesmoke() -> VectorColor {
        VectorColor::rgb8(245, 245, 245)
    }

    pub fn blue() -> VectorColor {
        VectorColor::rgb8(0, 0, 255)
    }

    pub fn greenyellow() -> VectorColor {
        VectorColor::rgb8(173, 255, 47)
    }

    pub fn pink() -> VectorColor {
        VectorColor::rgb8(255, 192, 203)
    }

    pub fn darkslategrey() -> VectorColor {
        VectorColor::rgb8(47, 79, 79)
    }

    pub fn orange() -> VectorColor {
        VectorColor::rgb8(255, 165, 0)
    }

    pub fn lime() -> VectorColor {
        VectorColor::rgb8(0, 255, 0)
    }
}

/// Weather-dependent colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: VectorColor,
    pub felt: VectorColor,
    pub baulk: VectorColor,
    pub cushion: VectorColor,
    pub ball_outline: VectorColor,
    pub guide: VectorColor,
    pub preview_outline: Option<VectorColor>,
}

impl Palette {
    pub fn for_weather(weather: Weather) -> Self {
        match weather {
            Weather::Normal => Self {
                background: css::thistle(),
                felt: css::green(),
                baulk: VectorColor::WHITE,
                cushion: css::darkgreen(),
                ball_outline: css::darkgreen(),
                guide: VectorColor::rgba8(255, 255, 255, 100),
                preview_outline: None,
            },
            Weather::Snow => Self {
                background: css::mintcream(),
                felt: css::ghostwhite(),
                baulk: css::green(),
                cushion: css::darkseagreen(),
                ball_outline: css::lightgrey(),
                guide: VectorColor::rgba8(0, 0, 0, 100),
                preview_outline: Some(VectorColor::BLACK),
            },
            Weather::Rain => Self {
                background: css::darkblue(),
                felt: css::darkgreen(),
                baulk: VectorColor::WHITE,
                cushion: css::darkolivegreen(),
                ball_outline: css::darkgreen(),
                guide: VectorColor::rgba8(255, 255, 255, 100),
                preview_outline: None,
            },
        }
    }
}

pub fn ball_colour(role: BallRole) -> VectorColor {
    match role {
        BallRole::Cue => css::whitesmoke(),
        BallRole::Red => VectorColor::RED,
        BallRole::Colour(c) => match c {
            Colour::Yellow => VectorColor::YELLOW,
            Colour::Green => css::greenyellow(),
            Colour::Brown => css::brown(),
            Colour::Blue => css::blue(),
            Colour::Pink => css::pink(),
            Colour::Black => css::darkslategrey(),
        },
    }
}

fn highlight(role: BallRole) -> VectorColor {
    match role {
        BallRole::Cue => VectorColor::WHITE,
        BallRole::Red => VectorColor::rgba8(255, 255, 255, 60),
        BallRole::Colour(_) => VectorColor::rgba8(255, 255, 255, 30),
    }
}

/// Power bar fill: green to yellow over the first half, yellow to red after.
pub fn power_colour(tip_distance: f32) -> VectorColor {
    let normal = tip_distance / 100.0;
    let green = VectorColor::rgb(0.0, 1.0, 0.0);
    if normal < 0.5 {
        green.lerp(VectorColor::YELLOW, normal * 2.0)
    } else {
        VectorColor::YELLOW.lerp(VectorColor::RED, (normal - 0.5) * 2.0)
    }
}

pub fn draw_background(v: &mut VectorState, palette: &Palette, canvas: Vec2) {
    v.fill_rect(Vec2::ZERO, canvas.x, canvas.y, palette.background);
}

pub fn draw_table(v: &mut VectorState, palette: &Palette, layout: &TableLayout) {
    let s = layout.size;
    let c = layout.centre;

    v.fill_rect(c - Vec2::new(s, s / 2.0), 2.0 * s, s, palette.felt);

    // Baulk line and D.
    let top = c.y - s / 2.0;
    v.stroke_polyline(
        &[Vec2::new(layout.baulk_x, top), Vec2::new(layout.baulk_x, top + s)],
        BAULK_STROKE,
        palette.baulk,
    );
    let d = layout.d_zone;
    let arc: Vec<Vec2> = (0..=ARC_SEGMENTS)
        .map(|i| {
            let a = std::f32::consts::FRAC_PI_2 + std::f32::consts::PI * i as f32 / ARC_SEGMENTS as f32;
            d.centre + Vec2::from_angle(a) * d.radius
        })
        .collect();
    v.stroke_polyline(&arc, BAULK_STROKE, palette.baulk);

    for cushion in &layout.cushions {
        v.fill_polygon(&cushion.world_outline(), palette.cushion);
    }

    // Gold frame.
    let half = Vec2::new(s + 1.0, s / 2.0 + 1.0);
    let frame = [
        c - half,
        Vec2::new(c.x + half.x, c.y - half.y),
        c + half,
        Vec2::new(c.x - half.x, c.y + half.y),
        c - half,
    ];
    v.stroke_polyline(&frame, FRAME_STROKE, css::gold());

    // Wooden rails outside the cushions.
    let wood = css::brown();
    let horizontal = Vec2::new((s * 8.0 / 9.0 + 16.0) / 2.0, WOOD_THICKNESS / 2.0);
    let vertical = Vec2::new(WOOD_THICKNESS / 2.0, (s * 6.0 / 7.0 + 20.0) / 2.0);
    let left_x = c.x - s / 2.0 + 4.0;
    let right_x = c.x + s / 2.0 - 4.0;
    let upper_y = top - WOOD_OFFSET;
    let lower_y = top + s + WOOD_OFFSET;
    for centre in [
        Vec2::new(left_x, upper_y),
        Vec2::new(right_x, upper_y),
        Vec2::new(left_x, lower_y),
        Vec2::new(right_x, lower_y),
    ] {
        v.fill_rotated_rect(centre, horizontal, 0.0, wood);
    }
    v.fill_rotated_rect(Vec2::new(c.x + s + WOOD_OFFSET, c.y), vertical, 0.0, wood);
    v.fill_rotated_rect(Vec2::new(c.x - s - WOOD_OFFSET, c.y), vertical, 0.0, wood);
}

pub fn draw_pockets(v: &mut VectorState, layout: &TableLayout) {
    for pocket in &layout.pockets {
        v.fill_circle(pocket.centre, pocket.radius, VectorColor::BLACK);
    }
}

pub fn draw_ball(v: &mut VectorState, palette: &Palette, role: BallRole, pos: Vec2, radius: f32) {
    v.fill_circle(pos, radius, ball_colour(role));
    v.stroke_circle(pos, radius, BALL_OUTLINE, palette.ball_outline);
    v.fill_circle(pos + Vec2::new(-1.0, 1.0), HIGHLIGHT_RADIUS, highlight(role));
}

/// Ghost cue ball under the pointer, white where it may be dropped.
pub fn draw_placement_preview(v: &mut VectorState, palette: &Palette, pos: Vec2, legal: bool) {
    let fill = if legal {
        VectorColor::rgba8(255, 255, 255, 150)
    } else {
        VectorColor::rgba8(255, 0, 0, 150)
    };
    v.fill_circle(pos, PREVIEW_RADIUS, fill);
    if let Some(outline) = palette.preview_outline {
        v.stroke_circle(pos, PREVIEW_RADIUS, BALL_OUTLINE, outline);
    }
}

pub fn draw_stick(v: &mut VectorState, pose: &StickPose) {
    v.fill_rotated_rect(
        pose.handle,
        Vec2::new(STICK_LENGTH / 2.0, STICK_WIDTH / 2.0),
        pose.angle,
        css::orange(),
    );
    v.fill_circle(pose.tip, TIP_RADIUS, css::lime());
}

/// Guide line out of the cue ball in the direction it will travel.
pub fn draw_aim_assist(v: &mut VectorState, palette: &Palette, cue: Vec2, angle: f32) {
    let dir = Vec2::from_angle(angle + std::f32::consts::PI);
    v.stroke_polyline(&[cue, cue + dir * GUIDE_LENGTH], GUIDE_STROKE, palette.guide);
    v.stroke_circle(
        cue + dir * (GUIDE_LENGTH + GUIDE_RING_RADIUS),
        GUIDE_RING_RADIUS,
        GUIDE_STROKE,
        palette.guide,
    );
}

pub fn draw_power_bar(v: &mut VectorState, canvas: Vec2, tip_distance: f32) {
    let max_width = canvas.x * 4.0 / 5.0;
    let pos = Vec2::new(canvas.x * 0.1, canvas.y - POWER_BAR_HEIGHT - 20.0);
    v.fill_rect(pos, max_width, POWER_BAR_HEIGHT, VectorColor::rgb8(200, 200, 200));
    let width = tip_distance / POWER_BAR_FULL * max_width;
    v.fill_rect(pos, width, POWER_BAR_HEIGHT, power_colour(tip_distance));
}

pub fn draw_particles(v: &mut VectorState, field: &ParticleField) {
    match field.kind() {
        ParticleKind::Rain => {
            let fill = VectorColor::rgba8(112, 182, 234, 100);
            for p in field.particles() {
                v.fill_circle(p.pos, p.radius, fill);
            }
        }
        ParticleKind::Snow => {
            let stroke = VectorColor::rgba8(220, 220, 220, 100);
            let step = std::f32::consts::TAU / 7.0;
            let span = std::f32::consts::TAU / 3.0;
            for p in field.particles() {
                for i in 0..7 {
                    let a = i as f32 * step;
                    let from = p.pos + Vec2::from_angle(a) * p.radius;
                    let to = p.pos + Vec2::from_angle(a + span) * p.radius;
                    v.stroke_polyline(&[from, to], 1.0, stroke);
                }
            }
        }
    }
}

/// Translucent grey card behind browser-drawn text.
pub fn draw_panel(v: &mut VectorState, centre: Vec2, size: Vec2) {
    v.fill_rect(centre - size / 2.0, size.x, size.y, VectorColor::rgba8(200, 200, 200, 225));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn approx(a: VectorColor, b: VectorColor) -> bool {
        (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3 && (a.a - b.a).abs() < 1e-3
    }

    #[test]
    fn palettes_follow_weather() {
        assert_eq!(Palette::for_weather(Weather::Normal).background, css::thistle());
        assert_eq!(Palette::for_weather(Weather::Snow).felt, css::ghostwhite());
        assert_eq!(Palette::for_weather(Weather::Rain).cushion, css::darkolivegreen());
        assert!(Palette::for_weather(Weather::Snow).preview_outline.is_some());
        assert!(Palette::for_weather(Weather::Normal).preview_outline.is_none());
    }

    #[test]
    fn power_colour_ramps() {
        assert!(approx(power_colour(0.0), VectorColor::rgb(0.0, 1.0, 0.0)));
        assert!(approx(power_colour(50.0), VectorColor::YELLOW));
        assert!(approx(power_colour(100.0), VectorColor::RED));
        // Past full power stays red.
        assert!(approx(power_colour(111.2), VectorColor::RED));
    }

    #[test]
    fn table_produces_geometry() {
        let mut v = VectorState::new();
        let layout = TableLayout::default();
        draw_table(&mut v, &Palette::for_weather(Weather::Normal), &layout);
        draw_pockets(&mut v, &layout);
        assert!(v.vertex_count() > 0);
        assert_eq!(v.vertex_count() % 3, 0);
    }

    #[test]
    fn placement_preview_colour() {
        let palette = Palette::for_weather(Weather::Normal);
        let mut v = VectorState::new();
        draw_placement_preview(&mut v, &palette, Vec2::new(200.0, 300.0), true);
        let first = v.vertices()[0];
        assert!((first.r - 1.0).abs() < 1e-3 && (first.g - 1.0).abs() < 1e-3);

        let mut v = VectorState::new();
        draw_placement_preview(&mut v, &palette, Vec2::new(200.0, 300.0), false);
        let first = v.vertices()[0];
        assert!((first.r - 1.0).abs() < 1e-3 && first.g.abs() < 1e-3);
        assert!((first.a - 150.0 / 255.0).abs() < 1e-3);
    }

    #[test]
    fn power_bar_fill_scales_with_tip_distance() {
        let canvas = Vec2::new(1000.0, 600.0);
        let mut empty = VectorState::new();
        draw_power_bar(&mut empty, canvas, 0.0);
        let mut full = VectorState::new();
        draw_power_bar(&mut full, canvas, 100.0);
        // Zero-width fill draws nothing on top of the track.
        assert!(full.vertex_count() > empty.vertex_count());
    }

    #[test]
    fn snow_draws_seven_strokes_per_flake() {
        let mut rng = SmallRng::seed_from_u64(2);
        let field = ParticleField::new(ParticleKind::Snow, 1, Vec2::new(1000.0, 600.0), &mut rng);
        let mut one = VectorState::new();
        draw_particles(&mut one, &field);
        let single_stroke = {
            let mut v = VectorState::new();
            v.stroke_polyline(&[Vec2::ZERO, Vec2::new(12.0, 0.0)], 1.0, VectorColor::WHITE);
            v.vertex_count()
        };
        assert_eq!(one.vertex_count(), 7 * single_stroke);
    }

    #[test]
    fn ball_colours() {
        assert_eq!(ball_colour(BallRole::Red), VectorColor::RED);
        assert_eq!(ball_colour(BallRole::Colour(Colour::Black)), css::darkslategrey());
        assert_eq!(ball_colour(BallRole::Cue), css::whitesmoke());
    }
}
