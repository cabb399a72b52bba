//! Ball bookkeeping: who is on the table, where, and what gets potted.

use glam::Vec2;
use snooker_engine::{BodyDesc, BodyId, ColliderDesc, ColliderMaterial, EngineContext, PhysicsBody};

use crate::table::TableLayout;
use crate::weather::WeatherParams;

/// Ball density relative to the physics engine's unit density.
pub const BALL_DENSITY: f32 = 8.5;

/// A ball travelling more than this many units per tick counts as moving.
pub const MOVING_THRESHOLD: f32 = 0.01;

/// Cue-ball speed change (units/s) per unit of strike force.
pub const STRIKE_SPEED_PER_FORCE: f32 = 17_200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl Colour {
    /// Order colours are placed in when scattered at random.
    pub const ALL: [Colour; 6] = [
        Colour::Blue,
        Colour::Brown,
        Colour::Green,
        Colour::Yellow,
        Colour::Pink,
        Colour::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colour::Yellow => "yellow",
            Colour::Green => "green",
            Colour::Brown => "brown",
            Colour::Blue => "blue",
            Colour::Pink => "pink",
            Colour::Black => "black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallRole {
    Cue,
    Red,
    Colour(Colour),
}

impl BallRole {
    pub fn describe(self) -> String {
        match self {
            BallRole::Cue => "cue ball".to_string(),
            BallRole::Red => "red ball".to_string(),
            BallRole::Colour(c) => format!("{} colour ball", c.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub id: BodyId,
    pub role: BallRole,
    pub body: PhysicsBody,
}

/// A ball taken off the table by the cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    pub role: BallRole,
    pub position: Vec2,
    pub off_table: bool,
}

/// The three ball collections plus the physics parameters new balls get.
#[derive(Debug)]
pub struct BallRegistry {
    radius: f32,
    params: WeatherParams,
    cue: Vec<Ball>,
    reds: Vec<Ball>,
    colours: Vec<Ball>,
}

impl BallRegistry {
    pub fn new(radius: f32, params: WeatherParams) -> Self {
        Self {
            radius,
            params,
            cue: Vec::new(),
            reds: Vec::new(),
            colours: Vec::new(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn params(&self) -> WeatherParams {
        self.params
    }

    /// Create a ball at rest. Returns `None` if a cue ball already exists.
    pub fn spawn(&mut self, ctx: &mut EngineContext, pos: Vec2, role: BallRole) -> Option<BodyId> {
        if role == BallRole::Cue && !self.cue.is_empty() {
            log::debug!("Ignoring second cue ball at ({:.1}, {:.1})", pos.x, pos.y);
            return None;
        }

        let desc = BodyDesc::dynamic(ColliderDesc::Ball {
            radius: self.radius,
        })
        .with_position(pos)
        .with_locked_rotation(true)
        .with_ccd(true)
        .with_linear_damping(self.params.linear_damping(ctx.physics.dt()));
        let material = ColliderMaterial {
            restitution: self.params.ball_restitution,
            friction: 0.0,
            density: BALL_DENSITY,
        };
        let (id, body) = ctx.spawn_body(&desc, material);

        let ball = Ball { id, role, body };
        match role {
            BallRole::Cue => self.cue.push(ball),
            BallRole::Red => self.reds.push(ball),
            BallRole::Colour(_) => self.colours.push(ball),
        }
        Some(id)
    }

    /// Remove one ball from its collection and from the world.
    pub fn remove(&mut self, ctx: &mut EngineContext, id: BodyId) -> Option<Ball> {
        for list in [&mut self.cue, &mut self.reds, &mut self.colours] {
            if let Some(idx) = list.iter().position(|b| b.id == id) {
                let ball = list.remove(idx);
                ctx.despawn_body(&ball.body);
                return Some(ball);
            }
        }
        None
    }

    pub fn clear(&mut self, ctx: &mut EngineContext) {
        for ball in self.cue.drain(..).chain(self.reds.drain(..)).chain(self.colours.drain(..)) {
            ctx.despawn_body(&ball.body);
        }
    }

    /// Remove potted and off-table balls, colours first, then reds, then the
    /// cue ball. Colours go straight back onto their spot.
    pub fn cleanup(&mut self, ctx: &mut EngineContext, layout: &TableLayout) -> Vec<Capture> {
        let mut captures = take_captured(ctx, layout, &mut self.colours);
        for capture in &captures {
            if let BallRole::Colour(colour) = capture.role {
                self.spawn(ctx, layout.spot(colour), capture.role);
            }
        }
        captures.extend(take_captured(ctx, layout, &mut self.reds));
        captures.extend(take_captured(ctx, layout, &mut self.cue));
        captures
    }

    /// Distance travelled per tick.
    pub fn speed(&self, ctx: &EngineContext, ball: &Ball) -> f32 {
        ctx.physics.velocity(&ball.body).length() * ctx.physics.dt()
    }

    pub fn any_moving(&self, ctx: &EngineContext) -> bool {
        self.iter().any(|b| self.speed(ctx, b) > MOVING_THRESHOLD)
    }

    /// Push the current weather's restitution and damping into every ball.
    pub fn apply_weather(&mut self, ctx: &mut EngineContext, params: WeatherParams) {
        self.params = params;
        let damping = params.linear_damping(ctx.physics.dt());
        for ball in self.cue.iter().chain(&self.reds).chain(&self.colours) {
            ctx.physics.set_restitution(&ball.body, params.ball_restitution);
            ctx.physics.set_linear_damping(&ball.body, damping);
        }
    }

    /// Kick the cue ball with `force` (direction times pull times strike magnitude).
    pub fn strike_cue(&self, ctx: &mut EngineContext, force: Vec2) -> bool {
        let Some(cue) = self.cue.first() else {
            return false;
        };
        let mass = ctx.physics.mass(&cue.body);
        ctx.physics
            .apply_impulse(&cue.body, force * STRIKE_SPEED_PER_FORCE * mass);
        true
    }

    /// Whether a cue ball may be dropped at `pos`: inside the D, clear of
    /// every object ball, no cue ball yet, and a rack on the table.
    pub fn can_place_cue(&self, ctx: &EngineContext, layout: &TableLayout, pos: Vec2) -> bool {
        if !self.cue.is_empty() || self.reds.is_empty() || self.colours.is_empty() {
            return false;
        }
        if !layout.d_zone.contains(pos) {
            return false;
        }
        let bd = layout.ball_diameter;
        !self
            .reds
            .iter()
            .chain(&self.colours)
            .filter_map(|b| ctx.physics.position(&b.body))
            .any(|p| p.distance(pos) < bd)
    }

    pub fn position(&self, ctx: &EngineContext, ball: &Ball) -> Option<Vec2> {
        ctx.physics.position(&ball.body)
    }

    pub fn cue(&self) -> Option<&Ball> {
        self.cue.first()
    }

    pub fn cue_position(&self, ctx: &EngineContext) -> Option<Vec2> {
        self.cue().and_then(|b| ctx.physics.position(&b.body))
    }

    pub fn reds(&self) -> &[Ball] {
        &self.reds
    }

    pub fn colours(&self) -> &[Ball] {
        &self.colours
    }

    pub fn cue_count(&self) -> usize {
        self.cue.len()
    }

    pub fn red_count(&self) -> usize {
        self.reds.len()
    }

    pub fn colour_count(&self) -> usize {
        self.colours.len()
    }

    pub fn len(&self) -> usize {
        self.cue.len() + self.reds.len() + self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reds, then colours, then the cue ball.
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.reds.iter().chain(&self.colours).chain(&self.cue)
    }
}

fn take_captured(ctx: &mut EngineContext, layout: &TableLayout, balls: &mut Vec<Ball>) -> Vec<Capture> {
    let mut captures = Vec::new();
    let mut i = 0;
    while i < balls.len() {
        let verdict = ctx.physics.position(&balls[i].body).and_then(|p| {
            if layout.is_in_pocket(p) {
                Some((p, false))
            } else if layout.is_off_table(p) {
                Some((p, true))
            } else {
                None
            }
        });
        match verdict {
            Some((position, off_table)) => {
                let ball = balls.remove(i);
                ctx.despawn_body(&ball.body);
                captures.push(Capture {
                    role: ball.role,
                    position,
                    off_table,
                });
            }
            None => i += 1,
        }
    }
    captures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (EngineContext, TableLayout, BallRegistry) {
        let ctx = EngineContext::new();
        let layout = TableLayout::default();
        let registry = BallRegistry::new(layout.ball_radius(), WeatherParams::NORMAL);
        (ctx, layout, registry)
    }

    fn rack_colours(ctx: &mut EngineContext, layout: &TableLayout, registry: &mut BallRegistry) {
        for colour in Colour::ALL {
            registry.spawn(ctx, layout.spot(colour), BallRole::Colour(colour));
        }
    }

    #[test]
    fn spawn_sorts_by_role() {
        let (mut ctx, layout, mut registry) = setup();
        registry.spawn(&mut ctx, layout.centre, BallRole::Red);
        registry.spawn(&mut ctx, layout.spot(Colour::Pink), BallRole::Colour(Colour::Pink));
        registry.spawn(&mut ctx, layout.d_zone.centre, BallRole::Cue);
        assert_eq!(registry.red_count(), 1);
        assert_eq!(registry.colour_count(), 1);
        assert_eq!(registry.cue_count(), 1);
        assert_eq!(ctx.physics.body_count(), 3);
    }

    #[test]
    fn only_one_cue_ball() {
        let (mut ctx, layout, mut registry) = setup();
        assert!(registry.spawn(&mut ctx, layout.d_zone.centre, BallRole::Cue).is_some());
        assert!(registry
            .spawn(&mut ctx, layout.d_zone.centre - Vec2::new(20.0, 0.0), BallRole::Cue)
            .is_none());
        assert_eq!(registry.cue_count(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
    }

    #[test]
    fn balls_are_dense() {
        let (mut ctx, layout, mut registry) = setup();
        registry.spawn(&mut ctx, layout.centre, BallRole::Red);
        let r = layout.ball_radius();
        let expected = BALL_DENSITY * std::f32::consts::PI * r * r;
        let mass = ctx.physics.mass(&registry.reds()[0].body);
        assert!((mass - expected).abs() / expected < 1e-3, "mass={}", mass);
    }

    #[test]
    fn remove_and_clear() {
        let (mut ctx, layout, mut registry) = setup();
        let id = registry.spawn(&mut ctx, layout.centre, BallRole::Red).unwrap();
        rack_colours(&mut ctx, &layout, &mut registry);
        assert_eq!(registry.remove(&mut ctx, id).map(|b| b.role), Some(BallRole::Red));
        assert!(registry.remove(&mut ctx, id).is_none());
        registry.clear(&mut ctx);
        assert!(registry.is_empty());
        assert_eq!(ctx.physics.body_count(), 0);
    }

    #[test]
    fn potted_red_is_captured() {
        let (mut ctx, layout, mut registry) = setup();
        let pocket = layout.pockets[2];
        registry.spawn(&mut ctx, pocket.centre, BallRole::Red);
        registry.spawn(&mut ctx, layout.centre, BallRole::Red);
        let captures = registry.cleanup(&mut ctx, &layout);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].role, BallRole::Red);
        assert!(!captures[0].off_table);
        assert_eq!(registry.red_count(), 1);
    }

    #[test]
    fn ball_just_outside_pocket_stays() {
        let (mut ctx, layout, mut registry) = setup();
        let pocket = layout.pockets[1];
        registry.spawn(&mut ctx, pocket.centre + Vec2::new(pocket.radius + 0.01, 0.0), BallRole::Red);
        assert!(registry.cleanup(&mut ctx, &layout).is_empty());
        assert_eq!(registry.red_count(), 1);
    }

    #[test]
    fn colours_respawn_on_their_spot() {
        let (mut ctx, layout, mut registry) = setup();
        rack_colours(&mut ctx, &layout, &mut registry);
        let blacks = |registry: &BallRegistry| -> Vec<Ball> {
            registry
                .colours()
                .iter()
                .filter(|b| b.role == BallRole::Colour(Colour::Black))
                .copied()
                .collect()
        };

        for pocket in layout.pockets.iter().cycle().take(5) {
            let black = blacks(&registry)[0].id;
            registry.remove(&mut ctx, black);
            registry.spawn(&mut ctx, pocket.centre, BallRole::Colour(Colour::Black));

            let captures = registry.cleanup(&mut ctx, &layout);
            assert_eq!(captures.len(), 1);
            assert_eq!(registry.colour_count(), 6);
            let respawned = blacks(&registry);
            assert_eq!(respawned.len(), 1);
            assert_eq!(registry.position(&ctx, &respawned[0]), Some(layout.spot(Colour::Black)));
        }

        // A second pass finds nothing new.
        assert!(registry.cleanup(&mut ctx, &layout).is_empty());
        assert_eq!(registry.colour_count(), 6);
    }

    #[test]
    fn off_table_cue_is_captured() {
        let (mut ctx, layout, mut registry) = setup();
        registry.spawn(&mut ctx, Vec2::new(layout.bounds.right + 60.0, layout.centre.y), BallRole::Cue);
        let captures = registry.cleanup(&mut ctx, &layout);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].role, BallRole::Cue);
        assert!(captures[0].off_table);
        assert!(registry.cue().is_none());
    }

    #[test]
    fn moving_threshold() {
        let (mut ctx, layout, mut registry) = setup();
        registry.spawn(&mut ctx, layout.centre, BallRole::Red);
        assert!(!registry.any_moving(&ctx));

        let body = registry.reds()[0].body;
        // 0.5 units/s is under 0.01 per tick.
        ctx.physics.set_velocity(&body, Vec2::new(0.5, 0.0));
        assert!(!registry.any_moving(&ctx));
        ctx.physics.set_velocity(&body, Vec2::new(1.0, 0.0));
        assert!(registry.any_moving(&ctx));
    }

    #[test]
    fn placement_rules() {
        let (mut ctx, layout, mut registry) = setup();
        let spot = layout.d_zone.centre - Vec2::new(30.0, 0.0);
        // Nothing racked yet.
        assert!(!registry.can_place_cue(&ctx, &layout, spot));

        registry.spawn(&mut ctx, layout.centre, BallRole::Red);
        rack_colours(&mut ctx, &layout, &mut registry);
        assert!(registry.can_place_cue(&ctx, &layout, spot));
        // Right half of the circle is outside the D.
        assert!(!registry.can_place_cue(&ctx, &layout, layout.d_zone.centre + Vec2::new(20.0, 0.0)));
        // Overlaps the brown.
        let brown = layout.spot(Colour::Brown);
        assert!(!registry.can_place_cue(&ctx, &layout, brown - Vec2::new(layout.ball_diameter - 0.5, 0.0)));

        registry.spawn(&mut ctx, spot, BallRole::Cue);
        assert!(!registry.can_place_cue(&ctx, &layout, spot - Vec2::new(0.0, 30.0)));
    }

    #[test]
    fn weather_updates_existing_balls() {
        let (mut ctx, layout, mut registry) = setup();
        registry.spawn(&mut ctx, layout.centre, BallRole::Red);
        registry.apply_weather(&mut ctx, WeatherParams::RAIN);
        let body = registry.reds()[0].body;
        assert_eq!(ctx.physics.restitution(&body), Some(0.8));
        let expected = WeatherParams::RAIN.linear_damping(ctx.physics.dt());
        assert!((ctx.physics.linear_damping(&body).unwrap() - expected).abs() < 1e-4);
        assert_eq!(registry.params(), WeatherParams::RAIN);
    }

    #[test]
    fn strike_sets_cue_velocity() {
        let (mut ctx, layout, mut registry) = setup();
        assert!(!registry.strike_cue(&mut ctx, Vec2::new(-0.01, 0.0)));
        registry.spawn(&mut ctx, layout.d_zone.centre, BallRole::Cue);
        assert!(registry.strike_cue(&mut ctx, Vec2::new(-0.01, 0.0)));
        let v = ctx.physics.velocity(&registry.cue().unwrap().body);
        assert!((v.x + 172.0).abs() < 0.5, "v={:?}", v);
        assert!(v.y.abs() < 1e-4);
    }

    #[test]
    fn descriptions() {
        assert_eq!(BallRole::Red.describe(), "red ball");
        assert_eq!(BallRole::Colour(Colour::Pink).describe(), "pink colour ball");
    }
}
