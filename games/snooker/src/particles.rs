//! Decorative rain and snow drifting into the middle of the canvas.

use glam::Vec2;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Rain,
    Snow,
}

impl ParticleKind {
    fn speed_range(self) -> (f32, f32) {
        match self {
            ParticleKind::Rain => (4.0, 5.0),
            ParticleKind::Snow => (0.3, 1.0),
        }
    }

    pub fn max_radius(self) -> f32 {
        match self {
            ParticleKind::Rain => 7.0,
            ParticleKind::Snow => 12.0,
        }
    }

    /// Upper end of the per-tick shrink-out threshold.
    fn min_radius_ceiling(self) -> f32 {
        match self {
            ParticleKind::Rain => 1.5,
            ParticleKind::Snow => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
}

/// A fixed-size population. Particles shrink as they near the centre and are
/// replaced at a random spot once they fall under this tick's threshold.
#[derive(Debug, Clone)]
pub struct ParticleField {
    kind: ParticleKind,
    area: Vec2,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(kind: ParticleKind, count: usize, area: Vec2, rng: &mut impl Rng) -> Self {
        let mut field = Self {
            kind,
            area,
            particles: Vec::with_capacity(count),
        };
        for _ in 0..count {
            let p = field.fresh(&mut *rng);
            field.particles.push(p);
        }
        field
    }

    fn fresh(&self, rng: &mut impl Rng) -> Particle {
        let (lo, hi) = self.kind.speed_range();
        Particle {
            pos: Vec2::new(rng.gen_range(0.0..self.area.x), rng.gen_range(0.0..self.area.y)),
            radius: self.kind.max_radius(),
            speed: rng.gen_range(lo..hi),
        }
    }

    pub fn tick(&mut self, rng: &mut impl Rng) {
        let centre = self.area / 2.0;
        // Corner to centre.
        let max_distance = centre.length();
        let max_radius = self.kind.max_radius();
        let min_radius = rng.gen_range(0.0..self.kind.min_radius_ceiling());

        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            p.pos += (centre - p.pos).normalize_or_zero() * p.speed;
            p.radius = p.pos.distance(centre) / max_distance * max_radius;
            if p.radius <= min_radius {
                let replacement = self.fresh(&mut *rng);
                self.particles[i] = replacement;
            }
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
