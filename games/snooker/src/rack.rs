//! Initial ball placement for each rack mode.

use glam::Vec2;
use rand::Rng;

use crate::balls::Colour;
use crate::table::TableLayout;

pub const RED_COUNT: usize = 15;

/// Rows in the standard red triangle.
const TRIANGLE_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RackMode {
    /// Colours on spots, reds in a triangle behind the pink.
    Standard,
    /// Colours on spots, reds scattered.
    RandomReds,
    /// Everything scattered.
    RandomAll,
}

impl RackMode {
    /// Keys and menu buttons number the modes 1 to 3.
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(RackMode::Standard),
            2 => Some(RackMode::RandomReds),
            3 => Some(RackMode::RandomAll),
            _ => None,
        }
    }

    pub fn number(self) -> u32 {
        match self {
            RackMode::Standard => 1,
            RackMode::RandomReds => 2,
            RackMode::RandomAll => 3,
        }
    }
}

/// Positions for a fresh rack. Nothing is spawned until the orchestrator
/// hands the plan to the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RackPlan {
    pub reds: Vec<Vec2>,
    pub colours: Vec<(Colour, Vec2)>,
}

pub fn setup_rack(mode: RackMode, layout: &TableLayout, rng: &mut impl Rng) -> RackPlan {
    let colours: Vec<(Colour, Vec2)> = match mode {
        RackMode::Standard | RackMode::RandomReds => {
            Colour::ALL.iter().map(|&c| (c, layout.spot(c))).collect()
        }
        RackMode::RandomAll => Colour::ALL
            .iter()
            .map(|&c| (c, random_point(layout, &mut *rng)))
            .collect(),
    };

    let reds = match mode {
        RackMode::Standard => triangle(layout),
        RackMode::RandomReds | RackMode::RandomAll => scatter_reds(layout, &colours, rng),
    };

    RackPlan { reds, colours }
}

/// Fifteen reds in five rows, apex towards the pink.
fn triangle(layout: &TableLayout) -> Vec<Vec2> {
    let bd = layout.ball_diameter;
    let apex = layout.spot(Colour::Pink);
    let mut reds = Vec::with_capacity(RED_COUNT);
    for i in 1..=TRIANGLE_ROWS {
        let row = i as f32;
        for j in 0..i {
            let x = apex.x + bd * row - row;
            let y = layout.centre.y + bd * (j as f32 - (row - 1.0) / 2.0);
            reds.push(Vec2::new(x, y));
        }
    }
    reds
}

/// Uniform draws inside the play bounds. Each draw is pushed diagonally by one
/// ball diameter for every colour it lands on; reds may still touch each other.
fn scatter_reds(layout: &TableLayout, colours: &[(Colour, Vec2)], rng: &mut impl Rng) -> Vec<Vec2> {
    let bd = layout.ball_diameter;
    (0..RED_COUNT)
        .map(|_| {
            let mut p = random_point(layout, &mut *rng);
            for &(_, c) in colours {
                if p.distance(c) < bd {
                    p += Vec2::splat(bd);
                }
            }
            p
        })
        .collect()
}

fn random_point(layout: &TableLayout, rng: &mut impl Rng) -> Vec2 {
    let b = layout.bounds;
    Vec2::new(rng.gen_range(b.left..=b.right), rng.gen_range(b.top..=b.bottom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn mode_numbers() {
        assert_eq!(RackMode::from_number(1), Some(RackMode::Standard));
        assert_eq!(RackMode::from_number(3), Some(RackMode::RandomAll));
        assert_eq!(RackMode::from_number(0), None);
        assert_eq!(RackMode::from_number(4), None);
        assert_eq!(RackMode::RandomReds.number(), 2);
    }

    #[test]
    fn standard_rack_is_a_triangle() {
        let layout = TableLayout::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let plan = setup_rack(RackMode::Standard, &layout, &mut rng);
        assert_eq!(plan.reds.len(), 15);
        assert_eq!(plan.colours.len(), 6);

        let bd = layout.ball_diameter;
        let pink = layout.spot(Colour::Pink);
        // Apex row has one ball on the centre line.
        assert!((plan.reds[0].x - (pink.x + bd - 1.0)).abs() < 1e-3);
        assert!((plan.reds[0].y - layout.centre.y).abs() < 1e-3);
        // Back row spans four diameters.
        let back: Vec<_> = plan.reds[10..].iter().collect();
        assert!((back[4].y - back[0].y - 4.0 * bd).abs() < 1e-3);
        assert!(back.iter().all(|p| (p.x - (pink.x + 5.0 * bd - 5.0)).abs() < 1e-3));

        for (colour, pos) in &plan.colours {
            assert_eq!(*pos, layout.spot(*colour));
        }
    }

    #[test]
    fn random_reds_stay_in_bounds_and_keep_spots() {
        let layout = TableLayout::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let plan = setup_rack(RackMode::RandomReds, &layout, &mut rng);
        assert_eq!(plan.reds.len(), 15);
        let bd = layout.ball_diameter;
        let b = layout.bounds;
        for p in &plan.reds {
            // A nudge can push past the bounds by at most a few diameters.
            assert!(p.x >= b.left && p.x <= b.right + 6.0 * bd);
            assert!(p.y >= b.top && p.y <= b.bottom + 6.0 * bd);
        }
        for (colour, pos) in &plan.colours {
            assert_eq!(*pos, layout.spot(*colour));
        }
    }

    #[test]
    fn random_all_scatters_colours_in_fixed_order() {
        let layout = TableLayout::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let plan = setup_rack(RackMode::RandomAll, &layout, &mut rng);
        let order: Vec<Colour> = plan.colours.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, Colour::ALL.to_vec());
        assert!(plan.colours.iter().all(|(_, p)| layout.bounds.contains(*p)));
    }

    #[test]
    fn same_seed_same_rack() {
        let layout = TableLayout::default();
        let a = setup_rack(RackMode::RandomAll, &layout, &mut SmallRng::seed_from_u64(42));
        let b = setup_rack(RackMode::RandomAll, &layout, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
