//! Cue-ball contact notices. Advisory only: nothing here touches game state.

use std::fmt;

use glam::Vec2;
use snooker_engine::EngineContext;

use crate::balls::{BallRegistry, BallRole};
use crate::table::{CushionSide, TableLayout};

/// Slack on the touching distance so resting contacts still register.
const TOUCH_EPSILON: f32 = 1e-3;

/// Cushion ends this close to a pocket mouth are not reported.
const CUSHION_END_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactNotice {
    Ball(BallRole),
    Cushion(CushionSide),
}

impl fmt::Display for ContactNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactNotice::Ball(role) => write!(f, "Collision of cue ball with {}", role.describe()),
            ContactNotice::Cushion(side) => write!(f, "Collision of cue ball with {} wall", side.name()),
        }
    }
}

/// Everything the cue ball is touching right now.
pub fn detect_contacts(ctx: &EngineContext, registry: &BallRegistry, layout: &TableLayout) -> Vec<ContactNotice> {
    let Some(cue) = registry.cue_position(ctx) else {
        return Vec::new();
    };
    let bd = layout.ball_diameter;

    let mut notices: Vec<ContactNotice> = registry
        .reds()
        .iter()
        .chain(registry.colours())
        .filter_map(|ball| {
            let p = registry.position(ctx, ball)?;
            (p.distance(cue) <= bd + TOUCH_EPSILON).then_some(ContactNotice::Ball(ball.role))
        })
        .collect();

    let reach = (bd / 2.0 + layout.cushion_thickness / 2.0).round();
    for cushion in &layout.cushions {
        let d: Vec2 = cue - cushion.centre;
        let (across, along) = if cushion.side.is_horizontal() {
            (d.y.abs(), d.x.abs())
        } else {
            (d.x.abs(), d.y.abs())
        };
        if across < reach && along < cushion.length / 2.0 - CUSHION_END_MARGIN {
            notices.push(ContactNotice::Cushion(cushion.side));
        }
    }

    for notice in &notices {
        log::debug!("{}", notice);
    }
    notices
}
