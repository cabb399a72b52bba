//! Snooker session: owns every piece of game state and runs the per-tick
//! sequence weather → physics → rack → cleanup → cue → fouls → draw.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use snooker_engine::{
    keys, BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Game, GameConfig, GameEvent,
    InputQueue, InputState, PhysicsBody,
};

use crate::balls::{BallRegistry, BallRole, Capture};
use crate::config::SnookerConfig;
use crate::contact::{detect_contacts, ContactNotice};
use crate::cue::CueController;
use crate::fouls::{FoulTracker, PotKind};
use crate::particles::{ParticleField, ParticleKind};
use crate::rack::{setup_rack, RackMode};
use crate::render::{self, Palette};
use crate::table::{TableLayout, CANVAS};
use crate::weather::{Weather, WeatherParams};

/// Foul notice card.
const FOUL_PANEL: Vec2 = Vec2::new(400.0, 200.0);

/// Width of the menu card; it spans the full canvas height.
const MENU_PANEL_WIDTH: f32 = 450.0;

/// Custom event kinds from the browser UI.
mod events {
    /// `a` = rack mode (1, 2 or 3).
    pub const SELECT_RACK: u32 = 1;
    pub const TOGGLE_MENU: u32 = 2;
}

/// Game event kinds to the browser UI.
mod game_events {
    /// a = weather index (0 normal, 1 snow, 2 rain)
    pub const WEATHER: f32 = 1.0;
    /// a = menu visible
    pub const MENU: f32 = 2.0;
    /// a = control mode (0 pointer, 1 keys)
    pub const CONTROL_MODE: f32 = 3.0;
    /// a = banner showing, b = ticks left, c = fouls so far
    pub const FOUL: f32 = 4.0;
    /// a = reds potted, b = colours potted, c = cue-ball losses
    pub const POTS: f32 = 5.0;
    /// a = reds, b = colours, c = cue balls on the table
    pub const BALLS: f32 = 6.0;
    /// a = stick tip distance, b = pull (both 0 when the stick is hidden)
    pub const POWER: f32 = 7.0;
    /// a = aim assist on
    pub const AIM_ASSIST: f32 = 8.0;
}

/// Whole, non-negative UI values only; `1.7` is not rack 1.
fn rack_number(value: f32) -> Option<u32> {
    (value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f32).then_some(value as u32)
}

pub struct SnookerGame {
    config: SnookerConfig,
    layout: TableLayout,
    weather: Weather,
    registry: BallRegistry,
    cue: CueController,
    fouls: FoulTracker,
    pot_log: Vec<Capture>,
    input: InputState,
    rng: SmallRng,
    rain: ParticleField,
    snow: ParticleField,
    cushions: Vec<PhysicsBody>,
    pending_rack: Option<RackMode>,
    menu_visible: bool,
    aim_assist: bool,
    /// Placement ghost under the pointer and whether it may be dropped there.
    preview: Option<(Vec2, bool)>,
    notices: Vec<ContactNotice>,
}

impl SnookerGame {
    pub fn new() -> Self {
        Self::with_config(SnookerConfig::default())
    }

    pub fn with_config(config: SnookerConfig) -> Self {
        let layout = TableLayout::build(config.table_size, CANVAS);
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let rain = ParticleField::new(ParticleKind::Rain, config.rain_drops, CANVAS, &mut rng);
        let snow = ParticleField::new(ParticleKind::Snow, config.snow_flakes, CANVAS, &mut rng);
        let params = config.weather_table.params(config.weather);
        Self {
            registry: BallRegistry::new(layout.ball_radius(), params),
            cue: CueController::new(layout.ball_diameter),
            fouls: FoulTracker::new(),
            pot_log: Vec::new(),
            input: InputState::new(),
            rng,
            rain,
            snow,
            cushions: Vec::new(),
            pending_rack: None,
            menu_visible: config.menu_visible,
            aim_assist: config.aim_assist,
            weather: config.weather,
            preview: None,
            notices: Vec::new(),
            layout,
            config,
        }
    }

    fn params(&self) -> WeatherParams {
        self.config.weather_table.params(self.weather)
    }

    fn build_cushions(&mut self, ctx: &mut EngineContext) {
        let material = ColliderMaterial {
            restitution: self.params().wall_restitution,
            friction: 0.0,
            density: 1.0,
        };
        for cushion in &self.layout.cushions {
            let desc = BodyDesc::fixed(ColliderDesc::ConvexPolygon {
                points: cushion.outline.to_vec(),
            })
            .with_position(cushion.centre)
            .with_rotation(cushion.angle);
            let (_, body) = ctx.spawn_body(&desc, material);
            self.cushions.push(body);
        }
    }

    /// Key toggles and UI commands gathered since the previous tick.
    fn handle_commands(&mut self, ctx: &EngineContext) {
        for (key, mode) in [
            (keys::DIGIT_1, RackMode::Standard),
            (keys::DIGIT_2, RackMode::RandomReds),
            (keys::DIGIT_3, RackMode::RandomAll),
        ] {
            if self.input.was_pressed(key) {
                self.pending_rack = Some(mode);
            }
        }

        let mut toggle_menu = self.input.was_pressed(keys::M);
        for custom in self.input.customs() {
            match custom.kind {
                events::SELECT_RACK => match rack_number(custom.a).and_then(RackMode::from_number) {
                    Some(mode) => self.pending_rack = Some(mode),
                    None => log::debug!("Ignoring unknown rack mode {}", custom.a),
                },
                events::TOGGLE_MENU => toggle_menu = !toggle_menu,
                other => log::debug!("Ignoring custom event {}", other),
            }
        }
        if toggle_menu {
            self.menu_visible = !self.menu_visible;
        }

        if self.input.was_pressed(keys::A) {
            self.aim_assist = !self.aim_assist;
        }
        if self.input.was_pressed(keys::K) {
            if self.registry.any_moving(ctx) {
                log::debug!("Control toggle ignored while balls are moving");
            } else {
                self.cue.toggle_mode(self.registry.cue_count());
            }
        }
        if self.input.was_pressed(keys::W) {
            self.toggle_weather(ctx);
        }
    }

    fn toggle_weather(&mut self, ctx: &EngineContext) {
        if self.registry.cue_count() > 0 || self.registry.any_moving(ctx) {
            log::debug!("Weather stays {} while a cue ball is in play", self.weather.name());
            return;
        }
        self.weather = self.weather.next();
        log::info!("Weather: {}", self.weather.name());
    }

    fn apply_weather(&mut self, ctx: &mut EngineContext) {
        let params = self.params();
        self.registry.apply_weather(ctx, params);
        for body in &self.cushions {
            ctx.physics.set_restitution(body, params.wall_restitution);
        }
    }

    /// Clear the table and lay out a fresh rack in one go.
    fn rack(&mut self, ctx: &mut EngineContext, mode: RackMode) {
        self.registry.clear(ctx);
        let plan = setup_rack(mode, &self.layout, &mut self.rng);
        for (colour, pos) in &plan.colours {
            self.registry.spawn(ctx, *pos, BallRole::Colour(*colour));
        }
        for pos in &plan.reds {
            self.registry.spawn(ctx, *pos, BallRole::Red);
        }
        self.fouls.reset();
        self.pot_log.clear();
        self.cue.reset();
        log::info!(
            "Rack {} set: {} reds, {} colours",
            mode.number(),
            self.registry.red_count(),
            self.registry.colour_count()
        );
    }

    fn record_captures(&mut self, captures: Vec<Capture>) {
        for capture in captures {
            let what = capture.role.describe();
            if capture.off_table {
                log::info!("{} left the table", what);
            } else {
                log::info!("Potted {}", what);
            }
            match capture.role {
                BallRole::Red => self.fouls.record(PotKind::Red),
                BallRole::Colour(_) => self.fouls.record(PotKind::Colour),
                BallRole::Cue => {}
            }
            self.pot_log.push(capture);
        }
    }

    /// No cue ball yet: follow the pointer with a ghost and drop on click.
    fn place_cue(&mut self, ctx: &mut EngineContext) {
        if self.registry.red_count() == 0 && self.registry.colour_count() == 0 {
            return;
        }
        let pointer = self.input.pointer();
        self.preview = Some((pointer, self.registry.can_place_cue(ctx, &self.layout, pointer)));

        if let Some(p) = self.input.pointer_pressed() {
            if self.registry.can_place_cue(ctx, &self.layout, p) {
                self.registry.spawn(ctx, p, BallRole::Cue);
                log::info!("Cue ball placed at ({:.1}, {:.1})", p.x, p.y);
            } else {
                log::debug!("Cue ball cannot go at ({:.1}, {:.1})", p.x, p.y);
            }
        }
    }

    fn drive_cue(&mut self, ctx: &mut EngineContext) {
        self.notices = detect_contacts(ctx, &self.registry, &self.layout);
        if self.registry.any_moving(ctx) {
            self.cue.suspend();
            return;
        }
        let Some(cue_pos) = self.registry.cue_position(ctx) else {
            return;
        };
        if let Some(strike) = self.cue.update(cue_pos, &self.input) {
            let force = strike.force(self.params().strike_magnitude);
            self.registry.strike_cue(ctx, force);
        }
    }

    fn draw(&self, ctx: &mut EngineContext) {
        let palette = Palette::for_weather(self.weather);
        let cue_pos = self.registry.cue_position(ctx);
        let balls: Vec<(BallRole, Vec2)> = self
            .registry
            .iter()
            .filter_map(|b| Some((b.role, self.registry.position(ctx, b)?)))
            .collect();

        let v = &mut ctx.vectors;
        render::draw_background(v, &palette, self.layout.canvas);
        render::draw_table(v, &palette, &self.layout);
        render::draw_pockets(v, &self.layout);
        for (role, pos) in balls {
            render::draw_ball(v, &palette, role, pos, self.registry.radius());
        }

        if !self.menu_visible {
            if let Some((pos, legal)) = self.preview {
                render::draw_placement_preview(v, &palette, pos, legal);
            }
            if let Some((c, pose)) = cue_pos.and_then(|c| Some((c, self.cue.pose(c)?))) {
                render::draw_stick(v, &pose);
                if self.aim_assist {
                    render::draw_aim_assist(v, &palette, c, pose.angle);
                }
                render::draw_power_bar(v, self.layout.canvas, self.cue.tip_distance());
            }
            match self.weather {
                Weather::Normal => {}
                Weather::Snow => render::draw_particles(v, &self.snow),
                Weather::Rain => render::draw_particles(v, &self.rain),
            }
        }

        if self.fouls.banner_active() {
            render::draw_panel(v, self.layout.centre, FOUL_PANEL);
        }
        if self.menu_visible {
            render::draw_panel(
                v,
                self.layout.centre,
                Vec2::new(MENU_PANEL_WIDTH, self.layout.canvas.y),
            );
        }
    }

    fn emit_hud(&self, ctx: &mut EngineContext) {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let (reds, colours, cues) = self.pot_log.iter().fold((0, 0, 0), |(r, c, q), p| match p.role {
            BallRole::Red => (r + 1, c, q),
            BallRole::Colour(_) => (r, c + 1, q),
            BallRole::Cue => (r, c, q + 1),
        });
        let stick_shown = self
            .registry
            .cue_position(ctx)
            .and_then(|c| self.cue.pose(c))
            .is_some();
        let (tip, pull) = if stick_shown {
            (self.cue.tip_distance(), self.cue.pull())
        } else {
            (0.0, 0.0)
        };

        let hud = [
            GameEvent::new(game_events::WEATHER, self.weather.index() as f32, 0.0, 0.0),
            GameEvent::new(game_events::MENU, flag(self.menu_visible), 0.0, 0.0),
            GameEvent::new(game_events::CONTROL_MODE, self.cue.mode().index() as f32, 0.0, 0.0),
            GameEvent::new(
                game_events::FOUL,
                flag(self.fouls.banner_active()),
                self.fouls.banner_remaining() as f32,
                self.fouls.foul_count() as f32,
            ),
            GameEvent::new(game_events::POTS, reds as f32, colours as f32, cues as f32),
            GameEvent::new(
                game_events::BALLS,
                self.registry.red_count() as f32,
                self.registry.colour_count() as f32,
                self.registry.cue_count() as f32,
            ),
            GameEvent::new(game_events::POWER, tip, pull, 0.0),
            GameEvent::new(game_events::AIM_ASSIST, flag(self.aim_assist), 0.0, 0.0),
        ];
        for event in hud {
            ctx.emit_event(event);
        }
    }
}

impl Default for SnookerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SnookerGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            world_width: CANVAS.x,
            world_height: CANVAS.y,
            gravity: Vec2::ZERO,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.build_cushions(ctx);
        log::info!(
            "Table {} x {} ready, weather {}",
            2.0 * self.layout.size,
            self.layout.size,
            self.weather.name()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.input.begin_tick(input);
        self.handle_commands(ctx);

        self.apply_weather(ctx);
        ctx.step_physics();

        if let Some(mode) = self.pending_rack.take() {
            self.rack(ctx, mode);
        }

        let captures = self.registry.cleanup(ctx, &self.layout);
        self.record_captures(captures);

        self.preview = None;
        self.notices.clear();
        if self.registry.cue().is_none() {
            self.cue.suspend();
            if !self.menu_visible {
                self.place_cue(ctx);
            }
        } else if self.menu_visible {
            self.cue.suspend();
        } else {
            self.drive_cue(ctx);
        }

        self.fouls.tick();

        match self.weather {
            Weather::Normal => {}
            Weather::Snow => self.snow.tick(&mut self.rng),
            Weather::Rain => self.rain.tick(&mut self.rng),
        }
        self.draw(ctx);
        self.emit_hud(ctx);
    }

    /// Settings restart the session: the table is rebuilt and left empty.
    fn load_config(&mut self, ctx: &mut EngineContext, json: &str) {
        let config = match SnookerConfig::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Rejected settings: {}", e);
                return;
            }
        };
        self.registry.clear(ctx);
        for body in self.cushions.drain(..) {
            ctx.despawn_body(&body);
        }
        let mode = self.cue.mode();
        *self = Self::with_config(config);
        // Control mode survives a restart.
        if self.cue.mode() != mode {
            self.cue.toggle_mode(1);
        }
        self.build_cushions(ctx);
        log::info!("Settings applied, seed {}", self.config.seed);
    }
}
