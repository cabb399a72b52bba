use snooker_engine::bridge::protocol::HEADER_FLOATS;
use snooker_engine::{
    EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue, ProtocolLayout,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame: u64,
    header: [f32; HEADER_FLOATS],
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame);
        let layout = ProtocolLayout::from_config(&config);
        let header = layout.header(0, 0, 0);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            timestep,
            layout,
            config,
            initialized: false,
            frame: 0,
            header,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Hand a JSON settings document to the game.
    pub fn load_config(&mut self, json: &str) {
        self.game.load_config(&mut self.ctx, json);
    }

    /// Run one animation frame: as many fixed ticks as the elapsed time
    /// allows. Buffered input goes to the first tick only; when no tick is
    /// due it stays queued for the next frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        let steps = self.timestep.accumulate(dt);
        if steps == 0 {
            return;
        }

        let input = std::mem::take(&mut self.input);
        let idle = InputQueue::new();

        for step in 0..steps {
            // Each tick repaints from scratch; the host sees the last one.
            self.ctx.clear_frame_data();
            let queue = if step == 0 { &input } else { &idle };
            self.game.update(&mut self.ctx, queue);
        }

        self.frame += 1;
        self.header = self
            .layout
            .header(self.frame, self.vector_vertex_count_raw(), self.ctx.events.len());
    }

    #[cfg(feature = "vectors")]
    fn vector_vertex_count_raw(&self) -> usize {
        self.ctx.vectors.vertex_count()
    }

    #[cfg(not(feature = "vectors"))]
    fn vector_vertex_count_raw(&self) -> usize {
        0
    }

    // ---- Accessors for host-side reads ----

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.ctx.vectors.buffer_ptr()
    }

    pub fn vector_vertex_count(&self) -> u32 {
        self.vector_vertex_count_raw().min(self.layout.max_vector_vertices) as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_vector_vertices(&self) -> u32 {
        self.layout.max_vector_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
