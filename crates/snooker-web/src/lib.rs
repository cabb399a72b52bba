pub mod runner;

pub use runner::GameRunner;

#[doc(hidden)]
pub use js_sys;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers,
///   configuration loading, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use snooker_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// snooker_web::export_game!(MyGame, "my-game", vectors);
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `snooker_engine::Game`
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_config(json: &str) {
            with_runner(|r| r.load_config(json));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_header() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(&r.header()[..]))
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };

    // Variant with vectors feature
    ($game_type:ty, $game_name:literal, vectors) => {
        $crate::export_game!($game_type, $game_name);

        // ---- Vector accessors (only when vectors feature is enabled) ----

        #[wasm_bindgen]
        pub fn get_vector_vertices_ptr() -> *const f32 {
            with_runner(|r| r.vector_vertices_ptr())
        }

        #[wasm_bindgen]
        pub fn get_vector_vertex_count() -> u32 {
            with_runner(|r| r.vector_vertex_count())
        }

        #[wasm_bindgen]
        pub fn get_max_vector_vertices() -> u32 {
            with_runner(|r| r.max_vector_vertices())
        }
    };
}
