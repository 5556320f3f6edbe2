pub mod runner;

pub use runner::PracticeRunner;
pub use js_sys;
pub use stroke_engine as engine;

/// Generate all `#[wasm_bindgen]` exports for a practice page.
///
/// Generates:
/// - `thread_local!` storage for the PracticeRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, character selection, pointer input,
///   command buffer and telemetry accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod library;
///
/// stroke_web::export_practice!(library::builtin, "my-practice");
/// ```
///
/// # Arguments
///
/// - `$library`: A function returning the `CharacterSet` to practise
/// - `$name`: A string literal used in log messages
#[macro_export]
macro_rules! export_practice {
    ($library:path, $name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::PracticeRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::PracticeRunner) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call practice_init() first", $name);
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn practice_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let runner = $crate::PracticeRunner::new($library());
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized", $name);
        }

        #[wasm_bindgen]
        pub fn practice_configure(json: &str) -> bool {
            with_runner(|r| r.configure(json)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn practice_set_user(user_id: u32) {
            with_runner(|r| r.set_user(user_id));
        }

        #[wasm_bindgen]
        pub fn practice_select_character(id: u32) -> bool {
            with_runner(|r| r.select_character(id)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn practice_exit() {
            with_runner(|r| r.exit_practice());
        }

        // ---- Pointer input ----

        #[wasm_bindgen]
        pub fn practice_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn practice_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn practice_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn practice_pointer_cancel() {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerCancel));
        }

        // ---- Output ----

        /// Pack pending render commands. Returns how many were written.
        #[wasm_bindgen]
        pub fn practice_flush() -> u32 {
            with_runner(|r| r.flush()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_commands_ptr() -> *const f32 {
            with_runner(|r| r.commands_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_commands_len() -> u32 {
            with_runner(|r| r.commands_len()).unwrap_or(0)
        }

        /// Copy of the command buffer, for hosts without shared memory.
        #[wasm_bindgen]
        pub fn get_commands() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.command_buffer()))
                .unwrap_or_else(|| $crate::js_sys::Float32Array::new_with_length(0))
        }

        #[wasm_bindgen]
        pub fn get_live_path() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.live_path()))
                .unwrap_or_else(|| $crate::js_sys::Float32Array::new_with_length(0))
        }

        #[wasm_bindgen]
        pub fn take_telemetry_json() -> String {
            with_runner(|r| r.take_telemetry_json()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn practice_telemetry_ack(json: &str) {
            with_runner(|r| r.acknowledge_telemetry(json));
        }

        // ---- State accessors ----

        #[wasm_bindgen]
        pub fn get_stroke_index() -> u32 {
            with_runner(|r| r.stroke_index()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_stroke_count() -> u32 {
            with_runner(|r| r.stroke_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn is_character_complete() -> bool {
            with_runner(|r| r.is_complete()).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn get_last_score() -> f32 {
            with_runner(|r| r.last_score()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_character_list_json() -> String {
            with_runner(|r| r.character_list_json()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn get_character_json(id: u32) -> String {
            with_runner(|r| r.character_json(id)).unwrap_or_else(|| "null".to_string())
        }

        #[wasm_bindgen]
        pub fn get_canvas_width() -> f32 {
            with_runner(|r| r.canvas_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_canvas_height() -> f32 {
            with_runner(|r| r.canvas_height()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_protocol_version() -> f32 {
            $crate::engine::PROTOCOL_VERSION
        }
    };
}
