use wasm_bindgen::prelude::*;

mod library;

stroke_web::export_practice!(library::builtin, "calligraphy-practice");
