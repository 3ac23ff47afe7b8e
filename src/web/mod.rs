//! HTTP surface for webtoolkit.
//!
//! This module holds the JSON codec and the axum glue around the toolkit:
//! error rendering, the strict JSON extractor and a small demo API.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod json;
pub mod router;
pub mod server;

pub use extract::StrictJson;
pub use json::{decode_json, error_json, read_body, read_json, write_json, JsonResponse};
pub use router::create_router;
pub use server::WebServer;
