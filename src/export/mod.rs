//! PDF export of a filtered task list.

pub mod handlers;
pub mod renderer;
pub mod template;

pub use renderer::PdfRenderer;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::export_routes()
}
