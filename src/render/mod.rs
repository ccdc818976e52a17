//! Per-fragment clip rendering with a skip-if-present cache.

mod cache;
mod renderer;

pub use cache::{ClipCache, FsClipCache};
pub use renderer::{RenderOutcome, Renderer};
