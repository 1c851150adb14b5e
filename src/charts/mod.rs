//! Charts module - Chart rendering

mod renderer;

pub use renderer::{ChartRenderer, RenderError, DEFAULT_BLUE, GREEN, ORANGE, PURPLE, SKY_BLUE};
