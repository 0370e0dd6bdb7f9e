//! Overlay rasterization: metrics panel plus the two map views.

pub mod maps;
pub mod panel;
pub mod renderer;
pub mod style;
pub mod text;

pub use renderer::OverlayRenderer;
pub use style::OverlayStyle;
pub use text::FontSet;
