pub mod common;
pub mod edit;
pub mod gemini;
pub mod image;
pub mod progress;
pub mod suggestion;

pub use common::*;
pub use edit::*;
pub use image::*;
pub use progress::*;
pub use suggestion::*;
