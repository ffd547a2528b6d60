mod frame;
mod uniform;

pub use frame::{CanvasFrame, CanvasLayout};
pub use uniform::FrameUniforms;
