mod app;
mod app_state;
pub mod canvas;
pub mod compositor;
pub mod controller;
pub mod drawing;
mod event_handler;
pub mod gallery;
pub mod geometry;
pub mod math;
pub mod raster;
mod renderer;
pub mod settings;
mod state;
pub mod stroke_engine;
pub mod style;
mod update_logic;

pub use app::run;
pub use controller::{Controller, GestureState, InputEvent};
pub use drawing::{DrawMode, ShapePath};
pub use raster::{Capabilities, Raster, Surface};
pub use style::{Color, StyleChange, StyleState};
