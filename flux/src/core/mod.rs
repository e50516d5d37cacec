mod config;
mod controller;
pub mod geometry;
mod gesture;
pub mod opacity;
mod window;

pub use config::*;
pub use controller::*;
pub use gesture::*;
pub use window::*;
