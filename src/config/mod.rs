mod demo;
mod settings;

pub use demo::*;
pub use settings::*;
