mod config;
mod handle;
mod range;

pub use config::*;
pub use handle::*;
pub use range::*;
