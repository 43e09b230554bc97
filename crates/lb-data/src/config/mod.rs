//! Dataset loading configuration

pub mod load_options;
pub mod null_handling;

pub use load_options::*;
pub use null_handling::*;
