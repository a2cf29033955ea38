pub mod input;
pub mod status;
pub mod viewer;

pub use input::*;
pub use status::*;
pub use viewer::*;
