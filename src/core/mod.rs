pub mod chat;
pub mod completion;
pub mod display;
pub mod failure;
pub mod summary;
pub mod transcript;
pub mod video_id;

#[cfg(test)]
pub(crate) mod stubs;

pub use chat::*;
pub use completion::*;
pub use display::*;
pub use failure::*;
pub use summary::*;
pub use transcript::*;
