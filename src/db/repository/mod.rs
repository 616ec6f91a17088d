pub mod chat;
pub mod profile;

pub use chat::*;
pub use profile::*;
