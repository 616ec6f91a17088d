pub mod chat;
pub mod enums;
pub mod profile;

pub use chat::ChatMessage;
pub use profile::{InfantProfile, ProfileDraft, ValidationError};
