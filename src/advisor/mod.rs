//! AI feeding advisor — prompt templating, context windowing, and the
//! hosted chat-completions client.

pub mod client;
pub mod context;
pub mod prompt;

pub use client::{AdvisorClient, ChatBackend, ChatTurn, MockBackend};
pub use context::build_window;
pub use prompt::build_system_prompt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Cannot reach AI endpoint at {0}")]
    Connection(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("AI endpoint returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse AI response: {0}")]
    ResponseParsing(String),

    #[error("AI response contained no choices")]
    EmptyResponse,
}
