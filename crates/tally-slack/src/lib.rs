//! # tally-slack
//!
//! Slack Web API adapter. Implements the `ChatClient` port from `tally-core`
//! over `reqwest`, exposes the OAuth code exchange used at installation, and
//! verifies incoming webhook signatures.

pub mod client;
pub mod signature;
pub mod types;

pub use client::SlackClient;
pub use signature::{verify_signature, SignatureError, SIGNATURE_HEADER, TIMESTAMP_HEADER};
pub use types::OAuthAccess;
