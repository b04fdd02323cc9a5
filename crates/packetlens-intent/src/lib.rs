//! # packetlens-intent
//!
//! Client for the intent resolution backend: free-text monitoring intent in,
//! opaque capture-filter expression out. The backend and its criteria model
//! are external collaborators; this crate only speaks their wire shape.

pub mod client;
pub mod error;

pub use client::ResolveClient;
pub use error::IntentError;
