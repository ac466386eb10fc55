//! Narration text-to-speech.
//!
//! Primary path: PlayHT with the user's cloned voice (cloned on first use
//! from the sample audio in the request credentials). Fallback path: Google
//! Translate TTS, whose raw MP3 bytes are published through a temporary
//! public file host. The primary-to-fallback switch is the only silent
//! recovery in the whole system.

pub mod client;
pub mod error;
pub mod fallback;
pub mod playht;

pub use client::{VoiceClient, VoiceConfig};
pub use error::{VoiceError, VoiceResult};
