// Speech synthesis module
// Contains the synthesis seam and the ElevenLabs backend

use async_trait::async_trait;

use crate::error::Result;

pub mod elevenlabs;

pub use elevenlabs::ElevenLabsClient;

/// Trait all synthesis backends implement
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Produce the audio for one piece of text.
    async fn synthesize(&self, voice_id: &str, model_id: &str, text: &str) -> Result<Vec<u8>>;
}

/// Dry-run substitute: succeeds immediately without bytes or network I/O.
pub struct NullSynthesizer;

#[async_trait]
impl SpeechSynthesizer for NullSynthesizer {
    async fn synthesize(&self, _voice_id: &str, _model_id: &str, _text: &str) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}
