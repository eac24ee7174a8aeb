//! Клиент для работы с ElevenLabs text-to-speech API

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::json;

use super::SpeechSynthesizer;
use crate::config::RunConfig;
use crate::error::{Result, WordAudioError};

/// Cap on the error-body excerpt carried in failure records and logs
const ERROR_EXCERPT_CHARS: usize = 300;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// One request per call, no batching; the transport's defaults bound the
/// request (no explicit timeout layer).
pub struct ElevenLabsClient {
    api_key: String,
    endpoint: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(&config.api_key, &config.endpoint)
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_EXCERPT_CHARS).collect()
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, voice_id: &str, model_id: &str, text: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/v1/text-to-speech/{}?optimize_streaming_latency=0",
            self.endpoint, voice_id
        );

        debug!("Sending TTS request for voice {}", voice_id);
        let response = HTTP_CLIENT
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": model_id,
                "voice_settings": {
                    "stability": 0.4,
                    "similarity_boost": 0.7,
                },
            }))
            .send()
            .await
            .map_err(|e| WordAudioError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("Failed to read error response: {}", e),
            };
            return Err(WordAudioError::Synthesis {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WordAudioError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/text-to-speech/voice-1")
            .match_query(mockito::Matcher::Any)
            .match_header("xi-api-key", "key-1")
            .with_status(200)
            .with_body(vec![1u8, 2, 3, 4])
            .create_async()
            .await;

        let client = ElevenLabsClient::new("key-1", &server.url());
        let bytes = client
            .synthesize("voice-1", "eleven_multilingual_v2", "Hallo")
            .await
            .unwrap();

        assert_eq!(bytes, vec![1, 2, 3, 4]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_synthesis_error_with_excerpt() {
        let mut server = mockito::Server::new_async().await;
        let long_body = "x".repeat(1000);
        server
            .mock("POST", "/v1/text-to-speech/voice-1")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body(&long_body)
            .create_async()
            .await;

        let client = ElevenLabsClient::new("key-1", &server.url());
        let err = client
            .synthesize("voice-1", "eleven_multilingual_v2", "Hallo")
            .await
            .unwrap_err();

        match err {
            WordAudioError::Synthesis { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body.chars().count(), ERROR_EXCERPT_CHARS);
            }
            other => panic!("expected Synthesis error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // порт 1 закрыт, соединение сбрасывается
        let client = ElevenLabsClient::new("key-1", "http://127.0.0.1:1");
        let err = client
            .synthesize("voice-1", "eleven_multilingual_v2", "Hallo")
            .await
            .unwrap_err();
        assert!(matches!(err, WordAudioError::Transport(_)));
    }
}
