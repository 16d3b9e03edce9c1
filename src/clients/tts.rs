use serde::{Deserialize, Serialize};

use super::{ClientResult, GeneratedAudio, ServiceClient, VoicesResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSpeechRequest {
    pub text: String,
    pub target_voice: String,
}

/// Client for the remote text-to-speech service
#[derive(Debug, Clone)]
pub struct TtsClient {
    inner: ServiceClient,
}

impl TtsClient {
    pub fn new(base_url: &str, credential: &str) -> ClientResult<Self> {
        Ok(Self {
            inner: ServiceClient::new("tts", base_url, credential)?,
        })
    }

    pub fn service(&self) -> &ServiceClient {
        &self.inner
    }

    /// `GET {base}/voices`
    pub async fn list_voices(&self) -> ClientResult<VoicesResponse> {
        self.inner.get_json("voices").await
    }

    /// `POST {base}/generate`
    pub async fn generate(&self, request: &GenerateSpeechRequest) -> ClientResult<GeneratedAudio> {
        self.inner.post_json("generate", request).await
    }
}
