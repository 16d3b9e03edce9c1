use serde::{Deserialize, Serialize};

use super::{ClientResult, GeneratedAudio, ServiceClient, VoicesResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertVoiceRequest {
    /// Storage key returned by the upload relay
    pub source_audio_key: String,
    pub target_voice: String,
}

/// Client for the remote voice conversion (SeedVC) service
#[derive(Debug, Clone)]
pub struct VoiceConversionClient {
    inner: ServiceClient,
}

impl VoiceConversionClient {
    pub fn new(base_url: &str, credential: &str) -> ClientResult<Self> {
        Ok(Self {
            inner: ServiceClient::new("seedvc", base_url, credential)?,
        })
    }

    pub fn service(&self) -> &ServiceClient {
        &self.inner
    }

    /// `GET {base}/voices`
    pub async fn list_voices(&self) -> ClientResult<VoicesResponse> {
        self.inner.get_json("voices").await
    }

    /// `POST {base}/convert`
    pub async fn convert(&self, request: &ConvertVoiceRequest) -> ClientResult<GeneratedAudio> {
        self.inner.post_json("convert", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_convert_posts_key_and_voice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert"))
            .and(header("authorization", "Bearer vc-token"))
            .and(body_json(serde_json::json!({
                "source_audio_key": "seedvc-audio-uploads/1-a.wav",
                "target_voice": "alice"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "audio_url": "https://cdn.example.com/out.wav",
                "s3_key": "outputs/out.wav"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VoiceConversionClient::new(&server.uri(), "vc-token").unwrap();
        let audio = client
            .convert(&ConvertVoiceRequest {
                source_audio_key: "seedvc-audio-uploads/1-a.wav".to_string(),
                target_voice: "alice".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(audio.s3_key, "outputs/out.wav");
        assert_eq!(audio.audio_url, "https://cdn.example.com/out.wav");
    }

    #[tokio::test]
    async fn test_non_success_becomes_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/voices"))
            .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
            .mount(&server)
            .await;

        let client = VoiceConversionClient::new(&server.uri(), "vc-token").unwrap();
        match client.list_voices().await {
            Err(crate::clients::ClientError::Upstream { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "warming up");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
