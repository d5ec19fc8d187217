pub mod generate_client;
pub mod traits;

use crate::{
    config::LivepeerConfig,
    error::{LivegenError, Result},
    models::{ImageResponse, ImageToImageRequest, TextToImageRequest},
};
use async_trait::async_trait;
use std::time::Duration;

pub use generate_client::GenerateClient;
pub use traits::ImageGenerator;

/// Entry point to the hosted Livepeer AI gateway.
#[derive(Clone)]
pub struct LivepeerClient {
    generate_client: GenerateClient,
    base_url: String,
}

impl LivepeerClient {
    pub fn new(config: LivepeerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| LivegenError::ConfigError(format!("HTTP client: {}", e)))?;

        if !config.has_api_key() {
            log::warn!("LIVEPEER_API_KEY is not set, requests will be sent without a bearer token");
        }

        let base_url = config.base_url().to_string();

        Ok(Self {
            generate_client: GenerateClient::new(http, base_url.clone(), config.api_key),
            base_url,
        })
    }

    pub fn generate(&self) -> &GenerateClient {
        &self.generate_client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ImageGenerator for LivepeerClient {
    async fn text_to_image(&self, request: TextToImageRequest) -> Result<ImageResponse> {
        self.generate_client.text_to_image(request).await
    }

    async fn image_to_image(&self, request: ImageToImageRequest) -> Result<ImageResponse> {
        self.generate_client.image_to_image(request).await
    }
}
