use super::traits::ImageGenerator;
use crate::{
    error::{LivegenError, Result},
    models::{
        ImageResponse, ImageToImageRequest, ModelCategory, ModelInfo, TextToImageRequest,
        IMAGE_TO_IMAGE_MODELS, TEXT_TO_IMAGE_MODELS,
    },
};
use async_trait::async_trait;
use reqwest::{
    header::AUTHORIZATION,
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde_json::Value;

#[derive(Clone)]
pub struct GenerateClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GenerateClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        let text = TEXT_TO_IMAGE_MODELS.iter().map(|id| ModelInfo {
            id: id.to_string(),
            category: ModelCategory::TextToImage,
        });
        let image = IMAGE_TO_IMAGE_MODELS.iter().map(|id| ModelInfo {
            id: id.to_string(),
            category: ModelCategory::ImageToImage,
        });
        text.chain(image).collect()
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), route)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(AUTHORIZATION, format!("Bearer {}", key)),
            None => builder,
        }
    }

    pub async fn text_to_image(&self, request: TextToImageRequest) -> Result<ImageResponse> {
        let url = self.endpoint("text-to-image");

        log::debug!("Generating image with model: {}", request.model_id);
        log::debug!(
            "Text-to-image request payload: {}",
            serde_json::to_string(&request)?
        );

        let response = self
            .authorize(self.http.post(&url))
            .json(&request)
            .send()
            .await?;

        Self::read_image_response(response).await
    }

    pub async fn image_to_image(&self, request: ImageToImageRequest) -> Result<ImageResponse> {
        let url = self.endpoint("image-to-image");
        let fields = request.text_parts();

        log::debug!(
            "Transforming image {} ({} bytes) with model: {}",
            request.image.file_name,
            request.image.bytes.len(),
            request.model_id
        );

        let mut image = Part::bytes(request.image.bytes).file_name(request.image.file_name);
        if let Some(content_type) = request.image.content_type.as_deref() {
            image = image.mime_str(content_type)?;
        }

        let mut form = Form::new().part("image", image);
        for (name, value) in fields {
            form = form.text(name, value);
        }

        let response = self
            .authorize(self.http.post(&url))
            .multipart(form)
            .send()
            .await?;

        Self::read_image_response(response).await
    }

    async fn read_image_response(response: Response) -> Result<ImageResponse> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(String::from))
                .unwrap_or_else(|| "request failed".to_string());
            log::debug!("Gateway answered {} with body: {}", status, body);
            return Err(LivegenError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| LivegenError::ResponseError(e.to_string()))
    }
}

/// Pulls a readable message out of a gateway error body. The gateway uses
/// `{"detail": {"msg": ..}}` for its own errors and a list of `{"msg": ..}`
/// for validation failures.
fn error_message(body: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            let trimmed = body.trim();
            return (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
    };

    match value.get("detail") {
        Some(Value::String(msg)) => Some(msg.clone()),
        Some(Value::Object(detail)) => detail
            .get("msg")
            .and_then(Value::as_str)
            .map(String::from),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}

#[async_trait]
impl ImageGenerator for GenerateClient {
    async fn text_to_image(&self, request: TextToImageRequest) -> Result<ImageResponse> {
        GenerateClient::text_to_image(self, request).await
    }

    async fn image_to_image(&self, request: ImageToImageRequest) -> Result<ImageResponse> {
        GenerateClient::image_to_image(self, request).await
    }
}
