use serde::{Deserialize, Serialize};

pub const GENERATION_FAILED: &str = "Failed to generate images";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub category: ModelCategory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ModelCategory {
    TextToImage,
    ImageToImage,
}

/// One generated image as returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub nsfw: Option<bool>,
}

/// Body of a successful generation call. `images` is optional because the
/// outcome gate treats a missing list as a failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageResponse {
    #[serde(default)]
    pub images: Option<Vec<Media>>,
}

impl ImageResponse {
    pub fn urls(&self) -> Option<Vec<String>> {
        self.images
            .as_ref()
            .map(|images| images.iter().map(|image| image.url.clone()).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub success: bool,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn success(images: Vec<String>) -> Self {
        Self {
            success: true,
            images,
            error: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            images: Vec::new(),
            error: Some(GENERATION_FAILED.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_images_field_deserializes_to_none() {
        let response: ImageResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.urls(), None);

        let response: ImageResponse = serde_json::from_str(r#"{"images":[]}"#).unwrap();
        assert_eq!(response.urls(), Some(vec![]));
    }

    #[test]
    fn test_urls_keep_gateway_order() {
        let response: ImageResponse = serde_json::from_str(
            r#"{"images":[{"url":"https://a/1.png","seed":7,"nsfw":false},{"url":"https://a/2.png"}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.urls(),
            Some(vec![
                "https://a/1.png".to_string(),
                "https://a/2.png".to_string()
            ])
        );
    }

    #[test]
    fn test_failure_result_shape() {
        let json = serde_json::to_value(GenerationResult::failure()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "images": [],
                "error": "Failed to generate images"
            })
        );

        let json = serde_json::to_value(GenerationResult::success(vec!["u".into()])).unwrap();
        assert!(json.get("error").is_none());
    }
}
