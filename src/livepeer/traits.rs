use crate::{
    error::Result,
    models::{ImageResponse, ImageToImageRequest, TextToImageRequest},
};
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn text_to_image(&self, request: TextToImageRequest) -> Result<ImageResponse>;

    async fn image_to_image(&self, request: ImageToImageRequest) -> Result<ImageResponse>;
}
