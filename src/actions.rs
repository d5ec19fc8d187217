//! Submission handlers behind the two forms.
//!
//! Each handler forwards one submission to the generator and collapses
//! every failure into [`GenerationResult::failure`]. The cause is logged,
//! never returned to the browser.

use crate::{
    error::{LivegenError, Result},
    livepeer::ImageGenerator,
    logger,
    models::{
        FormData, GenerationResult, ImageResponse, ImageToImageRequest, TextToImageRequest,
        UploadedFile,
    },
    uploads::UploadStore,
};
use uuid::Uuid;

pub const IMAGE_FIELD: &str = "image";

pub async fn text_to_image(generator: &dyn ImageGenerator, form: FormData) -> GenerationResult {
    let request_id = new_request_id();
    let request = TextToImageRequest::from_form(&form);

    log::info!(
        "[req:{}] text-to-image with {} ({} images requested)",
        request_id,
        request.model_id,
        request.num_images_per_prompt.unwrap_or(1)
    );

    let _timer = logger::timer(&format!("[req:{}] text-to-image", request_id));
    gate(&request_id, generator.text_to_image(request).await)
}

pub async fn image_to_image(
    generator: &dyn ImageGenerator,
    uploads: &UploadStore,
    mut form: FormData,
) -> GenerationResult {
    let request_id = new_request_id();

    let Some(upload) = form.take_file(IMAGE_FIELD) else {
        log::warn!("[req:{}] image-to-image submitted without an image", request_id);
        return GenerationResult::failure();
    };

    let image = match persist_and_reload(uploads, upload).await {
        Ok(image) => image,
        Err(e) => {
            log::error!("[req:{}] could not stage upload: {}", request_id, e);
            return GenerationResult::failure();
        }
    };

    let request = ImageToImageRequest::from_form(&form, image);
    log::info!(
        "[req:{}] image-to-image on {} with {}",
        request_id,
        request.image.file_name,
        request.model_id
    );

    let _timer = logger::timer(&format!("[req:{}] image-to-image", request_id));
    gate(&request_id, generator.image_to_image(request).await)
}

/// Writes the upload into the public directory and reads the outbound bytes
/// back from disk.
async fn persist_and_reload(uploads: &UploadStore, upload: UploadedFile) -> Result<UploadedFile> {
    let path = uploads.save(&upload).await?;
    let bytes = uploads.read_back(&path).await?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
        .ok_or_else(|| LivegenError::UploadError(format!("unusable path {}", path.display())))?;

    Ok(UploadedFile {
        file_name,
        content_type: upload.content_type,
        bytes,
    })
}

fn gate(request_id: &str, outcome: Result<ImageResponse>) -> GenerationResult {
    match outcome.map(|response| response.urls()) {
        Ok(Some(images)) => {
            log::info!("[req:{}] received {} image(s)", request_id, images.len());
            GenerationResult::success(images)
        }
        Ok(None) => {
            log::warn!("[req:{}] gateway response had no images field", request_id);
            GenerationResult::failure()
        }
        Err(e) => {
            log::error!("[req:{}] generation failed: {}", request_id, e);
            GenerationResult::failure()
        }
    }
}

fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
