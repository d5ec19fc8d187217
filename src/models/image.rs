use super::form::{FormData, UploadedFile};
use serde::Serialize;

pub const TEXT_TO_IMAGE_MODELS: &[&str] = &[
    "ByteDance/SDXL-Lightning",
    "SG161222/RealVisXL_V4.0",
    "SG161222/RealVisXL_V4.0_Lightning",
    "black-forest-labs/FLUX.1-dev",
    "black-forest-labs/FLUX.1-schnell",
    "runwayml/stable-diffusion-v1-5",
    "stabilityai/stable-diffusion-3-medium-diffusers",
];

pub const IMAGE_TO_IMAGE_MODELS: &[&str] = &["timbrooks/instruct-pix2pix"];

pub const IMAGE_DIMENSIONS: &[u32] = &[256, 512, 768, 1024];

pub const DEFAULT_DIMENSION: u32 = 512;
pub const DEFAULT_GUIDANCE_SCALE: f64 = 7.5;
pub const DEFAULT_IMAGE_GUIDANCE_SCALE: f64 = 1.5;
pub const DEFAULT_STRENGTH: f64 = 0.8;
pub const DEFAULT_INFERENCE_STEPS: u32 = 50;
pub const DEFAULT_IMAGES_PER_PROMPT: u32 = 1;
pub const DEFAULT_SEED: i64 = 0;

/// JSON body of `POST /text-to-image`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextToImageRequest {
    pub model_id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f64>,
    pub negative_prompt: String,
    pub safety_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_images_per_prompt: Option<i64>,
}

impl TextToImageRequest {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            model_id: form.text("modelId"),
            prompt: form.text("prompt"),
            width: form.int("width"),
            height: form.int("height"),
            guidance_scale: form.float("guidanceScale"),
            negative_prompt: form.text("negativePrompt"),
            safety_check: form.flag("safetyCheck"),
            seed: form.int("seed"),
            num_inference_steps: form.int("numInferenceSteps"),
            num_images_per_prompt: form.int("numImagesPerPrompt"),
        }
    }
}

/// Fields of `POST /image-to-image`; sent as multipart with `image` as a file part.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageToImageRequest {
    pub image: UploadedFile,
    pub model_id: String,
    pub prompt: String,
    pub strength: Option<f64>,
    pub guidance_scale: Option<f64>,
    pub image_guidance_scale: Option<f64>,
    pub negative_prompt: String,
    pub safety_check: bool,
    pub seed: Option<i64>,
    pub num_inference_steps: Option<i64>,
    pub num_images_per_prompt: Option<i64>,
}

impl ImageToImageRequest {
    pub fn from_form(form: &FormData, image: UploadedFile) -> Self {
        Self {
            image,
            model_id: form.text("modelId"),
            prompt: form.text("prompt"),
            strength: form.float("strength"),
            guidance_scale: form.float("guidanceScale"),
            image_guidance_scale: form.float("imageGuidanceScale"),
            negative_prompt: form.text("negativePrompt"),
            safety_check: form.flag("safetyCheck"),
            seed: form.int("seed"),
            num_inference_steps: form.int("numInferenceSteps"),
            num_images_per_prompt: form.int("numImagesPerPrompt"),
        }
    }

    /// Every non-file part, in wire order, with unset numbers left out.
    pub fn text_parts(&self) -> Vec<(&'static str, String)> {
        let mut parts = vec![
            ("model_id", self.model_id.clone()),
            ("prompt", self.prompt.clone()),
        ];
        if let Some(strength) = self.strength {
            parts.push(("strength", strength.to_string()));
        }
        if let Some(scale) = self.guidance_scale {
            parts.push(("guidance_scale", scale.to_string()));
        }
        if let Some(scale) = self.image_guidance_scale {
            parts.push(("image_guidance_scale", scale.to_string()));
        }
        parts.push(("negative_prompt", self.negative_prompt.clone()));
        parts.push(("safety_check", self.safety_check.to_string()));
        if let Some(seed) = self.seed {
            parts.push(("seed", seed.to_string()));
        }
        if let Some(steps) = self.num_inference_steps {
            parts.push(("num_inference_steps", steps.to_string()));
        }
        if let Some(count) = self.num_images_per_prompt {
            parts.push(("num_images_per_prompt", count.to_string()));
        }
        parts
    }
}
