use crate::models::{
    DEFAULT_DIMENSION, DEFAULT_GUIDANCE_SCALE, DEFAULT_IMAGES_PER_PROMPT,
    DEFAULT_IMAGE_GUIDANCE_SCALE, DEFAULT_INFERENCE_STEPS, DEFAULT_SEED, DEFAULT_STRENGTH,
    IMAGE_DIMENSIONS, IMAGE_TO_IMAGE_MODELS, TEXT_TO_IMAGE_MODELS,
};
use actix_web::{http::header::ContentType, HttpResponse};

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f3f4f6; }
.page { min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 1rem; }
.card { width: 100%; max-width: 42rem; background: #fff; border-radius: .5rem; padding: 2rem; box-shadow: 0 10px 15px rgba(0,0,0,.1); }
h1 { text-align: center; font-size: 1.5rem; margin: 0 0 1.5rem; }
h2 { font-size: 1.25rem; margin: 0 0 1rem; }
form { display: grid; gap: 1rem; }
label { display: block; font-size: .875rem; font-weight: 500; color: #374151; }
input, select, textarea { margin-top: .25rem; width: 100%; box-sizing: border-box; padding: .5rem .75rem; border: 1px solid #d1d5db; border-radius: .375rem; }
.pair { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
button { padding: .5rem 1rem; border: 0; border-radius: .375rem; background: #2563eb; color: #fff; font-weight: 500; cursor: pointer; }
button:disabled { opacity: .6; cursor: default; }
.gallery { margin-top: 2rem; }
.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.grid img { width: 100%; height: auto; border-radius: .5rem; box-shadow: 0 4px 6px rgba(0,0,0,.1); }
nav a { display: block; margin: .5rem 0; color: #2563eb; }
"#;

// Submits the form as multipart and prepends returned URLs to the gallery.
const SCRIPT: &str = r#"
(function () {
  const form = document.getElementById('generate-form');
  const button = form.querySelector('button[type=submit]');
  const gallery = document.getElementById('gallery');
  const grid = document.getElementById('gallery-grid');
  form.addEventListener('submit', async function (event) {
    event.preventDefault();
    const data = new FormData(form);
    button.disabled = true;
    button.textContent = 'Generating...';
    try {
      const response = await fetch(form.dataset.action, { method: 'POST', body: data });
      const result = await response.json();
      if (result.success) {
        const first = grid.firstChild;
        for (const src of result.images) {
          const img = document.createElement('img');
          img.src = src;
          grid.insertBefore(img, first);
        }
        grid.querySelectorAll('img').forEach(function (img, index) {
          img.alt = 'Generated Image ' + (index + 1);
        });
        gallery.hidden = grid.children.length === 0;
      }
    } catch (err) {
      console.error(err);
    } finally {
      button.disabled = false;
      button.textContent = 'Generate Images';
    }
  });
})();
"#;

pub async fn index() -> HttpResponse {
    html(render_index())
}

pub async fn text_to_image_page() -> HttpResponse {
    html(render_text_to_image())
}

pub async fn image_to_image_page() -> HttpResponse {
    html(render_image_to_image())
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

pub fn render_index() -> String {
    layout(
        "Livepeer AI",
        r#"<nav>
<a href="/text-to-image">Text-to-Image Generator</a>
<a href="/image-to-image">Image-to-Image Generator</a>
</nav>"#,
    )
}

pub fn render_text_to_image() -> String {
    let dimensions: Vec<String> = IMAGE_DIMENSIONS.iter().map(u32::to_string).collect();
    let dimension_options: Vec<(&str, &str)> =
        dimensions.iter().map(|d| (d.as_str(), d.as_str())).collect();
    let default_dimension = DEFAULT_DIMENSION.to_string();

    let fields = [
        textarea("prompt", "Prompt", true),
        model_select(TEXT_TO_IMAGE_MODELS),
        format!(
            r#"<div class="pair">{}{}</div>"#,
            select("height", "Height", &dimension_options, &default_dimension),
            select("width", "Width", &dimension_options, &default_dimension),
        ),
        number(
            "guidanceScale",
            "Guidance Scale",
            Some("1"),
            Some("20"),
            Some("0.1"),
            &DEFAULT_GUIDANCE_SCALE.to_string(),
        ),
        textarea("negativePrompt", "Negative Prompt", false),
        safety_select(),
        common_numbers(),
    ];

    generator_page("Text-to-Image Generator", "/api/text-to-image", &fields.concat())
}

pub fn render_image_to_image() -> String {
    let fields = [
        concat!(
            r#"<div><label for="image">Upload Image</label>"#,
            r#"<input id="image" name="image" type="file" accept="image/*"></div>"#,
        )
        .to_string(),
        textarea("prompt", "Prompt", true),
        model_select(IMAGE_TO_IMAGE_MODELS),
        format!(
            r#"<div class="pair">{}{}</div>"#,
            number(
                "guidanceScale",
                "Guidance Scale",
                Some("1"),
                Some("20"),
                Some("0.1"),
                &DEFAULT_GUIDANCE_SCALE.to_string(),
            ),
            number(
                "imageGuidanceScale",
                "Image Guidance Scale",
                Some("0"),
                Some("2"),
                Some("0.1"),
                &DEFAULT_IMAGE_GUIDANCE_SCALE.to_string(),
            ),
        ),
        number(
            "strength",
            "Strength",
            Some("0"),
            Some("1"),
            Some("0.01"),
            &DEFAULT_STRENGTH.to_string(),
        ),
        textarea("negativePrompt", "Negative Prompt", false),
        safety_select(),
        common_numbers(),
    ];

    generator_page("Image-to-Image Generator", "/api/image-to-image", &fields.concat())
}

fn common_numbers() -> String {
    [
        number(
            "numInferenceSteps",
            "Num Inference Steps",
            Some("1"),
            Some("100"),
            None,
            &DEFAULT_INFERENCE_STEPS.to_string(),
        ),
        number(
            "numImagesPerPrompt",
            "Num Images Per Prompt",
            Some("1"),
            Some("4"),
            None,
            &DEFAULT_IMAGES_PER_PROMPT.to_string(),
        ),
        number("seed", "Seed", None, None, None, &DEFAULT_SEED.to_string()),
    ]
    .concat()
}

fn generator_page(title: &str, action: &str, fields: &str) -> String {
    let body = format!(
        r#"<form id="generate-form" data-action="{action}" method="post" enctype="multipart/form-data">
{fields}
<button type="submit">Generate Images</button>
</form>
<section id="gallery" class="gallery" hidden>
<h2>Generated Images</h2>
<div id="gallery-grid" class="grid"></div>
</section>
<script>{SCRIPT}</script>"#,
        action = escape_html(action),
        fields = fields,
        SCRIPT = SCRIPT,
    );
    layout(title, &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="page"><div class="card">
<h1>{title}</h1>
{body}
</div></div>
</body>
</html>"#,
        title = escape_html(title),
        STYLE = STYLE,
        body = body,
    )
}

fn textarea(name: &str, label: &str, required: bool) -> String {
    format!(
        r#"<div><label for="{name}">{label}</label><textarea id="{name}" name="{name}"{required}></textarea></div>"#,
        name = escape_html(name),
        label = escape_html(label),
        required = if required { " required" } else { "" },
    )
}

fn number(
    name: &str,
    label: &str,
    min: Option<&str>,
    max: Option<&str>,
    step: Option<&str>,
    default: &str,
) -> String {
    let mut attrs = String::new();
    for (attr, value) in [("min", min), ("max", max), ("step", step)] {
        if let Some(value) = value {
            attrs.push_str(&format!(r#" {}="{}""#, attr, escape_html(value)));
        }
    }
    format!(
        r#"<div><label for="{name}">{label}</label><input id="{name}" name="{name}" type="number"{attrs} value="{default}"></div>"#,
        name = escape_html(name),
        label = escape_html(label),
        attrs = attrs,
        default = escape_html(default),
    )
}

fn select(name: &str, label: &str, options: &[(&str, &str)], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|(value, text)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(value),
                if *value == selected { " selected" } else { "" },
                escape_html(text)
            )
        })
        .collect();
    format!(
        r#"<div><label for="{name}">{label}</label><select id="{name}" name="{name}">{options}</select></div>"#,
        name = escape_html(name),
        label = escape_html(label),
        options = options,
    )
}

fn model_select(models: &[&str]) -> String {
    let options: Vec<(&str, &str)> = models.iter().map(|id| (*id, *id)).collect();
    select("modelId", "Model ID", &options, models.first().copied().unwrap_or_default())
}

fn safety_select() -> String {
    select(
        "safetyCheck",
        "Safety Check",
        &[("true", "Enabled"), ("false", "Disabled")],
        "true",
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
