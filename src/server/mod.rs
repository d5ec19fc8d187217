pub mod handlers;
pub mod multipart;
pub mod pages;

use crate::{config::Config, livepeer::ImageGenerator, uploads::UploadStore};
use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn ImageGenerator>,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerator>, uploads: UploadStore) -> Self {
        Self { generator, uploads }
    }
}

/// Registers every route, with the public directory mounted last so the
/// pages and endpoints take precedence over same-named files.
pub fn configure(public_dir: PathBuf) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.route("/", web::get().to(pages::index))
            .route("/text-to-image", web::get().to(pages::text_to_image_page))
            .route("/image-to-image", web::get().to(pages::image_to_image_page))
            .route("/health", web::get().to(handlers::health))
            .route("/api/text-to-image", web::post().to(handlers::text_to_image))
            .route("/api/image-to-image", web::post().to(handlers::image_to_image))
            .service(Files::new("/", public_dir));
    }
}

pub async fn run(config: &Config, generator: Arc<dyn ImageGenerator>) -> std::io::Result<()> {
    let public_dir = config.public_dir();
    tokio::fs::create_dir_all(&public_dir).await?;

    let state = web::Data::new(AppState::new(
        generator,
        UploadStore::new(public_dir.clone()),
    ));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::new("%r %s %b %Dms"))
            .configure(configure(public_dir.clone()))
    })
    .bind((config.host(), config.port()))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Result,
        models::{
            GenerationResult, ImageResponse, ImageToImageRequest, Media, TextToImageRequest,
        },
    };
    use actix_web::{
        http::{header::CONTENT_TYPE, Method, StatusCode},
        test,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoGenerator {
        prompts: Mutex<Vec<String>>,
        uploads: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl ImageGenerator for EchoGenerator {
        async fn text_to_image(&self, request: TextToImageRequest) -> Result<ImageResponse> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            Ok(ImageResponse {
                images: Some(vec![Media {
                    url: format!("https://gw/{}.png", request.prompt.replace(' ', "-")),
                    seed: None,
                    nsfw: None,
                }]),
            })
        }

        async fn image_to_image(&self, request: ImageToImageRequest) -> Result<ImageResponse> {
            self.uploads.lock().unwrap().push(request.image.bytes.clone());
            Ok(ImageResponse { images: None })
        }
    }

    const BOUNDARY: &str = "XxLivegenBoundaryxX";

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    #[actix_web::test]
    async fn test_pages_render() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(AppState::new(
            Arc::new(EchoGenerator::default()),
            UploadStore::new(dir.path()),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        for (uri, marker) in [
            ("/", "Image-to-Image Generator"),
            ("/text-to-image", "Text-to-Image Generator"),
            ("/image-to-image", "Upload Image"),
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            let body = test::read_body(resp).await;
            assert!(String::from_utf8_lossy(&body).contains(marker), "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_text_to_image_endpoint_returns_result_json() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(EchoGenerator::default());
        let state = web::Data::new(AppState::new(generator.clone(), UploadStore::new(dir.path())));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/text-to-image")
            .insert_header((CONTENT_TYPE, multipart_content_type()))
            .set_payload(multipart_body(
                &[("prompt", "blue whale"), ("modelId", "ByteDance/SDXL-Lightning")],
                None,
            ))
            .to_request();
        let result: GenerationResult = test::call_and_read_body_json(&app, req).await;

        assert_eq!(result, GenerationResult::success(vec!["https://gw/blue-whale.png".into()]));
        assert_eq!(*generator.prompts.lock().unwrap(), vec!["blue whale".to_string()]);
    }

    #[actix_web::test]
    async fn test_text_to_image_accepts_urlencoded() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(EchoGenerator::default());
        let state = web::Data::new(AppState::new(generator.clone(), UploadStore::new(dir.path())));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/text-to-image")
            .insert_header((CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("prompt=red+fox&safetyCheck=true")
            .to_request();
        let result: GenerationResult = test::call_and_read_body_json(&app, req).await;

        assert!(result.success);
        assert_eq!(*generator.prompts.lock().unwrap(), vec!["red fox".to_string()]);
    }

    #[actix_web::test]
    async fn test_unsupported_body_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(AppState::new(
            Arc::new(EchoGenerator::default()),
            UploadStore::new(dir.path()),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/text-to-image")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload(r#"{"prompt":"x"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let result: GenerationResult = test::read_body_json(resp).await;
        assert_eq!(result, GenerationResult::failure());
    }

    #[actix_web::test]
    async fn test_image_to_image_upload_is_stored_and_served() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(EchoGenerator::default());
        let state = web::Data::new(AppState::new(generator.clone(), UploadStore::new(dir.path())));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/image-to-image")
            .insert_header((CONTENT_TYPE, multipart_content_type()))
            .set_payload(multipart_body(
                &[("prompt", "make it night"), ("strength", "0.8")],
                Some(("image", "street.png", b"\x89PNGstreet")),
            ))
            .to_request();
        let result: GenerationResult = test::call_and_read_body_json(&app, req).await;

        // The echo generator answers without an images field.
        assert_eq!(result, GenerationResult::failure());
        assert_eq!(*generator.uploads.lock().unwrap(), vec![b"\x89PNGstreet".to_vec()]);
        assert_eq!(std::fs::read(dir.path().join("street.png")).unwrap(), b"\x89PNGstreet");

        let req = test::TestRequest::get().uri("/street.png").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(test::read_body(resp).await.as_ref(), b"\x89PNGstreet");
    }

    #[actix_web::test]
    async fn test_missing_static_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(AppState::new(
            Arc::new(EchoGenerator::default()),
            UploadStore::new(dir.path()),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        let req = test::TestRequest::get().uri("/nope.png").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_static_head_and_content_types() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cat.png"), b"\x89PNGcat").unwrap();
        std::fs::write(dir.path().join("cat.avif"), b"avif-bytes").unwrap();
        let state = web::Data::new(AppState::new(
            Arc::new(EchoGenerator::default()),
            UploadStore::new(dir.path()),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        let head = test::TestRequest::default()
            .method(Method::HEAD)
            .uri("/cat.png")
            .to_request();
        let resp = test::call_service(&app, head).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "image/png");

        let req = test::TestRequest::get().uri("/cat.avif").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "image/avif");
        assert_eq!(test::read_body(resp).await.as_ref(), b"avif-bytes");
    }

    #[actix_web::test]
    async fn test_static_paths_cannot_escape_public_dir() {
        let root = tempfile::tempdir().unwrap();
        let public = root.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(root.path().join("secret.txt"), b"top secret").unwrap();
        let state = web::Data::new(AppState::new(
            Arc::new(EchoGenerator::default()),
            UploadStore::new(&public),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(public.clone())),
        )
        .await;

        for uri in ["/../secret.txt", "/%2e%2e/secret.txt", "/..%2fsecret.txt"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert!(!resp.status().is_success(), "{uri}");
            let body = test::read_body(resp).await;
            assert!(!String::from_utf8_lossy(&body).contains("top secret"), "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(AppState::new(
            Arc::new(EchoGenerator::default()),
            UploadStore::new(dir.path()),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure(dir.path().to_path_buf())),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({"status": "ok"}));
    }
}
