use super::{multipart::read_form, AppState};
use crate::{actions, models::GenerationResult};
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

pub async fn text_to_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> HttpResponse {
    let form = match read_form(&req, payload).await {
        Ok(form) => form,
        Err(e) => return bad_form(e),
    };

    let result = actions::text_to_image(state.generator.as_ref(), form).await;
    HttpResponse::Ok().json(result)
}

pub async fn image_to_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> HttpResponse {
    let form = match read_form(&req, payload).await {
        Ok(form) => form,
        Err(e) => return bad_form(e),
    };

    let result = actions::image_to_image(state.generator.as_ref(), &state.uploads, form).await;
    HttpResponse::Ok().json(result)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

fn bad_form(err: crate::LivegenError) -> HttpResponse {
    log::warn!("Rejected submission: {}", err);
    HttpResponse::BadRequest().json(GenerationResult::failure())
}
