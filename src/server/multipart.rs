use crate::{
    error::{LivegenError, Result},
    models::{FormData, UploadedFile},
};
use actix_multipart::Multipart;
use actix_web::{http::header::CONTENT_TYPE, web, HttpRequest};
use futures::StreamExt;
use std::collections::HashMap;

/// Decodes a form submission body, either `multipart/form-data` or
/// `application/x-www-form-urlencoded`.
pub async fn read_form(req: &HttpRequest, payload: web::Payload) -> Result<FormData> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        read_multipart(Multipart::new(req.headers(), payload)).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        read_urlencoded(payload).await
    } else {
        Err(LivegenError::RequestError(format!(
            "unsupported content type: {:?}",
            content_type
        )))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormData> {
    let mut form = FormData::new();

    while let Some(item) = multipart.next().await {
        let mut field = item.map_err(|e| LivegenError::RequestError(e.to_string()))?;

        let disposition = field.content_disposition().clone();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(String::from);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| LivegenError::RequestError(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            // Browsers send an empty, unnamed part for a file input left blank.
            Some(file_name) if file_name.is_empty() && bytes.is_empty() => {}
            Some(file_name) => {
                let mut file = UploadedFile::new(file_name, bytes);
                file.content_type = content_type;
                form.set_file(name, file);
            }
            None => form.set(name, String::from_utf8_lossy(&bytes).into_owned()),
        }
    }

    Ok(form)
}

async fn read_urlencoded(mut payload: web::Payload) -> Result<FormData> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| LivegenError::RequestError(e.to_string()))?;
        body.extend_from_slice(&chunk);
    }

    let body = String::from_utf8(body).map_err(|e| LivegenError::RequestError(e.to_string()))?;
    let pairs = web::Query::<HashMap<String, String>>::from_query(&body)
        .map_err(|e| LivegenError::RequestError(e.to_string()))?;

    Ok(pairs.into_inner().into_iter().collect())
}
