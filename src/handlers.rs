use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder, Result};
use futures_util::StreamExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::error::AppError;
use crate::page;
use crate::report::ReportStyle;
use crate::session::{SessionStore, StagedImage};

pub const SESSION_COOKIE: &str = "session_id";

/// Shared by every worker. The classifier handle is immutable after startup.
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub sessions: SessionStore,
    pub report_style: ReportStyle,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>, report_style: ReportStyle) -> Self {
        Self {
            classifier,
            sessions: SessionStore::new(),
            report_style,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/upload").route(web::post().to(upload)))
        .service(web::resource("/image").route(web::get().to(staged_image)))
        .service(web::resource("/analyze").route(web::post().to(analyze)))
        .service(web::resource("/guidance").route(web::post().to(guidance)))
        .service(web::resource("/report").route(web::get().to(report)))
        .service(web::resource("/health").route(web::get().to(health)));
}

/// Session id from the cookie, minting a new one (and its cookie) if absent.
fn session_id(req: &HttpRequest) -> (Uuid, Option<Cookie<'static>>) {
    let existing = req
        .cookie(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());
    match existing {
        Some(id) => (id, None),
        None => {
            let id = Uuid::new_v4();
            let cookie = Cookie::build(SESSION_COOKIE, id.to_string())
                .path("/")
                .http_only(true)
                .finish();
            (id, Some(cookie))
        }
    }
}

fn with_cookie(mut builder: HttpResponseBuilder, cookie: Option<Cookie<'static>>) -> HttpResponseBuilder {
    if let Some(cookie) = cookie {
        builder.cookie(cookie);
    }
    builder
}

fn back_to_page(cookie: Option<Cookie<'static>>) -> HttpResponse {
    with_cookie(HttpResponse::SeeOther(), cookie)
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn image_content_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let (id, cookie) = session_id(&req);
    let html = state.sessions.view(id, page::render);
    with_cookie(HttpResponse::Ok(), cookie)
        .content_type("text/html; charset=utf-8")
        .body(html)
}

pub async fn upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let (id, cookie) = session_id(&req);
    let mut staged = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let (name, file_name) = {
            let cd = field.content_disposition();
            (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().unwrap_or("upload").to_string(),
            )
        };
        if name != "file" {
            continue;
        }

        let content_type = image_content_type(&file_name)
            .ok_or_else(|| AppError::UnsupportedUpload(file_name.clone()))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk?);
        }

        staged = Some(StagedImage {
            file_name,
            content_type,
            bytes,
        });
    }

    let staged = staged.ok_or(AppError::MissingField)?;

    // Header-only probe, like opening the image for the preview.
    let readable = image::io::Reader::new(Cursor::new(&staged.bytes))
        .with_guessed_format()
        .ok()
        .and_then(|r| r.into_dimensions().ok());

    match readable {
        Some((width, height)) => {
            info!(session = %id, file = %staged.file_name, width, height, "staged upload");
            state.sessions.update(id, |s| s.stage(staged));
        }
        None => {
            warn!(session = %id, file = %staged.file_name, "upload is not a readable image");
            state.sessions.update(id, |s| s.reject_upload());
        }
    }

    Ok(back_to_page(cookie))
}

pub async fn staged_image(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (id, _) = session_id(&req);
    let (content_type, bytes) = state
        .sessions
        .view(id, |s| s.staged().map(|i| (i.content_type, i.bytes.clone())))
        .ok_or(AppError::NothingStaged)?;

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

pub async fn analyze(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (id, cookie) = session_id(&req);
    let bytes = state
        .sessions
        .view(id, |s| s.staged().map(|i| i.bytes.clone()))
        .ok_or(AppError::NothingStaged)?;

    let outcome = state.classifier.classify(bytes).await;
    match &outcome {
        Ok(result) => info!(
            session = %id,
            label = %result.label(),
            confidence = result.confidence(),
            risk = %result.risk(),
            "analysis complete"
        ),
        Err(e) => warn!(session = %id, error = %e, "analysis failed"),
    }
    state.sessions.update(id, |s| s.record(&outcome));

    Ok(back_to_page(cookie))
}

pub async fn guidance(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let (id, cookie) = session_id(&req);
    state.sessions.update_existing(id, |s| s.show_guidance());
    back_to_page(cookie)
}

pub async fn report(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (id, _) = session_id(&req);
    let style = state.report_style;
    let now = chrono::Local::now().naive_local();
    let text = state
        .sessions
        .view(id, |s| s.report(now, style))
        .ok_or(AppError::NoResult)?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", style.file_name()),
        ))
        .body(text))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
