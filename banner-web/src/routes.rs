use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::Html;
use banner::font::GlyphTable;
use banner::render::{normalize_newlines, validate};
use serde::Deserialize;
use tokio::task;
use tracing::{info, warn};

use crate::page::{self, FormValues};
use crate::{AppError, Context};

#[derive(Debug, Deserialize)]
pub(crate) struct RenderForm {
    #[serde(default)]
    text: String,
    #[serde(default)]
    banner: String,
}

pub(crate) async fn index(State(context): State<Context>) -> Html<String> {
    let banners = names(&context).await;
    let values = FormValues {
        text: "",
        banner: banners.first().map(String::as_str),
    };
    Html(page::index(&context.routes, &banners, &values, None).into_string())
}

pub(crate) async fn render(
    State(context): State<Context>,
    form: Result<Form<RenderForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Form(form) = form?;
    let text = normalize_newlines(&form.text);
    if text.is_empty() {
        return Err(AppError::EmptyText);
    }
    validate(&text)?;
    let table = load(&context, &form.banner).await?;
    let art = table.render(&text);
    info!(banner = %form.banner, chars = text.chars().count(), "rendered");

    let banners = names(&context).await;
    let values = FormValues {
        text: &text,
        banner: Some(&form.banner),
    };
    let page = page::index(&context.routes, &banners, &values, Some(&art));
    Ok(Html(page.into_string()))
}

pub(crate) async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub(crate) async fn not_found() -> AppError {
    AppError::NotFound
}

async fn load(context: &Context, name: &str) -> Result<Arc<GlyphTable>, AppError> {
    let banners = Arc::clone(&context.banners);
    let name = name.to_owned();
    Ok(task::spawn_blocking(move || banners.load(&name)).await??)
}

/// The banner list for the form, empty if it cannot be read.
async fn names(context: &Context) -> Vec<String> {
    let banners = Arc::clone(&context.banners);
    let names = match task::spawn_blocking(move || banners.names()).await {
        Ok(names) => names.map_err(AppError::from),
        Err(error) => Err(AppError::from(error)),
    };
    names.unwrap_or_else(|error| {
        warn!(%error, "cannot list banners");
        Vec::new()
    })
}
