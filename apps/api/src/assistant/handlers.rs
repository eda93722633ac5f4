//! Axum route handlers for the résumé page and its JSON twin.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use tracing::info;

use crate::assistant::{run_feature, Feature, FeatureContext, FeatureOutput};
use crate::errors::AppError;
use crate::render::PageView;
use crate::resume::extract::extract_resume_text;
use crate::resume::upload::{read_upload_form, ResumeUpload, UploadForm};
use crate::state::AppState;

/// GET /
pub async fn handle_page() -> Result<Html<String>, AppError> {
    Ok(Html(PageView::landing(Feature::default()).render()?))
}

/// POST /
///
/// Runs the selected feature and renders the page. Every user-facing failure,
/// from a rejected upload to an LLM error, becomes an error banner on the page;
/// failures are never rendered as model output.
pub async fn handle_page_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(err) => return failed_page(Feature::default(), "", err),
    };
    let file_name = form
        .resume
        .as_ref()
        .map(|upload| upload.file_name.clone())
        .unwrap_or_default();
    let feature = match feature_of(&form) {
        Ok(feature) => feature,
        Err(err) => return failed_page(Feature::default(), &file_name, err),
    };

    let Some(upload) = form.resume else {
        return Ok(Html(PageView::landing(feature).render()?));
    };

    match process(&state, feature, &upload).await {
        Ok(output) => Ok(Html(
            PageView::with_output(feature, &upload.file_name, &output).render()?,
        )),
        Err(err) => failed_page(feature, &upload.file_name, err),
    }
}

/// Banner for errors the person can act on; anything else stays a server error.
fn failed_page(feature: Feature, file_name: &str, err: AppError) -> Result<Html<String>, AppError> {
    match err {
        AppError::Validation(_)
        | AppError::PayloadTooLarge(_)
        | AppError::Extraction(_)
        | AppError::Llm(_) => {
            tracing::warn!("Feature '{}' failed: {err}", feature.mode());
            let view = PageView::failed(feature, file_name, err.user_message());
            Ok(Html(view.render()?))
        }
        err => Err(err),
    }
}

/// POST /api/v1/analyze
///
/// Same pipeline as the page, returning `FeatureOutput` as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<FeatureOutput>, AppError> {
    let form = read_upload_form(multipart).await?;
    let feature = feature_of(&form)?;
    let upload = form
        .resume
        .ok_or_else(|| AppError::Validation("A PDF resume upload is required".to_string()))?;

    Ok(Json(process(&state, feature, &upload).await?))
}

fn feature_of(form: &UploadForm) -> Result<Feature, AppError> {
    Feature::from_form(form.mode.as_deref(), form.interview_kind.as_deref())
}

async fn process(
    state: &AppState,
    feature: Feature,
    upload: &ResumeUpload,
) -> Result<FeatureOutput, AppError> {
    info!(
        "Processing '{}' ({} bytes) for feature '{}'",
        upload.file_name,
        upload.bytes.len(),
        feature.mode()
    );

    let resume = extract_resume_text(upload.bytes.clone(), &state.config.staging_dir).await?;

    let ctx = FeatureContext {
        llm: state.llm.as_ref(),
        search: state.search.as_ref(),
        search_interval: state.config.search_interval,
    };
    Ok(run_feature(feature, &resume, &ctx).await?)
}
