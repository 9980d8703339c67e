use crate::form::SubmissionForm;
use crate::store::PgRecordStore;
use crate::utils::e500;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use anyhow::Context;
use once_cell::sync::Lazy;
use tera::{Context as TemplateContext, Tera};
use tokio::sync::Mutex;

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    // The template is embedded in the binary so rendering never depends on the working
    // directory the server happens to be launched from.
    tera.add_raw_template("home.html", include_str!("../../templates/home.html"))
        .expect("Failed to register the home page template");
    tera
});

/// Render the form page from the current form state.
///
/// Each page view is a fresh mount of the form, so the recent list is refreshed before
/// rendering. The refresh is best-effort: if the store is unreachable the previously
/// fetched list is shown instead and no error surfaces.
pub async fn home(
    form: web::Data<Mutex<SubmissionForm<PgRecordStore>>>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut form = form.lock().await;
    form.refresh_recent().await;

    let state = form.state();
    let mut context = TemplateContext::new();
    context.insert("email_input", &state.email_input);
    context.insert("error_message", &state.error_message);
    context.insert("last_inserted", &state.last_inserted);
    context.insert("recent", &state.recent);

    let html_body = TEMPLATES
        .render("home.html", &context)
        .context("Error rendering the home page")
        .map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html_body))
}
