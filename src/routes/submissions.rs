use crate::form::SubmissionForm;
use crate::store::PgRecordStore;
use crate::utils::see_other;
use actix_web::{web, HttpResponse};
use tokio::sync::Mutex;

#[derive(serde::Deserialize)]
pub struct FormData {
    email: String,
}

/// Drive one submission cycle on the shared form.
///
/// The outcome - a validation error, a store error or a freshly inserted record - lands in
/// the form state and is rendered by `home` after the redirect (Post/Redirect/Get, so a
/// browser reload never replays the insert).
#[tracing::instrument(
    name = "Handling a form submission",
    skip(form, submission_form),
    fields(email = %form.email)
)]
pub async fn submit(
    form: web::Form<FormData>,
    submission_form: web::Data<Mutex<SubmissionForm<PgRecordStore>>>,
) -> HttpResponse {
    let mut submission_form = submission_form.lock().await;
    submission_form.input_changed(form.0.email);
    submission_form.submit().await;

    see_other("/")
}
