use std::sync::Arc;

use axum::{
    Form,
    extract::{self, rejection::FormRejection},
    http::Method,
    response::Html,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    answer::{process, spawn_answer},
    error::AppError,
    state::State,
};

#[derive(Deserialize, Default)]
pub struct Question {
    #[serde(default)]
    input_text: String,
}

pub async fn index_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.index()?))
}

/// Bodies that are not url-encoded carry no form fields and count as an empty question.
fn read_question(form: Result<Form<Question>, FormRejection>) -> Result<Question, AppError> {
    match form {
        Ok(Form(question)) => Ok(question),
        Err(FormRejection::InvalidFormContentType(rejection)) => {
            debug!("Ignoring non-form body: {}", rejection.body_text());
            Ok(Question::default())
        }
        Err(rejection) => Err(AppError::MalformedForm(rejection.body_text())),
    }
}

pub async fn submit_handler(
    extract::State(state): extract::State<Arc<State>>,
    form: Result<Form<Question>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let question = read_question(form)?;

    let id = state.next_submission_id();
    info!(id, "Question received: {}", question.input_text);

    let echo = process(&question.input_text, 0);
    let snippet = state.templates.snippet(&echo, id)?;
    spawn_answer(state, id, question.input_text);

    Ok(Html(snippet))
}

pub async fn unsupported_handler(method: Method) -> AppError {
    AppError::MethodNotSupported(method)
}
