use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse, ValidationError};
use crate::domain::error::DomainError;

/// Build a `Problem` with the type URL, code, instance and trace id filled in.
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> Problem {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(instance);

    if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    }
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let problem = match e {
        DomainError::NotFound { entity, key } => from_parts(
            StatusCode::NOT_FOUND,
            "ROOMHUB_NOT_FOUND",
            &format!("{entity} not found"),
            format!("{entity} '{key}' was not found"),
            instance,
        ),
        DomainError::Validation { violations } => from_parts(
            StatusCode::BAD_REQUEST,
            "ROOMHUB_VALIDATION",
            "Validation error",
            format!("{e}"),
            instance,
        )
        .with_errors(
            violations
                .iter()
                .map(|v| ValidationError {
                    detail: v.message.clone(),
                    pointer: v.pointer.clone(),
                })
                .collect(),
        ),
        DomainError::ScheduleConflict { conflicting_ids } => from_parts(
            StatusCode::CONFLICT,
            "ROOMHUB_SCHEDULE_CONFLICT",
            "Schedule conflict",
            "The space is already reserved for an overlapping time on that date",
            instance,
        )
        .with_conflicting_ids(conflicting_ids.clone()),
        DomainError::Duplicate { .. } => from_parts(
            StatusCode::CONFLICT,
            "ROOMHUB_DUPLICATE",
            "Already exists",
            format!("{e}"),
            instance,
        ),
        DomainError::Unprocessable { message } => from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "ROOMHUB_UNPROCESSABLE",
            "Unprocessable request",
            message.clone(),
            instance,
        ),
        DomainError::Storage { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ROOMHUB_INTERNAL",
                "Internal error",
                "An internal storage error occurred",
                instance,
            )
        }
    };
    ProblemResponse(problem)
}

/// Malformed JSON bodies are reported like any other validation failure.
pub fn map_json_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    ProblemResponse(from_parts(
        StatusCode::BAD_REQUEST,
        "ROOMHUB_VALIDATION",
        "Validation error",
        rejection.body_text(),
        instance,
    ))
}

pub fn map_query_rejection(rejection: &QueryRejection, instance: &str) -> ProblemResponse {
    ProblemResponse(from_parts(
        StatusCode::BAD_REQUEST,
        "ROOMHUB_VALIDATION",
        "Validation error",
        rejection.body_text(),
        instance,
    ))
}
