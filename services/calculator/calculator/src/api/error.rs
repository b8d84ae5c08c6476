use std::borrow::Cow;

use log::error;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{response, Request};
use serde::Serialize;

use telemetry::IsErr;

#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    InternalError(String),
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse<'a> {
    pub(crate) message: Cow<'a, str>,
}

impl<'r> response::Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (message, status) = match self {
            ApiError::InternalError(e) => {
                error!("Internal Error: {}", e);
                (
                    Cow::Borrowed("Internal Server Error"),
                    Status::InternalServerError,
                )
            }
            ApiError::InvalidRequest(e) => (Cow::Owned(e), Status::BadRequest),
        };
        response::status::Custom(status, Json(ErrorResponse { message })).respond_to(req)
    }
}

impl<'a> From<rocket::serde::json::Error<'a>> for ApiError {
    fn from(e: rocket::serde::json::Error<'a>) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

impl From<Box<dyn std::error::Error>> for ApiError {
    fn from(e: Box<dyn std::error::Error>) -> Self {
        ApiError::InternalError(e.to_string())
    }
}

impl IsErr for ApiError {
    fn is_err(&self) -> bool {
        matches!(self, ApiError::InternalError(_))
    }
}
