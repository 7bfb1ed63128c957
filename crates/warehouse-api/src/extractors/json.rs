//! Body, query and path extractors that reject with the API error shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body whose parse failures become `VALIDATION_ERROR` responses.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Query string whose parse failures become `VALIDATION_ERROR` responses.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// Path parameters whose parse failures become `VALIDATION_ERROR` responses.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
