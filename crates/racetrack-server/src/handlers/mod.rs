//! HTTP handlers, one module per resource.
//!
//! Writes follow the same order everywhere: validate the body, check the
//! referenced records, persist, and map zero affected rows to 404.

pub mod auth;
pub mod drivers;
pub mod health;
pub mod races;
pub mod results;

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};
use racetrack_core::PageRequest;
use serde::{Deserialize, Serialize};

/// JSON body whose rejections render as `{"error": ...}`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters whose rejections render as `{"error": ...}`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParams<T>(pub T);

/// `?page=&limit=`; anything unparsable falls back to the defaults
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    limit: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

impl Created {
    pub fn new(id: i64, message: impl Into<String>) -> Self {
        Self {
            success: true,
            id,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Done {
    pub success: bool,
    pub message: String,
}

impl Done {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
