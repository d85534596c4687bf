// src/common/extract.rs

use axum::extract::{FromRequest, FromRequestParts};

use crate::common::error::AppError;

// Mesmos extratores do axum, mas a rejeição passa pelo `AppError`:
// corpo, rota ou query malformados viram 400 com `{ "error": ... }`.

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
