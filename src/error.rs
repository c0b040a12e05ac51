//! Form Engine Error Types
//!
//! 애플리케이션 전역 에러 타입 정의

use serde::Serialize;
use thiserror::Error;

/// 폼 엔진 에러
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Form not found: {0}")]
    FormNotFound(i64),

    #[error("Form has no submission table: {0}")]
    FormNotProvisioned(i64),

    #[error("Form title must not be empty")]
    EmptyTitle,

    #[error("Too many custom fields: {0} (max 10)")]
    TooManyFields(usize),

    #[error("Field name too long: {0}")]
    FieldNameTooLong(String),
}

/// 호스트(요청 처리 계층) 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<FormError> for ApiError {
    fn from(error: FormError) -> Self {
        let code = match &error {
            FormError::Database(_) => "DB_ERROR",
            FormError::Io(_) => "IO_ERROR",
            FormError::Serialization(_) => "SERIALIZATION_ERROR",
            FormError::FormNotFound(_) => "FORM_NOT_FOUND",
            FormError::FormNotProvisioned(_) => "FORM_NOT_PROVISIONED",
            FormError::EmptyTitle
            | FormError::TooManyFields(_)
            | FormError::FieldNameTooLong(_) => "VALIDATION_ERROR",
        };

        match &error {
            // 내부 에러 문자열(테이블/컬럼명이 섞일 수 있음)은 details 와 로그로만 전달
            FormError::Database(_) | FormError::Io(_) | FormError::Serialization(_) => {
                log::error!("storage failure: {}", error);
                ApiError {
                    code: code.to_string(),
                    message: "Storage operation failed".to_string(),
                    details: Some(error.to_string()),
                }
            }
            _ => ApiError {
                code: code.to_string(),
                message: error.to_string(),
                details: None,
            },
        }
    }
}

/// 호스트 명령 결과 타입
pub type ApiResult<T> = Result<T, ApiError>;
