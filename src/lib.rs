//! Dynamic Form Engine
//!
//! 운영자가 런타임에 정의하는 폼 스키마와 제출 데이터를 SQLite 로 관리하는
//! 백엔드 라이브러리입니다. HTTP 라우팅/템플릿 렌더링은 호스트 계층이 담당합니다.

pub mod db;
pub mod error;
pub mod fields;
pub mod models;

pub use db::{Database, DbState};
pub use error::{ApiError, ApiResult, FormError};
pub use models::{FieldSpec, Form, SubmissionPage};
