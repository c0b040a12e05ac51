//! Form Data Models
//!
//! 폼 카탈로그와 제출 데이터에 대응하는 Rust 데이터 모델

use serde::{Deserialize, Serialize};

/// 커스텀 필드 하나의 선언 (표시용 이름 ↔ 저장용 컬럼 식별자)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "sanitizedName")]
    pub sanitized_name: String,
}

/// 폼 메타데이터 (카탈로그 1행)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "fieldMapping")]
    pub field_mapping: Vec<FieldSpec>,
    #[serde(rename = "tableName")]
    pub table_name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// 제출 목록 표시용 페이로드 (헤더 순서 = 각 행의 값 순서)
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPage {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
