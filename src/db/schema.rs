//! Database Schema
//!
//! 폼 카탈로그 테이블 스키마와 고정 제출 컬럼 정의

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// 카탈로그 스키마 생성 SQL
pub const CREATE_SCHEMA: &str = r#"
-- 폼 카탈로그 테이블
CREATE TABLE IF NOT EXISTS forms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    field_mapping TEXT NOT NULL,  -- JSON Array of FieldSpec
    table_name TEXT,
    created_at INTEGER NOT NULL
);

-- 카탈로그 인덱스
CREATE INDEX IF NOT EXISTS idx_forms_created ON forms(created_at);
"#;

/// 제출 테이블 이름 접두사 (뒤에 폼 id 가 붙음)
pub const SUBMISSION_TABLE_PREFIX: &str = "form_submissions_";

/// 모든 제출 테이블이 갖는 고정 입력 컬럼 (표시 순서)
pub const STANDARD_COLUMNS: [&str; 3] = ["name", "email", "phone"];

/// 제출 시각 컬럼 (항상 마지막에 표시)
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// 고정 컬럼의 표시 라벨
pub static COLUMN_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("name", "姓名"),
        ("email", "電子郵件"),
        ("phone", "手機號碼"),
        ("timestamp", "提交時間"),
    ])
});
