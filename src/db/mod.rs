//! Database Module
//!
//! SQLite 폼 카탈로그와 폼별 동적 제출 테이블 관리

mod schema;

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params_from_iter, Connection, OptionalExtension};

use crate::error::FormError;
use crate::fields::build_field_mapping;
use crate::models::{FieldSpec, Form, SubmissionPage};

pub use schema::{COLUMN_LABELS, STANDARD_COLUMNS, SUBMISSION_TABLE_PREFIX, TIMESTAMP_COLUMN};

/// 데이터베이스 상태 (호스트 앱 상태로 관리)
pub struct DbState(pub Mutex<Database>);

/// 데이터베이스 래퍼
pub struct Database {
    conn: Connection,
}

impl Database {
    /// 새 데이터베이스 연결 생성
    pub fn new(path: &Path) -> Result<Self, FormError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// 메모리 전용 연결 생성
    pub fn in_memory() -> Result<Self, FormError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 환경변수 `FORMS_DB_PATH` 로 경로를 읽어 연결 생성 (기본값 forms.db)
    pub fn open_from_env() -> Result<Self, FormError> {
        // .env 파일이 없을 수 있으므로 로드 실패는 무시
        let _ = dotenvy::dotenv();
        let path = std::env::var("FORMS_DB_PATH").unwrap_or_else(|_| "forms.db".to_string());
        Self::new(Path::new(&path))
    }

    /// 카탈로그 스키마 초기화
    pub fn initialize(&self) -> Result<(), FormError> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }

    /// 폼 메타데이터 조회
    pub fn get_form(&self, form_id: i64) -> Result<Form, FormError> {
        read_form(&self.conn, form_id)
    }

    /// 폼 목록 조회 (최근 생성 순)
    pub fn list_forms(&self) -> Result<Vec<Form>, FormError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, field_mapping, table_name, created_at
             FROM forms ORDER BY id DESC",
        )?;
        let iter = stmt.query_map([], map_form_row)?;

        let mut out = Vec::new();
        for form in iter {
            out.push(form?);
        }
        Ok(out)
    }

    /// 폼 생성: 카탈로그 행 삽입과 전용 제출 테이블 생성을 하나의 트랜잭션으로 처리
    pub fn create_form(
        &self,
        title: &str,
        description: Option<&str>,
        raw_fields: &str,
    ) -> Result<Form, FormError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }

        let mapping = build_field_mapping(raw_fields)?;
        let created_at = chrono::Utc::now().timestamp_millis();

        let tx = self.conn.unchecked_transaction()?;

        // 카탈로그 행을 먼저 넣어야 id 가 확정되고, 그 id 로 테이블명을 역기입
        let form_id = insert_form_row(&tx, title, description, &mapping, created_at)?;
        let table_name = format!("{}{}", schema::SUBMISSION_TABLE_PREFIX, form_id);
        set_table_name(&tx, form_id, &table_name)?;

        // 고정 컬럼 + 커스텀 컬럼(선언 순서)으로 제출 테이블 생성.
        // 테이블명은 시스템이 만든 값이라 그대로 쓰고, 컬럼명은 전부 인용부호로 감쌈
        let mut columns = vec![
            "id INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            "name TEXT NOT NULL".to_string(),
            "email TEXT NOT NULL".to_string(),
            "phone TEXT NOT NULL".to_string(),
            "timestamp TEXT NOT NULL".to_string(),
        ];
        for spec in &mapping {
            columns.push(format!("\"{}\" TEXT NOT NULL DEFAULT ''", spec.sanitized_name));
        }
        tx.execute_batch(&format!(
            "CREATE TABLE {} ({});",
            table_name,
            columns.join(", ")
        ))?;

        tx.commit()?;
        log::debug!("form {} provisioned (table {})", form_id, table_name);

        Ok(Form {
            id: form_id,
            title: title.to_string(),
            description: description.map(|s| s.to_string()),
            field_mapping: mapping,
            table_name: Some(table_name),
            created_at,
        })
    }

    /// 폼 삭제: 제출 테이블 DROP 과 카탈로그 행 삭제를 하나의 트랜잭션으로 처리
    pub fn delete_form(&self, form_id: i64) -> Result<(), FormError> {
        let form = read_form(&self.conn, form_id)?;

        let tx = self.conn.unchecked_transaction()?;
        if let Some(table_name) = form.table_name.as_deref().filter(|t| !t.is_empty()) {
            // 테이블이 외부에서 이미 지워졌어도 카탈로그 정리는 계속 진행
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", table_name))?;
        }
        tx.execute("DELETE FROM forms WHERE id = ?1", [form_id])?;
        tx.commit()?;
        Ok(())
    }

    /// 제출 저장: 필드 매핑 순서대로 커스텀 값을 전용 테이블에 기록
    ///
    /// 누락된 입력값은 빈 문자열로 저장합니다 (에러 아님).
    pub fn submit(
        &self,
        form_id: i64,
        values: &HashMap<String, String>,
    ) -> Result<(), FormError> {
        let form = read_form(&self.conn, form_id)?;
        let table_name = form
            .table_name
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(FormError::FormNotProvisioned(form_id))?;

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut columns: Vec<&str> = vec!["name", "email", "phone", schema::TIMESTAMP_COLUMN];
        let mut row_values: Vec<String> = vec![
            values.get("name").cloned().unwrap_or_default(),
            values.get("email").cloned().unwrap_or_default(),
            values.get("phone").cloned().unwrap_or_default(),
            timestamp,
        ];
        for spec in &form.field_mapping {
            columns.push(&spec.sanitized_name);
            row_values.push(values.get(&spec.original_name).cloned().unwrap_or_default());
        }

        // 컬럼 자리에는 sanitize 를 거친 시스템 소유 식별자만 사용, 값은 전부 바인딩
        let column_list = columns
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=row_values.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table_name, column_list, placeholders
            ),
            params_from_iter(row_values),
        )?;
        Ok(())
    }

    /// 제출 목록 조회: 실제 테이블 컬럼과 선언된 매핑을 대조해 표시 순서를 결정
    ///
    /// 표시 순서는 name/email/phone → 커스텀(선언 순서) → timestamp 이며,
    /// 물리적으로 존재하는 컬럼만 포함합니다.
    pub fn list_submissions(&self, form_id: i64) -> Result<SubmissionPage, FormError> {
        let form = read_form(&self.conn, form_id)?;
        let Some(table_name) = form.table_name.as_deref().filter(|t| !t.is_empty()) else {
            // 테이블이 아직 없는 폼은 데이터가 없는 것으로 취급
            return Ok(SubmissionPage { headers: Vec::new(), rows: Vec::new() });
        };

        let live_columns = self.table_columns(table_name)?;
        if live_columns.is_empty() {
            // 테이블 자체가 외부에서 제거된 경우
            log::warn!("form {}: table {} is missing", form_id, table_name);
            return Ok(SubmissionPage { headers: Vec::new(), rows: Vec::new() });
        }

        let mut headers: Vec<String> = Vec::new();
        let mut selected: Vec<&str> = Vec::new();
        for col in schema::STANDARD_COLUMNS {
            if live_columns.contains(col) {
                headers.push(label_for(col));
                selected.push(col);
            }
        }
        for spec in &form.field_mapping {
            if live_columns.contains(spec.sanitized_name.as_str()) {
                headers.push(spec.original_name.clone());
                selected.push(&spec.sanitized_name);
            } else {
                log::warn!(
                    "form {}: declared column {} missing from {}",
                    form_id,
                    spec.sanitized_name,
                    table_name
                );
            }
        }
        if live_columns.contains(schema::TIMESTAMP_COLUMN) {
            headers.push(label_for(schema::TIMESTAMP_COLUMN));
            selected.push(schema::TIMESTAMP_COLUMN);
        }

        if selected.is_empty() {
            return Ok(SubmissionPage { headers: Vec::new(), rows: Vec::new() });
        }

        let select_list = selected
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY id DESC",
            select_list, table_name
        ))?;

        let width = selected.len();
        let iter = stmt.query_map([], |row| {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                let value: Option<String> = row.get(i)?;
                cells.push(value.unwrap_or_default());
            }
            Ok(cells)
        })?;

        let mut rows = Vec::new();
        for row in iter {
            rows.push(row?);
        }
        Ok(SubmissionPage { headers, rows })
    }

    /// 폼의 제출 건수 (관리 화면 집계용)
    pub fn count_submissions(&self, form_id: i64) -> Result<i64, FormError> {
        let form = read_form(&self.conn, form_id)?;
        let Some(table_name) = form.table_name.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(0);
        };
        if self.table_columns(table_name)?.is_empty() {
            return Ok(0);
        }

        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table_name),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 테이블의 실제 컬럼 이름 집합 (테이블이 없으면 빈 집합)
    fn table_columns(&self, table_name: &str) -> Result<HashSet<String>, FormError> {
        let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let iter = stmt.query_map([table_name], |row| row.get::<_, String>(0))?;

        let mut out = HashSet::new();
        for name in iter {
            out.insert(name?);
        }
        Ok(out)
    }
}

/// 고정 컬럼의 표시 라벨 조회
fn label_for(column: &str) -> String {
    schema::COLUMN_LABELS
        .get(column)
        .copied()
        .unwrap_or(column)
        .to_string()
}

/// 카탈로그 행 삽입 (table_name 은 미정 상태로 남김), 생성된 id 반환
fn insert_form_row(
    conn: &Connection,
    title: &str,
    description: Option<&str>,
    mapping: &[FieldSpec],
    created_at: i64,
) -> Result<i64, FormError> {
    conn.execute(
        "INSERT INTO forms (title, description, field_mapping, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        (title, description, serde_json::to_string(mapping)?, created_at),
    )?;
    Ok(conn.last_insert_rowid())
}

/// 카탈로그 행에 제출 테이블명 기록
fn set_table_name(conn: &Connection, form_id: i64, table_name: &str) -> Result<(), FormError> {
    conn.execute(
        "UPDATE forms SET table_name = ?1 WHERE id = ?2",
        (table_name, form_id),
    )?;
    Ok(())
}

/// 카탈로그에서 폼 1행 조회
fn read_form(conn: &Connection, form_id: i64) -> Result<Form, FormError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, field_mapping, table_name, created_at
         FROM forms WHERE id = ?1",
    )?;
    stmt.query_row([form_id], map_form_row)
        .optional()?
        .ok_or(FormError::FormNotFound(form_id))
}

fn map_form_row(row: &rusqlite::Row) -> rusqlite::Result<Form> {
    let mapping_json: String = row.get(3)?;
    Ok(Form {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        field_mapping: serde_json::from_str(&mapping_json).unwrap_or_default(),
        table_name: row.get(4)?,
        created_at: row.get(5)?,
    })
}
