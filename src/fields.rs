//! Field Name Sanitizer & Validator
//!
//! 운영자가 입력한 자유 형식 필드명을 안전한 저장용 컬럼 식별자로 변환

use crate::error::FormError;
use crate::models::FieldSpec;

/// 커스텀 컬럼 네임스페이스 접두사
///
/// 고정 컬럼(name/email/phone/timestamp)이나 SQL 예약어와 절대 겹치지 않도록
/// 모든 커스텀 컬럼은 이 접두사로 시작합니다.
pub const FIELD_PREFIX: &str = "field_";

/// 폼당 최대 커스텀 필드 수
pub const MAX_FIELDS: usize = 10;

/// 필드명 최대 길이 (문자 수 기준)
pub const MAX_FIELD_NAME_LEN: usize = 50;

/// 표시용 필드명을 저장용 컬럼 식별자로 변환
///
/// 앞뒤 공백 제거 후 ASCII 영숫자 외 문자는 전부 `_` 로 치환하고 소문자화,
/// 숫자로 시작하면 `_` 를 덧붙인 뒤 [`FIELD_PREFIX`] 를 앞에 붙입니다.
/// 순수 함수이며 어떤 입력에도 실패하지 않습니다 (빈 입력은 상위
/// 검증기에서 걸러짐).
pub fn sanitize_identifier(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        format!("{}_{}", FIELD_PREFIX, cleaned)
    } else {
        format!("{}{}", FIELD_PREFIX, cleaned)
    }
}

/// 원시 필드 입력 문자열을 검증해 FieldMapping 으로 변환
///
/// 쉼표(반각/전각)와 공백으로 구분하고, 중복은 첫 등장만 남기며
/// 개수/길이 제한을 위반하면 즉시 에러를 돌려줍니다.
pub fn build_field_mapping(raw: &str) -> Result<Vec<FieldSpec>, FormError> {
    // 커스텀 필드가 없는 폼도 유효함
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut names: Vec<&str> = Vec::new();
    for piece in raw.split(|c: char| c == ',' || c == '，' || c.is_whitespace()) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        // 같은 이름이 두 번 입력되면 첫 번째만 유지
        if !names.contains(&piece) {
            names.push(piece);
        }
    }

    if names.len() > MAX_FIELDS {
        return Err(FormError::TooManyFields(names.len()));
    }

    for name in &names {
        if name.chars().count() > MAX_FIELD_NAME_LEN {
            return Err(FormError::FieldNameTooLong(name.to_string()));
        }
    }

    // 위치 접미사 덕분에 sanitize 결과가 같은 이름끼리도 컬럼명이 유일함
    Ok(names
        .iter()
        .enumerate()
        .map(|(i, name)| FieldSpec {
            original_name: name.to_string(),
            sanitized_name: format!("{}_{}", sanitize_identifier(name), i),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_is_deterministic() {
        for input in ["出生年月日", " Hello World ", "9lives", "email!!", ""] {
            assert_eq!(sanitize_identifier(input), sanitize_identifier(input));
        }
    }

    #[test]
    fn test_sanitize_output_pattern() {
        // field_ 접두사 + 소문자/숫자/_ 만 남아야 함
        for input in ["Ab-Cd", "  spaced out  ", "中文欄位", "a.b.c", "Phone #2"] {
            let out = sanitize_identifier(input);
            assert!(out.starts_with(FIELD_PREFIX), "{}", out);
            assert!(out
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
        assert_eq!(sanitize_identifier("Phone #2"), "field_phone__2");
    }

    #[test]
    fn test_sanitize_digit_start_gets_underscore() {
        assert_eq!(sanitize_identifier("9月"), "field__9_");
        assert_eq!(sanitize_identifier("2nd"), "field__2nd");
    }

    #[test]
    fn test_collision_gets_distinct_columns() {
        // 세 이름 모두 같은 베이스(field_name_)로 sanitize 되는 경우
        let mapping = build_field_mapping("name!, name?, name#").unwrap();
        assert_eq!(mapping.len(), 3);

        let mut sanitized: Vec<&str> =
            mapping.iter().map(|f| f.sanitized_name.as_str()).collect();
        sanitized.sort();
        sanitized.dedup();
        assert_eq!(sanitized.len(), 3);
    }

    #[test]
    fn test_empty_input_is_empty_mapping() {
        assert!(build_field_mapping("").unwrap().is_empty());
        assert!(build_field_mapping("   ").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let mapping = build_field_mapping("生日, 生日, 血型").unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[0].original_name, "生日");
        assert_eq!(mapping[1].original_name, "血型");
    }

    #[test]
    fn test_fullwidth_comma_and_whitespace_split() {
        let mapping = build_field_mapping("生日，血型 學校").unwrap();
        let names: Vec<&str> = mapping.iter().map(|f| f.original_name.as_str()).collect();
        assert_eq!(names, vec!["生日", "血型", "學校"]);
    }

    #[test]
    fn test_too_many_fields_rejected() {
        let raw = (0..11)
            .map(|i| format!("欄位{}", i))
            .collect::<Vec<_>>()
            .join(",");
        match build_field_mapping(&raw) {
            Err(FormError::TooManyFields(n)) => assert_eq!(n, 11),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_long_field_name_rejected() {
        let long = "a".repeat(51);
        match build_field_mapping(&long) {
            Err(FormError::FieldNameTooLong(name)) => assert_eq!(name, long),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_limits_boundary_accepted() {
        // 정확히 10개 × 50자까지는 허용
        let raw = (0..10)
            .map(|i| format!("{}{}", "a".repeat(49), i))
            .collect::<Vec<_>>()
            .join(",");
        let mapping = build_field_mapping(&raw).unwrap();
        assert_eq!(mapping.len(), 10);
        assert!(mapping
            .iter()
            .all(|f| f.original_name.chars().count() == 50));
    }

    #[test]
    fn test_mapping_preserves_input_order() {
        let mapping = build_field_mapping("B, A, C").unwrap();
        let names: Vec<&str> = mapping.iter().map(|f| f.original_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(mapping[0].sanitized_name, "field_b_0");
        assert_eq!(mapping[2].sanitized_name, "field_c_2");
    }
}
