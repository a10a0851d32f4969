//! 커맨드라인 오버라이드 — `key=val` 토큰을 문서에 기록
//!
//! 오버라이드는 문서 로드 직후, 필드 추출 전에 적용됩니다. 이후의 모든
//! 타입 조회는 오버라이드된 값을 보게 됩니다.

use crate::document::Document;
use crate::error::ConfigError;

/// 오버라이드 토큰들을 문서에 순서대로 적용합니다.
///
/// 각 토큰은 첫 번째 `=`에서만 분리합니다. 왼쪽은 점 표기 경로, 오른쪽은
/// 원시 문자열 값입니다. `=`가 없는 토큰은
/// [`ConfigError::MalformedOverride`]입니다.
pub fn apply_overrides(doc: &mut Document, tokens: &[String]) -> Result<(), ConfigError> {
    for token in tokens {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedOverride {
                token: token.clone(),
            })?;
        doc.set_scalar(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_tokens_in_order() {
        let mut doc = Document::new();
        apply_overrides(
            &mut doc,
            &["log_level=debug".to_owned(), "log_level=warn".to_owned()],
        )
        .unwrap();
        assert_eq!(
            doc.get_scalar("log_level", String::new()).unwrap(),
            "warn"
        );
    }

    #[test]
    fn splits_on_first_equals_only() {
        let mut doc = Document::new();
        apply_overrides(&mut doc, &["program_output.program=tee -a /dev/null=x".to_owned()])
            .unwrap();
        assert_eq!(
            doc.get_scalar("program_output.program", String::new())
                .unwrap(),
            "tee -a /dev/null=x"
        );
    }

    #[test]
    fn nested_key_creates_path() {
        let mut doc = Document::new();
        apply_overrides(&mut doc, &["webserver.listen_port=9999".to_owned()]).unwrap();
        assert_eq!(
            doc.get_scalar("webserver.listen_port", 8765u32).unwrap(),
            9999
        );
    }

    #[test]
    fn token_without_equals_fails() {
        let mut doc = Document::new();
        let err = apply_overrides(&mut doc, &["log_level".to_owned()]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MalformedOverride { token } if token == "log_level"
        ));
    }

    #[test]
    fn empty_value_is_allowed() {
        let mut doc = Document::new();
        apply_overrides(&mut doc, &["file_output.keep_alive=".to_owned()]).unwrap();
        assert_eq!(
            doc.get_scalar("file_output.keep_alive", "x".to_owned())
                .unwrap(),
            ""
        );
    }
}
