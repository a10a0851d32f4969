//! 설정 문서 접근자 — YAML 트리에 대한 점 표기 경로 조회/수정
//!
//! YAML 파싱 자체는 `serde_yaml`에 위임하고, 이 모듈은 파싱된 트리에 대한
//! `get_scalar` / `get_sequence` / `is_defined` / `set_scalar` 접근만
//! 제공합니다.
//!
//! 커맨드라인 오버라이드([`crate::overrides`])는 항상 문자열 스칼라로
//! 기록되므로, 타입 조회 시 문자열 노드를 대상 타입으로 강제 변환합니다.
//! 예: `set_scalar("webserver.listen_port", "9999")` 이후
//! `get_scalar::<u32>("webserver.listen_port", 8765)`는 `9999`를 반환합니다.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// 점 표기 경로로 조회 가능한 설정 문서
///
/// 해석이 진행되는 동안 단독 소유되는 빌더 값입니다. 전역 인스턴스는
/// 존재하지 않습니다.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// 빈 문서를 생성합니다.
    pub fn new() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }

    /// 파일에서 문서를 로드합니다.
    ///
    /// 읽기 또는 파싱 실패는 원인을 담은 [`ConfigError::LoadFailure`]입니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigError::LoadFailure {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
        Self::parse_named(&content, &path.display().to_string())
    }

    /// YAML 문자열에서 문서를 파싱합니다.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_named(content, "<inline>")
    }

    fn parse_named(content: &str, source: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::LoadFailure {
            path: source.to_owned(),
            reason: e.to_string(),
        })?;
        // 빈 문서는 Null로 파싱됨 — 빈 매핑으로 취급
        let root = match root {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };
        Ok(Self { root })
    }

    /// 경로에 노드가 선언되어 있는지 반환합니다.
    ///
    /// 명시적 `null` 값도 선언된 것으로 간주합니다.
    pub fn is_defined(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// 스칼라 값을 조회합니다.
    ///
    /// 경로에 노드가 없으면 `default`를 반환합니다. 노드가 있으나 대상
    /// 타입으로 변환할 수 없으면 [`ConfigError::TypeMismatch`]입니다.
    pub fn get_scalar<T: Scalar>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.lookup(key) {
            None | Some(Value::Null) => Ok(default),
            Some(node) => T::from_value(node).ok_or_else(|| ConfigError::TypeMismatch {
                key: key.to_owned(),
                reason: format!("expected {}", T::EXPECTED),
            }),
        }
    }

    /// 문자열 시퀀스를 조회합니다.
    ///
    /// 경로에 노드가 없으면 빈 벡터를 반환합니다. 시퀀스가 아닌 스칼라
    /// 노드는 원소 하나짜리 시퀀스로 취급합니다 (YAML 단축 표기).
    pub fn get_string_sequence(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        let node = match self.lookup(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(node) => node,
        };
        let items: Vec<&Value> = match node {
            Value::Sequence(seq) => seq.iter().collect(),
            other => vec![other],
        };
        items
            .into_iter()
            .map(|item| {
                String::from_value(item).ok_or_else(|| ConfigError::TypeMismatch {
                    key: key.to_owned(),
                    reason: "expected a sequence of strings".to_owned(),
                })
            })
            .collect()
    }

    /// 구조화된 시퀀스를 조회합니다.
    ///
    /// 경로에 노드가 없으면 빈 벡터를 반환합니다. 원소 디코드 실패는
    /// serde 에러 메시지를 담은 [`ConfigError::TypeMismatch`]입니다.
    pub fn get_sequence<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, ConfigError> {
        let node = match self.lookup(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(node) => node,
        };
        let items: Vec<Value> = match node {
            Value::Sequence(seq) => seq.clone(),
            other => vec![other.clone()],
        };
        items
            .into_iter()
            .map(|item| {
                serde_yaml::from_value(item).map_err(|e| ConfigError::TypeMismatch {
                    key: key.to_owned(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// 경로에 문자열 스칼라를 기록합니다.
    ///
    /// 중간 매핑이 없으면 생성하고, 매핑이 아닌 중간 노드는 매핑으로
    /// 교체합니다 (오버라이드 우선).
    pub fn set_scalar(&mut self, key: &str, value: &str) {
        let mut node = &mut self.root;
        let mut segments = key.split('.').peekable();
        while let Some(segment) = segments.next() {
            if !node.is_mapping() {
                *node = Value::Mapping(Mapping::new());
            }
            let Some(mapping) = node.as_mapping_mut() else {
                return;
            };
            let entry_key = Value::String(segment.to_owned());
            if segments.peek().is_none() {
                mapping.insert(entry_key, Value::String(value.to_owned()));
                return;
            }
            node = mapping
                .entry(entry_key)
                .or_insert_with(|| Value::Mapping(Mapping::new()));
        }
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut node = &self.root;
        for segment in key.split('.') {
            node = node.as_mapping()?.get(Value::String(segment.to_owned()))?;
        }
        Some(node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Scalar ──────────────────────────────────────────────────────────

/// 문서 스칼라 노드에서 변환 가능한 타입
///
/// 네이티브 YAML 타입 외에 문자열 노드로부터의 파싱도 허용하여,
/// 오버라이드로 기록된 문자열이 이후의 타입 조회에서 강제 변환되게 합니다.
pub trait Scalar: Sized {
    /// 타입 불일치 에러 메시지에 쓰이는 타입 이름
    const EXPECTED: &'static str;

    /// 노드를 이 타입으로 변환합니다. 불가능하면 `None`.
    fn from_value(value: &Value) -> Option<Self>;
}

impl Scalar for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Scalar for u16 {
    const EXPECTED: &'static str = "16-bit unsigned integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|n| Self::try_from(n).ok()),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Scalar for u32 {
    const EXPECTED: &'static str = "32-bit unsigned integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|n| Self::try_from(n).ok()),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Scalar for u64 {
    const EXPECTED: &'static str = "64-bit unsigned integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Scalar for f64 {
    const EXPECTED: &'static str = "floating point number";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Scalar for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
