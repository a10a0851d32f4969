//! 출력 싱크 구성 — 활성화된 출력 블록을 고정 순서의 목록으로 조립
//!
//! 여섯 가지 싱크(`file`, `stdout`, `syslog`, `program`, `http`, `grpc`)를
//! 항상 같은 순서로 검사하므로, 어떤 부분집합이 활성화되든 결과 목록의
//! 상대 순서는 동일합니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ConfigError;

/// `http_output.user_agent`가 생략됐을 때 쓰는 제품 식별자
pub const DEFAULT_HTTP_USER_AGENT: &str = "kestrelsec/kestrel";

/// 활성화된 출력 싱크 하나의 구성
///
/// `name`은 고정 싱크 식별자 중 하나이고, `options`는 해당 싱크가
/// 요구하는 키만 담습니다. 조립 이후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 싱크 식별자 (`file`, `stdout`, `syslog`, `program`, `http`, `grpc`)
    pub name: String,
    /// 싱크별 옵션
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl OutputConfig {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            options: BTreeMap::new(),
        }
    }

    fn with_option(mut self, key: &str, value: String) -> Self {
        self.options.insert(key.to_owned(), value);
        self
    }
}

/// 문서에서 활성화된 출력 싱크 목록을 조립합니다.
///
/// 빈 결과의 처리([`ConfigError::NoOutputsConfigured`]로의 승격)는
/// 호출자인 해석기가 담당합니다.
pub fn assemble_outputs(doc: &Document) -> Result<Vec<OutputConfig>, ConfigError> {
    let mut outputs = Vec::new();

    if doc.get_scalar("file_output.enabled", false)? {
        let filename: String = doc.get_scalar("file_output.filename", String::new())?;
        if filename.is_empty() {
            return Err(ConfigError::MissingField {
                sink: "file",
                field: "filename",
            });
        }
        let keep_alive: String = doc.get_scalar("file_output.keep_alive", String::new())?;
        outputs.push(
            OutputConfig::new("file")
                .with_option("filename", filename)
                .with_option("keep_alive", keep_alive),
        );
    }

    if doc.get_scalar("stdout_output.enabled", false)? {
        outputs.push(OutputConfig::new("stdout"));
    }

    if doc.get_scalar("syslog_output.enabled", false)? {
        outputs.push(OutputConfig::new("syslog"));
    }

    if doc.get_scalar("program_output.enabled", false)? {
        let program: String = doc.get_scalar("program_output.program", String::new())?;
        if program.is_empty() {
            return Err(ConfigError::MissingField {
                sink: "program",
                field: "program",
            });
        }
        let keep_alive: String = doc.get_scalar("program_output.keep_alive", String::new())?;
        outputs.push(
            OutputConfig::new("program")
                .with_option("program", program)
                .with_option("keep_alive", keep_alive),
        );
    }

    if doc.get_scalar("http_output.enabled", false)? {
        let url: String = doc.get_scalar("http_output.url", String::new())?;
        if url.is_empty() {
            return Err(ConfigError::MissingField {
                sink: "http",
                field: "url",
            });
        }
        let user_agent: String =
            doc.get_scalar("http_output.user_agent", DEFAULT_HTTP_USER_AGENT.to_owned())?;
        outputs.push(
            OutputConfig::new("http")
                .with_option("url", url)
                .with_option("user_agent", user_agent),
        );
    }

    // grpc 출력은 gRPC 서버 자체가 활성화된 경우에만 켜진다.
    // 연결 파라미터는 grpc.* 최상위 스칼라로 별도 해석되며 옵션에 담지 않는다.
    if doc.get_scalar("grpc_output.enabled", true)? && doc.get_scalar("grpc.enabled", false)? {
        outputs.push(OutputConfig::new("grpc"));
    }

    Ok(outputs)
}
