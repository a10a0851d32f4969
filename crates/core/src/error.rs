//! 에러 타입 — 설정 해석 도메인 에러 정의
//!
//! 두 가지 심각도를 구분합니다:
//! - [`ConfigError`]: 복구 가능한 설정 오류. 호출자가 입력을 고쳐 다시
//!   해석을 시도할 수 있습니다.
//! - [`RulesError`]: 규칙 디렉토리 순회 중의 I/O 오류. 규칙 파일을 열거할 수
//!   없으면 의미 있는 동작이 불가능하므로 복구 불가로 취급합니다.
//!
//! 라이브러리 내부에서는 프로세스를 종료하지 않습니다. 종료 여부와 종료
//! 코드는 최상위 호출자(데몬)가 [`KestrelError::is_fatal`]로 판단합니다.

use std::path::PathBuf;

/// Kestrel 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum KestrelError {
    /// 설정 해석 에러 (복구 가능)
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 규칙 파일 순회 에러 (복구 불가)
    #[error("rules error: {0}")]
    Rules(#[from] RulesError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl KestrelError {
    /// 복구 불가능한 에러인지 반환합니다.
    ///
    /// `true`이면 호출자는 재시도 없이 즉시 프로세스를 종료해야 합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Rules(_))
    }
}

/// 설정 해석 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 문서 읽기/파싱 실패
    #[error("cannot read config file ({path}): {reason}")]
    LoadFailure { path: String, reason: String },

    /// 잘못된 커맨드라인 오버라이드 토큰
    #[error(
        "cannot parse config option \"{token}\": must be of the form key=val or key.subkey=val"
    )]
    MalformedOverride { token: String },

    /// 문서 노드를 요청한 타입으로 변환할 수 없음
    #[error("config key \"{key}\": {reason}")]
    TypeMismatch { key: String, reason: String },

    /// 활성화된 출력 블록에 필수 필드 누락
    #[error("{sink} output enabled but no {field} in configuration block")]
    MissingField {
        sink: &'static str,
        field: &'static str,
    },

    /// 활성화된 출력이 하나도 없음
    #[error("no outputs configured, please configure at least one output")]
    NoOutputsConfigured,

    /// 알 수 없는 우선순위 문자열
    #[error(
        "unknown priority \"{value}\": must be one of emergency, alert, critical, error, \
         warning, notice, informational, debug"
    )]
    UnknownPriority { value: String },

    /// 알 수 없는 syscall 드롭 액션
    #[error(
        "unknown syscall event drop action \"{action}\": available actions are \
         \"ignore\", \"log\", \"alert\", and \"exit\""
    )]
    UnknownDropAction { action: String },

    /// `ignore`와 함께 선언할 수 없는 드롭 액션
    #[error("syscall event drop action \"{action}\" does not make sense with the \"ignore\" action")]
    IncompatibleDropAction { action: String },

    /// 허용 범위를 벗어난 숫자 필드
    #[error("config value \"{field}\" out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },

    /// 플러그인 선언 시퀀스 파싱 실패
    #[error("could not load plugins config: {reason}")]
    PluginParse { reason: String },
}

/// 규칙 파일 순회 에러
///
/// 존재가 확인된 경로에 대한 stat/readdir 실패입니다. 이 에러는
/// [`KestrelError::is_fatal`]에서 복구 불가로 분류됩니다.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// 디렉토리 내용을 읽을 수 없음
    #[error("could not read contents of directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 디렉토리 항목 정보를 조회할 수 없음
    #[error("could not get info on rules file {}: {source}", path.display())]
    EntryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
