//! 설정 해석기 — kestrel.yaml 문서를 검증된 런타임 설정으로 변환
//!
//! [`KestrelConfig`]는 에이전트 전체(규칙 엔진, 출력 디스패처, gRPC 서버,
//! 플러그인 로더)가 소비하는 최종 설정 집합체입니다.
//!
//! # 해석 순서
//! 1. 문서 로드 ([`Document::from_file`])
//! 2. 커맨드라인 오버라이드 적용 — 이후의 모든 조회는 오버라이드된 값을 봄
//! 3. 규칙 파일 선언 전개
//! 4. 스칼라 추출 (문서화된 기본값 사용)
//! 5. 출력 싱크 조립 — 비어 있으면 실패
//! 6. 우선순위 파싱
//! 7. 드롭 정책 구성
//! 8. 범위 검증
//! 9. 플러그인 선택
//!
//! 각 단계는 다음 단계의 선행 조건이며, 첫 위반에서 즉시 실패합니다.
//! 해석은 값을 반환하는 것 외의 부수효과가 없습니다 — 로그 레벨도 결과의
//! 값일 뿐이며, 전역 로거 설정은 호출자의 몫입니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), kestrel_core::error::KestrelError> {
//! use kestrel_core::config::KestrelConfig;
//!
//! let overrides = vec!["webserver.listen_port=9999".to_owned()];
//! let config = KestrelConfig::resolve("/etc/kestrel/kestrel.yaml", &overrides).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::drops::{self, DropAction};
use crate::error::{ConfigError, KestrelError};
use crate::outputs::{self, OutputConfig};
use crate::overrides;
use crate::plugins::{self, PluginConfig};
use crate::rules;

/// Kestrel 통합 런타임 설정
///
/// 해석이 끝나면 불변 값으로 취급되며, 이후 생성되는 스레드들과 읽기
/// 전용으로 자유롭게 공유할 수 있습니다. 동일한 문서와 오버라이드로
/// 해석한 결과는 값으로 동등합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KestrelConfig {
    /// 전개된 규칙 파일 목록 (선언 순서 보존, 디렉토리 내부는 사전순)
    pub rules_files: Vec<PathBuf>,
    /// 알림을 JSON으로 직렬화할지 여부
    pub json_output: bool,
    /// JSON 알림에 output 속성 포함 여부
    pub json_include_output_property: bool,
    /// JSON 알림에 tags 속성 포함 여부
    pub json_include_tags_property: bool,
    /// 활성화된 출력 싱크 (고정 순서: file, stdout, syslog, program, http, grpc)
    pub outputs: Vec<OutputConfig>,
    /// 에이전트 자체 로그 레벨 (전역 로거 설정은 호출자 담당)
    pub log_level: String,
    /// 출력 전송 타임아웃 (ms)
    pub output_timeout: u32,
    /// 알림 토큰 버킷 충전 속도 (초당)
    pub notifications_rate: u32,
    /// 알림 토큰 버킷 최대 버스트
    pub notifications_max_burst: u32,
    /// 알림을 발행하는 최소 규칙 우선순위
    pub min_priority: Priority,
    /// 출력 버퍼링 여부
    pub buffered_outputs: bool,
    /// 타임스탬프를 ISO 8601로 표기할지 여부
    pub time_format_iso_8601: bool,
    /// 에이전트 로그를 stderr로 보낼지 여부
    pub log_stderr: bool,
    /// 에이전트 로그를 syslog로 보낼지 여부
    pub log_syslog: bool,
    /// 내장 웹서버 설정
    pub webserver: WebserverConfig,
    /// gRPC 서버 설정
    pub grpc: GrpcConfig,
    /// syscall 이벤트 드롭 정책
    pub syscall_drops: SyscallDropConfig,
    /// 이벤트 없이 허용되는 최대 연속 타임아웃 횟수
    pub syscall_timeout_max_consecutives: u32,
    /// 메타데이터 다운로드 설정
    pub metadata_download: MetadataDownloadConfig,
    /// 허용 목록 필터를 통과한 플러그인 선언 (선언 순서 보존)
    pub plugins: Vec<PluginConfig>,
}

impl KestrelConfig {
    /// 문서 파일과 커맨드라인 오버라이드에서 설정을 해석합니다.
    ///
    /// # Errors
    /// - 문서 읽기/파싱 실패, 검증 위반: [`KestrelError::Config`]
    /// - 규칙 디렉토리 순회 실패: [`KestrelError::Rules`] (복구 불가)
    pub async fn resolve(
        path: impl AsRef<Path>,
        cmdline_overrides: &[String],
    ) -> Result<Self, KestrelError> {
        let doc = Document::from_file(path).await?;
        Self::from_document(doc, cmdline_overrides)
    }

    /// 이미 로드된 문서에서 설정을 해석합니다.
    ///
    /// 문서는 해석 동안 단독 소유되는 빌더 값으로 소비됩니다.
    pub fn from_document(
        mut doc: Document,
        cmdline_overrides: &[String],
    ) -> Result<Self, KestrelError> {
        // 오버라이드는 모든 필드 추출보다 먼저 적용한다.
        overrides::apply_overrides(&mut doc, cmdline_overrides)?;

        let declared_rules = doc.get_string_sequence("rules_file")?;
        let rules_files = rules::expand_rule_files(&declared_rules)?;

        let json_output = doc.get_scalar("json_output", false)?;
        let json_include_output_property =
            doc.get_scalar("json_include_output_property", true)?;
        let json_include_tags_property = doc.get_scalar("json_include_tags_property", true)?;

        let outputs = outputs::assemble_outputs(&doc)?;
        if outputs.is_empty() {
            return Err(ConfigError::NoOutputsConfigured.into());
        }

        let log_level = doc.get_scalar("log_level", "info".to_owned())?;
        let output_timeout = doc.get_scalar("output_timeout", 2000u32)?;
        let notifications_rate = doc.get_scalar("outputs.rate", 1u32)?;
        let notifications_max_burst = doc.get_scalar("outputs.max_burst", 1000u32)?;

        let priority_value: String = doc.get_scalar("priority", "debug".to_owned())?;
        let min_priority = priority_value.parse::<Priority>()?;

        let buffered_outputs = doc.get_scalar("buffered_outputs", false)?;
        let time_format_iso_8601 = doc.get_scalar("time_format_iso_8601", false)?;
        let log_stderr = doc.get_scalar("log_stderr", false)?;
        let log_syslog = doc.get_scalar("log_syslog", true)?;

        let webserver = WebserverConfig::from_document(&doc)?;
        let grpc = GrpcConfig::from_document(&doc)?;

        let action_tokens = doc.get_string_sequence("syscall_event_drops.actions")?;
        let actions = drops::build_drop_actions(&action_tokens)?;

        let threshold = doc.get_scalar("syscall_event_drops.threshold", 0.1)?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::OutOfRange {
                field: "syscall_event_drops.threshold",
                reason: format!("{threshold} is not in [0, 1]"),
            }
            .into());
        }
        let syscall_drops = SyscallDropConfig {
            actions,
            threshold,
            rate: doc.get_scalar("syscall_event_drops.rate", 0.033_33)?,
            max_burst: doc.get_scalar("syscall_event_drops.max_burst", 1.0)?,
            simulate_drops: doc.get_scalar("syscall_event_drops.simulate_drops", false)?,
        };

        let syscall_timeout_max_consecutives =
            doc.get_scalar("syscall_event_timeouts.max_consecutives", 1000u32)?;
        if syscall_timeout_max_consecutives == 0 {
            return Err(ConfigError::OutOfRange {
                field: "syscall_event_timeouts.max_consecutives",
                reason: "must be an unsigned integer > 0".to_owned(),
            }
            .into());
        }

        let metadata_download = MetadataDownloadConfig::from_document(&doc)?;

        // load_plugins가 아예 선언되지 않은 것과 빈 목록으로 선언된 것을
        // 구분한다 — 전자는 전부 유지, 후자는 전부 폐기.
        let allow_list = doc
            .is_defined("load_plugins")
            .then(|| -> Result<BTreeSet<String>, ConfigError> {
                Ok(doc.get_string_sequence("load_plugins")?.into_iter().collect())
            })
            .transpose()?;
        let declared_plugins =
            doc.get_sequence::<PluginConfig>("plugins")
                .map_err(|e| ConfigError::PluginParse {
                    reason: e.to_string(),
                })?;
        let plugins = plugins::select_plugins(declared_plugins, allow_list.as_ref());

        Ok(Self {
            rules_files,
            json_output,
            json_include_output_property,
            json_include_tags_property,
            outputs,
            log_level,
            output_timeout,
            notifications_rate,
            notifications_max_burst,
            min_priority,
            buffered_outputs,
            time_format_iso_8601,
            log_stderr,
            log_syslog,
            webserver,
            grpc,
            syscall_drops,
            syscall_timeout_max_consecutives,
            metadata_download,
            plugins,
        })
    }
}

// ─── Priority ────────────────────────────────────────────────────────

/// 규칙 우선순위
///
/// `priority` 설정값에서 파싱되며, 이 수준 미만의 규칙은 알림을 발행하지
/// 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Informational,
    Debug,
}

impl FromStr for Priority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emergency" => Ok(Self::Emergency),
            "alert" => Ok(Self::Alert),
            "critical" => Ok(Self::Critical),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "informational" => Ok(Self::Informational),
            "debug" => Ok(Self::Debug),
            _ => Err(ConfigError::UnknownPriority {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emergency => write!(f, "emergency"),
            Self::Alert => write!(f, "alert"),
            Self::Critical => write!(f, "critical"),
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Notice => write!(f, "notice"),
            Self::Informational => write!(f, "informational"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

// ─── 섹션별 설정 ─────────────────────────────────────────────────────

/// 내장 웹서버 설정 (`webserver.*`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebserverConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 수신 포트
    pub listen_port: u16,
    /// K8s audit 이벤트 수신 엔드포인트
    pub k8s_audit_endpoint: String,
    /// 헬스체크 엔드포인트
    pub k8s_healthz_endpoint: String,
    /// TLS 사용 여부
    pub ssl_enabled: bool,
    /// TLS 인증서 경로
    pub ssl_certificate: String,
}

impl WebserverConfig {
    fn from_document(doc: &Document) -> Result<Self, ConfigError> {
        Ok(Self {
            enabled: doc.get_scalar("webserver.enabled", false)?,
            listen_port: doc.get_scalar("webserver.listen_port", 8765u16)?,
            k8s_audit_endpoint: doc
                .get_scalar("webserver.k8s_audit_endpoint", "/k8s-audit".to_owned())?,
            k8s_healthz_endpoint: doc
                .get_scalar("webserver.k8s_healthz_endpoint", "/healthz".to_owned())?,
            ssl_enabled: doc.get_scalar("webserver.ssl_enabled", false)?,
            ssl_certificate: doc.get_scalar(
                "webserver.ssl_certificate",
                "/etc/kestrel/kestrel.pem".to_owned(),
            )?,
        })
    }
}

/// gRPC 서버 설정 (`grpc.*`)
///
/// grpc 출력 싱크와 별개로, 서버 연결 파라미터는 여기에서 해석됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrpcConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 바인드 주소
    pub bind_address: String,
    /// 워커 스레드 수 (0이면 가용 병렬성으로 해석됨)
    pub threadiness: u32,
    /// 서버 개인키 경로
    pub private_key: String,
    /// 서버 인증서 체인 경로
    pub cert_chain: String,
    /// 루트 CA 인증서 경로
    pub root_certs: String,
}

impl GrpcConfig {
    fn from_document(doc: &Document) -> Result<Self, ConfigError> {
        let mut threadiness = doc.get_scalar("grpc.threadiness", 0u32)?;
        if threadiness == 0 {
            threadiness = available_parallelism();
        }
        Ok(Self {
            enabled: doc.get_scalar("grpc.enabled", false)?,
            bind_address: doc.get_scalar("grpc.bind_address", "0.0.0.0:5060".to_owned())?,
            threadiness,
            private_key: doc.get_scalar(
                "grpc.private_key",
                "/etc/kestrel/certs/server.key".to_owned(),
            )?,
            cert_chain: doc.get_scalar(
                "grpc.cert_chain",
                "/etc/kestrel/certs/server.crt".to_owned(),
            )?,
            root_certs: doc
                .get_scalar("grpc.root_certs", "/etc/kestrel/certs/ca.crt".to_owned())?,
        })
    }
}

/// syscall 이벤트 드롭 정책 (`syscall_event_drops.*`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyscallDropConfig {
    /// 드롭 감지 시 수행할 액션 집합
    pub actions: BTreeSet<DropAction>,
    /// 액션을 발동하는 드롭 비율 임계값, [0, 1]
    pub threshold: f64,
    /// 액션 토큰 버킷 충전 속도 (초당)
    pub rate: f64,
    /// 액션 토큰 버킷 최대 버스트
    pub max_burst: f64,
    /// 드롭 시뮬레이션 여부 (테스트용)
    pub simulate_drops: bool,
}

/// 메타데이터 다운로드 설정 (`metadata_download.*`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataDownloadConfig {
    /// 다운로드 최대 크기 (MB), 1024 이하
    pub max_mb: u32,
    /// 청크 간 대기 시간 (µs)
    pub chunk_wait_us: u32,
    /// 변경 감시 주기 (초), 0보다 커야 함
    pub watch_freq_sec: u32,
}

impl MetadataDownloadConfig {
    fn from_document(doc: &Document) -> Result<Self, ConfigError> {
        let max_mb = doc.get_scalar("metadata_download.max_mb", 100u32)?;
        if max_mb > 1024 {
            return Err(ConfigError::OutOfRange {
                field: "metadata_download.max_mb",
                reason: format!("{max_mb} exceeds the 1024 MB maximum"),
            });
        }
        let watch_freq_sec = doc.get_scalar("metadata_download.watch_freq_sec", 1u32)?;
        if watch_freq_sec == 0 {
            return Err(ConfigError::OutOfRange {
                field: "metadata_download.watch_freq_sec",
                reason: "must be an unsigned integer > 0".to_owned(),
            });
        }
        Ok(Self {
            max_mb,
            chunk_wait_us: doc.get_scalar("metadata_download.chunk_wait_us", 1000u32)?,
            watch_freq_sec,
        })
    }
}

fn available_parallelism() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

// ─── Tests ───────────────────────────────────────────────────────────
