//! kestrel-core — 호스트 런타임 보안 에이전트의 설정 해석 코어
//!
//! 디스크의 선언적 설정 문서(`kestrel.yaml`)와 커맨드라인 오버라이드를
//! 검증된 런타임 설정 [`KestrelConfig`]로 변환합니다. 규칙 엔진, 출력
//! 디스패처, gRPC 서버, 플러그인 로더는 모두 이 결과를 읽기 전용으로
//! 소비합니다.
//!
//! 이 크레이트는 해석과 검증만 담당합니다 — 출력 실행, 규칙 해석,
//! 플러그인 생명주기, 전역 로거 설정은 상위 계층의 몫입니다.

pub mod config;
pub mod document;
pub mod drops;
pub mod error;
pub mod outputs;
pub mod overrides;
pub mod plugins;
pub mod rules;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, KestrelError, RulesError};

// 설정
pub use config::{
    GrpcConfig, KestrelConfig, MetadataDownloadConfig, Priority, SyscallDropConfig,
    WebserverConfig,
};

// 문서 접근자
pub use document::Document;

// 구성 요소 타입
pub use drops::DropAction;
pub use outputs::OutputConfig;
pub use plugins::PluginConfig;
