//! Syscall 이벤트 드롭 정책 — 드롭 감지 시 수행할 액션 집합 구성

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 커널 이벤트 드롭 감지 시 수행하는 액션
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropAction {
    /// 아무것도 하지 않음
    Ignore,
    /// 드롭 내역을 로그로 남김
    Log,
    /// 드롭 내역을 알림으로 발행
    Alert,
    /// 프로세스 종료
    Exit,
}

impl fmt::Display for DropAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => write!(f, "ignore"),
            Self::Log => write!(f, "log"),
            Self::Alert => write!(f, "alert"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// 액션 토큰 시퀀스에서 드롭 액션 집합을 구성합니다.
///
/// `log`/`alert`는 이미 추가된 `ignore`와 공존할 수 없습니다. `exit`에는
/// 이 배타 규칙이 적용되지 않습니다 — 드롭 시 종료하는 에이전트에서
/// `ignore`는 무해합니다. 빈 입력은 `{ignore}`로 기본 설정됩니다.
pub fn build_drop_actions(tokens: &[String]) -> Result<BTreeSet<DropAction>, ConfigError> {
    let mut actions = BTreeSet::new();

    for token in tokens {
        match token.as_str() {
            "ignore" => {
                actions.insert(DropAction::Ignore);
            }
            "log" => {
                if actions.contains(&DropAction::Ignore) {
                    return Err(ConfigError::IncompatibleDropAction {
                        action: token.clone(),
                    });
                }
                actions.insert(DropAction::Log);
            }
            "alert" => {
                if actions.contains(&DropAction::Ignore) {
                    return Err(ConfigError::IncompatibleDropAction {
                        action: token.clone(),
                    });
                }
                actions.insert(DropAction::Alert);
            }
            "exit" => {
                actions.insert(DropAction::Exit);
            }
            _ => {
                return Err(ConfigError::UnknownDropAction {
                    action: token.clone(),
                });
            }
        }
    }

    if actions.is_empty() {
        actions.insert(DropAction::Ignore);
    }

    Ok(actions)
}
