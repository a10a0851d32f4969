//! 플러그인 선택 — 선언된 플러그인 구성을 허용 목록으로 필터링
//!
//! 이 모듈은 플러그인 생명주기를 관리하지 않습니다. 문서의 `plugins`
//! 시퀀스에서 통째로 역직렬화된 선언을 이름 기준으로 유지/폐기만 합니다.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// 플러그인 선언 하나
///
/// 문서 계층에서 통째로 역직렬화되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// 플러그인 고유 이름
    pub name: String,
    /// 공유 라이브러리 경로
    #[serde(default)]
    pub library_path: String,
    /// 플러그인 초기화 설정 (플러그인별 자유 형식)
    #[serde(default)]
    pub init_config: Option<String>,
    /// 이벤트 소스 열기 파라미터
    #[serde(default)]
    pub open_params: Option<String>,
}

/// 선언된 플러그인을 허용 목록으로 필터링합니다.
///
/// `allow_list`가 `None`이면 (문서에 `load_plugins` 키가 선언되지 않은
/// 경우) 전부 유지합니다. `Some`이면 — 빈 집합이어도 — 목록에 있는
/// 이름만 유지합니다. 선언 순서는 항상 보존됩니다.
pub fn select_plugins(
    declared: Vec<PluginConfig>,
    allow_list: Option<&BTreeSet<String>>,
) -> Vec<PluginConfig> {
    let Some(allowed) = allow_list else {
        return declared;
    };

    declared
        .into_iter()
        .filter(|plugin| {
            let keep = allowed.contains(&plugin.name);
            if !keep {
                tracing::debug!(
                    plugin = %plugin.name,
                    "plugin not in load_plugins allow-list, skipping"
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(name: &str) -> PluginConfig {
        PluginConfig {
            name: name.to_owned(),
            library_path: format!("/usr/lib/kestrel/lib{name}.so"),
            init_config: None,
            open_params: None,
        }
    }

    #[test]
    fn absent_allow_list_keeps_everything() {
        let declared = vec![plugin("p1"), plugin("p2"), plugin("p3")];
        let selected = select_plugins(declared.clone(), None);
        assert_eq!(selected, declared);
    }

    #[test]
    fn allow_list_filters_by_name_preserving_order() {
        let declared = vec![plugin("p1"), plugin("p2"), plugin("p3")];
        let allow = BTreeSet::from(["p3".to_owned(), "p1".to_owned()]);
        let selected = select_plugins(declared, Some(&allow));
        let names: Vec<&str> = selected.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p1", "p3"]);
    }

    #[test]
    fn single_member_allow_list() {
        let declared = vec![plugin("p1"), plugin("p2"), plugin("p3")];
        let allow = BTreeSet::from(["p2".to_owned()]);
        let selected = select_plugins(declared, Some(&allow));
        let names: Vec<&str> = selected.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p2"]);
    }

    #[test]
    fn empty_allow_list_discards_everything() {
        let declared = vec![plugin("p1"), plugin("p2")];
        let allow = BTreeSet::new();
        let selected = select_plugins(declared, Some(&allow));
        assert!(selected.is_empty());
    }

    #[test]
    fn plugin_config_deserializes_from_yaml() {
        let yaml = r#"
name: k8saudit
library_path: /usr/lib/kestrel/libk8saudit.so
init_config: "maxEventSize: 262144"
open_params: "http://:9765/k8s-audit"
"#;
        let plugin: PluginConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(plugin.name, "k8saudit");
        assert_eq!(plugin.library_path, "/usr/lib/kestrel/libk8saudit.so");
        assert_eq!(plugin.init_config.as_deref(), Some("maxEventSize: 262144"));
        assert_eq!(plugin.open_params.as_deref(), Some("http://:9765/k8s-audit"));
    }

    #[test]
    fn plugin_config_optional_fields_default() {
        let plugin: PluginConfig = serde_yaml::from_str("name: bare\n").unwrap();
        assert_eq!(plugin.name, "bare");
        assert!(plugin.library_path.is_empty());
        assert!(plugin.init_config.is_none());
        assert!(plugin.open_params.is_none());
    }
}
