//! 규칙 파일 확장 — 선언된 경로를 평탄한 규칙 파일 목록으로 변환
//!
//! 존재하지 않는 선언 경로는 조용히 건너뜁니다. 디렉토리는 직계 일반
//! 파일만 사전순으로 전개하며 하위 디렉토리로 재귀하지 않습니다.
//! 결과 목록은 실제로 규칙 파일을 여는 이후 단계의 입력이 되며, 여기서
//! 열거된 파일이 그 사이에 삭제되는 경쟁은 허용합니다 — 열기 실패는
//! 이후 단계가 보고합니다.

use std::path::{Path, PathBuf};

use crate::error::RulesError;

/// 선언된 규칙 경로들을 규칙 파일 목록으로 전개합니다.
///
/// 선언 순서는 보존되고, 한 디렉토리에서 나온 파일들은 파일명 사전순으로
/// 함께 나타납니다. 존재가 확인된 디렉토리의 readdir/stat 실패는
/// [`RulesError`]이며 복구 대상이 아닙니다.
pub fn expand_rule_files(declared: &[String]) -> Result<Vec<PathBuf>, RulesError> {
    let mut rules_files = Vec::new();

    for entry in declared {
        let path = Path::new(entry);
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(_) => {
                tracing::warn!(
                    path = %path.display(),
                    "declared rules path does not exist, skipping"
                );
                continue;
            }
        };

        if metadata.is_dir() {
            expand_directory(path, &mut rules_files)?;
        } else {
            // 일반 파일로 가정하고 그대로 추가. 열 수 없는 경우는
            // 실제로 파일을 여는 이후 단계가 보고한다.
            rules_files.push(path.to_path_buf());
        }
    }

    Ok(rules_files)
}

/// 디렉토리의 직계 일반 파일을 사전순으로 `out`에 추가합니다.
fn expand_directory(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RulesError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RulesError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut dir_files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RulesError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let entry_path = entry.path();
        let metadata =
            std::fs::metadata(&entry_path).map_err(|e| RulesError::EntryUnreadable {
                path: entry_path.clone(),
                source: e,
            })?;
        if metadata.is_file() {
            dir_files.push(entry_path);
        }
    }

    dir_files.sort();
    out.extend(dir_files);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn declared(paths: &[&Path]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }

    #[test]
    fn nonexistent_path_is_skipped_silently() {
        let result = expand_rule_files(&["/nope/definitely/missing".to_owned()]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn regular_file_is_appended_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rules.yaml");
        fs::write(&file, "- rule: x\n").unwrap();

        let result = expand_rule_files(&declared(&[file.as_path()])).unwrap();
        assert_eq!(result, vec![file]);
    }

    #[test]
    fn directory_expands_sorted_without_recursion() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "").unwrap();
        fs::write(dir.path().join("a.yaml"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.yaml"), "").unwrap();

        let result = expand_rule_files(&declared(&[dir.path()])).unwrap();
        assert_eq!(
            result,
            vec![dir.path().join("a.yaml"), dir.path().join("b.yaml")]
        );
    }

    #[test]
    fn declaration_order_preserved_across_entries() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        fs::write(dir_a.path().join("z.yaml"), "").unwrap();
        fs::write(dir_b.path().join("a.yaml"), "").unwrap();
        let single = dir_b.path().join("single.yaml");
        fs::write(&single, "").unwrap();

        let result =
            expand_rule_files(&declared(&[single.as_path(), dir_a.path(), dir_b.path()]))
                .unwrap();
        assert_eq!(
            result,
            vec![
                single,
                dir_a.path().join("z.yaml"),
                dir_b.path().join("a.yaml"),
                dir_b.path().join("single.yaml"),
            ]
        );
    }

    #[test]
    fn mixed_existing_and_missing_declarations() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "").unwrap();
        fs::write(dir.path().join("a.yaml"), "").unwrap();

        let paths = vec![
            "/nope".to_owned(),
            dir.path().display().to_string(),
        ];
        let result = expand_rule_files(&paths).unwrap();
        assert_eq!(
            result,
            vec![dir.path().join("a.yaml"), dir.path().join("b.yaml")]
        );
    }

    #[test]
    fn empty_declarations_produce_empty_list() {
        assert!(expand_rule_files(&[]).unwrap().is_empty());
    }
}
