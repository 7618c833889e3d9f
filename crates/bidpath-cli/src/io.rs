//! File input and JSON output for CLI commands.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

use bidpath_core::{Draft, DraftSection};

pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// A draft file holds either `{"sections": [...]}` or a bare section array.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DraftFile {
    Sections(Vec<DraftSection>),
    Draft(Draft),
}

pub fn read_sections(path: &Path) -> anyhow::Result<Vec<DraftSection>> {
    Ok(match read_json::<DraftFile>(path)? {
        DraftFile::Sections(sections) => sections,
        DraftFile::Draft(draft) => draft.sections,
    })
}

/// Text whose pages should be estimated: joined section content when the
/// file is a draft, otherwise the file as-is.
pub fn read_page_source(path: &Path) -> anyhow::Result<String> {
    let raw = read_text(path)?;
    match serde_json::from_str::<DraftFile>(&raw) {
        Ok(DraftFile::Sections(sections)) => Ok(bidpath_core::joined_content(&sections)),
        Ok(DraftFile::Draft(draft)) => Ok(bidpath_core::joined_content(&draft.sections)),
        Err(_) => Ok(raw),
    }
}

/// Pretty JSON to `out` when given, otherwise stdout.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("encoding output JSON")?;
    match out {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn sections_from_draft_object_or_array() {
        let object = temp_file(
            r#"{"sections": [{"id": "s1", "title": "T", "content": "a b", "requirements_covered_ids": ["R1"]}]}"#,
        );
        let array = temp_file(r#"[{"id": "s1", "title": "T", "content": "a b"}]"#);
        assert_eq!(read_sections(object.path()).unwrap()[0].requirements_covered_ids, vec!["R1"]);
        assert_eq!(read_sections(array.path()).unwrap()[0].content, "a b");
    }

    #[test]
    fn page_source_joins_draft_or_passes_text() {
        let draft = temp_file(
            r#"[{"id": "a", "title": "A", "content": "one"}, {"id": "b", "title": "B", "content": "two"}]"#,
        );
        assert_eq!(read_page_source(draft.path()).unwrap(), "one\ntwo");

        let text = temp_file("plain solicitation text");
        assert_eq!(read_page_source(text.path()).unwrap(), "plain solicitation text");
    }

    #[test]
    fn bad_json_names_the_file() {
        let file = temp_file("{oops");
        let err = read_json::<serde_json::Value>(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("parsing "));
    }

    #[test]
    fn write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&serde_json::json!({"pages": 2}), Some(&path)).unwrap();
        let back: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(back["pages"], 2);
    }
}
