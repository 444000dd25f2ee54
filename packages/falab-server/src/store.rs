use std::{fs, path::PathBuf};

use falab_lib::{automaton::Fa, error::FaError};
use serde::Deserialize;

/// One persisted automaton record; `tuple` carries the automaton itself.
#[derive(Debug, Clone, Deserialize)]
pub struct FaRecord {
    #[allow(dead_code)]
    pub id: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub description: Option<String>,
    pub tuple: Fa,
}

/// Read-only key to record lookup. A missing id is "no FA found", not an
/// internal failure.
pub trait RecordStore {
    fn get_by_id(&self, id: &str) -> Result<Fa, FaError>;
}

/// Records stored as `{id}.json` files in one directory. Each file holds a
/// record object or the one-element array shape of the upstream store.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStore { dir: dir.into() }
    }
}

impl RecordStore for DirStore {
    fn get_by_id(&self, id: &str) -> Result<Fa, FaError> {
        check_id(id)?;

        let path = self.dir.join(format!("{}.json", id));
        if !path.exists() {
            return Err(FaError::NotFound(format!("no FA found for id {}", id)));
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| FaError::OperationFailed(format!("reading record {}: {}", id, e)))?;

        let record = match serde_json::from_str::<Vec<FaRecord>>(&content) {
            Ok(records) => match records.into_iter().next() {
                Some(record) => record,
                None => return Err(FaError::NotFound(format!("no FA found for id {}", id))),
            },
            Err(_) => serde_json::from_str::<FaRecord>(&content)
                .map_err(|e| FaError::InvalidAutomaton(format!("record {}: {}", id, e)))?,
        };

        let fa = record.tuple;
        fa.validate()?;
        Ok(fa)
    }
}

/// Ids are path components; restrict them to a safe character set.
fn check_id(id: &str) -> Result<(), FaError> {
    let safe = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if safe {
        Ok(())
    } else {
        Err(FaError::NotFound(format!("no FA found for id {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(id: &str, content: &str) -> DirStore {
        let dir = std::env::temp_dir().join(format!("falab-store-{}", id));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.json", id)), content).unwrap();
        DirStore::new(dir)
    }

    #[test]
    fn loads_the_tuple_from_a_record_array() {
        let content = r#"[{
            "id": "abc",
            "description": null,
            "tuple": {
                "alphabet": ["a"],
                "states": ["q0"],
                "initial": "q0",
                "acceptance": ["q0"],
                "transitions": [["q0"]]
            }
        }]"#;

        let store = store_with("abc", content);
        let fa = store.get_by_id("abc").unwrap();
        assert_eq!(fa.states, vec!["q0"]);
        assert!(fa.run("aaa").accepted);
    }

    #[test]
    fn missing_id_is_not_found() {
        let store = DirStore::new(std::env::temp_dir().join("falab-store-missing"));
        assert!(matches!(
            store.get_by_id("nope"),
            Err(FaError::NotFound(_))
        ));
    }

    #[test]
    fn empty_record_array_is_not_found() {
        let store = store_with("empty0", "[]");
        assert!(matches!(
            store.get_by_id("empty0"),
            Err(FaError::NotFound(_))
        ));
    }

    #[test]
    fn path_traversal_is_rejected() {
        let store = DirStore::new(std::env::temp_dir());
        assert!(matches!(
            store.get_by_id("../etc/passwd"),
            Err(FaError::NotFound(_))
        ));
    }
}
