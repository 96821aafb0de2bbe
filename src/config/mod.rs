// src/config/mod.rs
// Loads the routing table and known entities from a single TOML or JSON
// file. Discovery/merging of hierarchical context is upstream; whatever
// arrives here is already fully resolved.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::StaticEntityStore;
use crate::error::{Error, Result};
use crate::routing::types::RoutingConfig;

/// On-disk shape: the routing table plus the entity lists the classifier
/// scans for mentions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingFile {
    pub routing: RoutingConfig,
    #[serde(default)]
    pub entities: StaticEntityStore,
}

/// Load a routing file, dispatching on extension.
pub fn load(path: &Path) -> Result<RoutingFile> {
    let raw = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let file: RoutingFile = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&raw).map_err(|e| Error::ParseConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        Some("json") => serde_json::from_str(&raw).map_err(|e| Error::ParseConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        _ => {
            return Err(Error::UnknownConfigFormat {
                path: path.to_path_buf(),
            });
        }
    };

    info!(
        "loaded routing config from {} ({} project(s), {} people, {} companies)",
        path.display(),
        file.routing.projects.len(),
        file.entities.people.len(),
        file.entities.companies.len()
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::types::{ConflictResolution, DirectoryStructure, FilenameComponent};
    use std::io::Write;

    const SAMPLE_TOML: &str = r#"
[routing]
conflict_resolution = "primary"

[routing.default]
path = "~/notes/inbox"
structure = "month"
filename_options = ["date", "subject"]

[[routing.projects]]
project_id = "atlas"

[routing.projects.destination]
path = "~/notes/atlas"
structure = "day"
filename_options = ["time", "subject"]
create_directories = true

[routing.projects.classification]
context_type = "work"
explicit_phrases = ["atlas migration"]
topics = ["postgres", "schema"]
associated_people = ["sam"]

[[entities.people]]
id = "sam"
name = "Sam Iyer"
sounds_like = ["sam ayer"]

[[entities.companies]]
id = "globex"
name = "Globex"
full_name = "Global Export Partners"
"#;

    fn write_temp(name: &str, contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut file = fs::File::create(dir.path().join(name)).expect("create");
        file.write_all(contents.as_bytes()).expect("write");
        dir
    }

    #[test]
    fn test_load_toml_round_trip() {
        let dir = write_temp("routes.toml", SAMPLE_TOML);
        let file = load(&dir.path().join("routes.toml")).expect("load");

        assert_eq!(file.routing.conflict_resolution, ConflictResolution::Primary);
        assert_eq!(file.routing.default.structure, DirectoryStructure::Month);
        assert_eq!(file.routing.projects.len(), 1);

        let atlas = &file.routing.projects[0];
        assert_eq!(atlas.project_id, "atlas");
        assert!(atlas.is_active());
        assert_eq!(atlas.destination.structure, DirectoryStructure::Day);
        assert_eq!(
            atlas.destination.filename_options,
            vec![FilenameComponent::Time, FilenameComponent::Subject]
        );
        assert_eq!(atlas.destination.create_directories, Some(true));
        assert_eq!(
            atlas.classification.explicit_phrases,
            Some(vec!["atlas migration".to_string()])
        );

        assert_eq!(file.entities.people.len(), 1);
        assert_eq!(file.entities.companies.len(), 1);
        assert_eq!(
            file.entities.companies[0].full_name.as_deref(),
            Some("Global Export Partners")
        );
    }

    #[test]
    fn test_load_json() {
        let json = r#"{
            "routing": {
                "default": {
                    "path": "/tmp/inbox",
                    "structure": "none",
                    "filename_options": ["date"]
                },
                "projects": [],
                "conflict_resolution": "ask"
            }
        }"#;
        let dir = write_temp("routes.json", json);
        let file = load(&dir.path().join("routes.json")).expect("load");

        assert!(file.routing.projects.is_empty());
        assert_eq!(file.routing.conflict_resolution, ConflictResolution::Ask);
        // Absent entity tables mean empty collections, not errors.
        assert!(file.entities.people.is_empty());
        assert!(file.entities.companies.is_empty());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = write_temp("routes.yaml", "routing: {}");
        let err = load(&dir.path().join("routes.yaml")).unwrap_err();
        assert!(matches!(err, Error::UnknownConfigFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = load(Path::new("/nonexistent/routes.toml")).unwrap_err();
        assert!(matches!(err, Error::ReadConfig { .. }));
    }
}
