// src/entity/mod.rs
// People and companies the classifier can recognize in transcript text,
// plus the read-only lookup capability it scans against.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Phonetic variants that catch transcription mishearings of the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sounds_like: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    /// Legal or long-form name, matched in addition to the short name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sounds_like: Option<Vec<String>>,
}

/// Read-only access to the entities the caller has loaded.
///
/// Hierarchical discovery and merging happen upstream; by the time the
/// classifier sees this, every record is fully resolved. A lookup miss is
/// "not found", never an error.
pub trait EntityLookup {
    fn person(&self, id: &str) -> Option<&Person>;
    fn people(&self) -> &[Person];
    fn company(&self, id: &str) -> Option<&Company>;
    fn companies(&self) -> &[Company];
}

/// Vec-backed store for config-loaded entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticEntityStore {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub companies: Vec<Company>,
}

impl StaticEntityStore {
    pub fn new(people: Vec<Person>, companies: Vec<Company>) -> Self {
        Self { people, companies }
    }
}

impl EntityLookup for StaticEntityStore {
    fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    fn people(&self) -> &[Person] {
        &self.people
    }

    fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    fn companies(&self) -> &[Company] {
        &self.companies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let store = StaticEntityStore::new(
            vec![Person {
                id: "sam".to_string(),
                name: "Sam Iyer".to_string(),
                sounds_like: None,
            }],
            vec![Company {
                id: "globex".to_string(),
                name: "Globex".to_string(),
                full_name: Some("Global Export Partners".to_string()),
                sounds_like: None,
            }],
        );

        assert_eq!(store.person("sam").map(|p| p.name.as_str()), Some("Sam Iyer"));
        assert!(store.person("nobody").is_none());
        assert_eq!(store.company("globex").map(|c| c.name.as_str()), Some("Globex"));
        assert!(store.company("acme").is_none());
    }
}
