// src/routing/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One piece of textual evidence that a transcript belongs to a route.
/// Produced fresh per classification call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSignal {
    pub kind: SignalKind,
    pub value: String,
    /// Base strength of this evidence kind, in [0, 1].
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    ExplicitPhrase,
    AssociatedPerson,
    AssociatedCompany,
    Topic,
    ContextType,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::ExplicitPhrase => "explicit_phrase",
            SignalKind::AssociatedPerson => "associated_person",
            SignalKind::AssociatedCompany => "associated_company",
            SignalKind::Topic => "topic",
            SignalKind::ContextType => "context_type",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scored candidate destination for a transcript. `confidence` stays in
/// [0, 0.99]; 1.0 is reserved for the pure default-route fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub project_id: String,
    pub confidence: f64,
    pub signals: Vec<ClassificationSignal>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Work,
    Personal,
    Mixed,
}

impl ContextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Work => "work",
            ContextType::Personal => "personal",
            ContextType::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for ContextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContextType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(ContextType::Work),
            "personal" => Ok(ContextType::Personal),
            "mixed" => Ok(ContextType::Mixed),
            _ => Err(format!("Unknown context type: {s}")),
        }
    }
}

/// Matching rules for one route. Absent collections mean "no rule of that
/// kind", not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectClassification {
    pub context_type: ContextType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_people: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_companies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_phrases: Option<Vec<String>>,
}

/// Directory-nesting policy controlling where audio-date components land in
/// the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryStructure {
    None,
    Year,
    Month,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameComponent {
    Date,
    Time,
    Subject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDestination {
    /// Base directory; a leading "~" expands to the home directory.
    pub path: String,
    pub structure: DirectoryStructure,
    pub filename_options: Vec<FilenameComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_directories: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRoute {
    pub project_id: String,
    pub destination: RouteDestination,
    pub classification: ProjectClassification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Defaults to true; inactive routes are invisible to classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_tags: Option<Vec<String>>,
}

impl ProjectRoute {
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResolution {
    Ask,
    Primary,
    All,
}

impl Default for ConflictResolution {
    fn default() -> Self {
        ConflictResolution::Ask
    }
}

/// Full routing table, supplied once per routing session and immutable
/// during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub default: RouteDestination,
    #[serde(default)]
    pub projects: Vec<ProjectRoute>,
    #[serde(default)]
    pub conflict_resolution: ConflictResolution,
    /// Carried for callers that rank context types; not consulted by the
    /// core algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_order: Option<Vec<ContextType>>,
}

/// Winning decision. `project_id == None` means the default-route fallback,
/// whose confidence is the 1.0 sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDecision {
    pub project_id: Option<String>,
    pub destination: RouteDestination,
    pub confidence: f64,
    pub signals: Vec<ClassificationSignal>,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_matches: Option<Vec<ClassificationResult>>,
}

/// Everything the classifier needs to know about one transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingContext {
    pub transcript_text: String,
    pub audio_date: DateTime<Utc>,
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Precomputed mention hints; when present they bypass the classifier's
    /// own text scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_people: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_companies: Option<Vec<String>>,
}
