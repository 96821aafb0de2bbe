// src/note.rs
// Persists a routed transcript as a markdown note with the routing metadata
// in its frontmatter. The classifier and router never touch the filesystem;
// this is the caller-side glue the CLI uses when asked to write.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::routing::types::{RouteDecision, RoutingContext};

/// Render the note body: frontmatter followed by the transcript.
pub fn render_note(decision: &RouteDecision, context: &RoutingContext) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("source: {}\n", context.source_file));
    out.push_str(&format!(
        "audio_date: {}\n",
        context.audio_date.to_rfc3339()
    ));
    out.push_str(&format!(
        "routed_to: {}\n",
        decision.project_id.as_deref().unwrap_or("default")
    ));
    out.push_str(&format!("confidence: {:.2}\n", decision.confidence));
    if !decision.reasoning.is_empty() {
        out.push_str(&format!("reasoning: {}\n", decision.reasoning));
    }
    if !decision.signals.is_empty() {
        out.push_str("signals:\n");
        for signal in &decision.signals {
            out.push_str(&format!(
                "  - {}: {} ({:.1})\n",
                signal.kind, signal.value, signal.weight
            ));
        }
    }
    if let Some(tags) = decision.auto_tags.as_ref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("tags: [{}]\n", tags.join(", ")));
    }
    if let Some(hash) = &context.hash {
        out.push_str(&format!("hash: {hash}\n"));
    }
    out.push_str("---\n\n");
    out.push_str(context.transcript_text.trim());
    out.push('\n');
    out
}

/// Write the note at the routed path, creating parent directories only when
/// the destination opted in.
pub fn write_note(
    decision: &RouteDecision,
    context: &RoutingContext,
    path: &Path,
) -> Result<PathBuf> {
    if decision.destination.create_directories.unwrap_or(false) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::WriteNote {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, render_note(decision, context)).map_err(|source| Error::WriteNote {
        path: path.to_path_buf(),
        source,
    })?;

    info!("note written to {}", path.display());
    Ok(path.to_path_buf())
}
