use std::fs;
use std::path::Path;

use engine_logging::{engine_error, engine_info, engine_warn};
use evidence_core::{CaseInfo, HaloSelection, WorkspaceContext};
use evidence_engine::AtomicFileWriter;
use serde::{Deserialize, Serialize};

pub const WORKSPACE_FILENAME: &str = "workspace.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedCase {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
struct PersistedWorkspace {
    active_case: Option<PersistedCase>,
    permissions: Vec<String>,
    module: Option<String>,
    submodule: Option<String>,
}

/// Reads the saved workspace; anything missing or unreadable falls back to defaults.
pub(crate) fn load_workspace(state_dir: &Path) -> WorkspaceContext {
    let path = state_dir.join(WORKSPACE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return WorkspaceContext::default();
        }
        Err(err) => {
            engine_warn!("Failed to read workspace from {:?}: {}", path, err);
            return WorkspaceContext::default();
        }
    };

    let persisted: PersistedWorkspace = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            engine_warn!("Failed to parse workspace from {:?}: {}", path, err);
            return WorkspaceContext::default();
        }
    };

    engine_info!("Loaded workspace from {:?}", path);
    let mut halo = HaloSelection::default();
    if let Some(module) = persisted.module.filter(|m| !m.is_empty()) {
        halo.module = module;
    }
    if let Some(submodule) = persisted.submodule.filter(|s| !s.is_empty()) {
        halo.submodule = submodule;
    }
    WorkspaceContext {
        active_case: persisted.active_case.map(|case| CaseInfo {
            id: case.id,
            name: case.name,
        }),
        permissions: persisted.permissions,
        halo,
    }
}

pub(crate) fn save_workspace(state_dir: &Path, workspace: &WorkspaceContext) {
    let persisted = PersistedWorkspace {
        active_case: workspace.active_case.as_ref().map(|case| PersistedCase {
            id: case.id.clone(),
            name: case.name.clone(),
        }),
        permissions: workspace.permissions.clone(),
        module: Some(workspace.halo.module.clone()),
        submodule: Some(workspace.halo.submodule.clone()),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize workspace: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(state_dir);
    match writer.write(WORKSPACE_FILENAME, content.as_bytes()) {
        Ok(path) => engine_info!("Saved workspace to {:?}", path),
        Err(err) => engine_error!("Failed to write workspace to {:?}: {}", state_dir, err),
    }
}
