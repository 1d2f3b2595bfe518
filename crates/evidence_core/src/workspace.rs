//! Case and halo selection shared by every dashboard module.
//!
//! One store holds both; the shell loads it through
//! [`Msg::WorkspaceRestored`](crate::Msg::WorkspaceRestored) and saves it
//! whenever `update` emits [`Effect::PersistWorkspace`](crate::Effect::PersistWorkspace).

pub const DEFAULT_MODULE: &str = "graph";
pub const DEFAULT_SUBMODULE: &str = "vector";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseInfo {
    pub id: String,
    pub name: Option<String>,
}

/// Active module in the halo selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaloSelection {
    pub module: String,
    pub submodule: String,
}

impl Default for HaloSelection {
    fn default() -> Self {
        Self {
            module: DEFAULT_MODULE.to_string(),
            submodule: DEFAULT_SUBMODULE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkspaceContext {
    pub active_case: Option<CaseInfo>,
    pub permissions: Vec<String>,
    pub halo: HaloSelection,
}

impl WorkspaceContext {
    pub(crate) fn select_case(&mut self, id: Option<String>) {
        self.active_case = id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(|id| CaseInfo { id, name: None });
    }

    pub(crate) fn set_permissions(&mut self, permissions: Vec<String>) {
        let mut cleaned: Vec<String> = Vec::with_capacity(permissions.len());
        for permission in permissions {
            let permission = permission.trim();
            if !permission.is_empty() && !cleaned.iter().any(|p| p == permission) {
                cleaned.push(permission.to_string());
            }
        }
        self.permissions = cleaned;
    }

    /// Empty ids leave the corresponding field untouched.
    pub(crate) fn select_halo(&mut self, module: Option<&str>, submodule: Option<&str>) {
        if let Some(module) = module.map(str::trim).filter(|m| !m.is_empty()) {
            self.halo.module = module.to_string();
        }
        if let Some(submodule) = submodule.map(str::trim).filter(|s| !s.is_empty()) {
            self.halo.submodule = submodule.to_string();
        }
    }
}
