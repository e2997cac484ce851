use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Risk tier of a proposed tool action. Low-risk actions may be
/// auto-confirmed by the UI when they are the only pending proposal;
/// high-risk actions always require an explicit human decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    High,
}

/// Classify a tool by its wire name. Total over arbitrary strings:
/// anything not in the low-risk table is high risk, including names the
/// catalogue has never heard of.
pub fn classify(tool_name: &str) -> Risk {
    const LOW_RISK: &[&str] = &[
        "read_file",
        "read_directory",
        "get_tree",
        "navigate_user",
        "process_file",
        "create_directory",
        "copy_file",
    ];

    if LOW_RISK.contains(&tool_name) {
        Risk::Low
    } else {
        Risk::High
    }
}

/// Outcome of evaluating a candidate path against the sandbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PathDecision {
    Allow(PathBuf),
    Deny { path: PathBuf, reason: String },
}

/// Confines every resolved path to an authorized root directory.
///
/// The guard is a pure predicate over its inputs plus the root it was
/// constructed with; it performs no filesystem access, so paths that do
/// not exist yet (write targets, rename destinations) are evaluated the
/// same way as existing ones.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    root: PathBuf,
}

impl AccessGuard {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: normalize(&root),
        }
    }

    /// Guard rooted at the user's home directory.
    pub fn for_home() -> Option<Self> {
        home_dir().map(Self::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw path to an absolute, lexically normalized form.
    /// Relative paths resolve against `current` when supplied, otherwise
    /// against the process working directory.
    pub fn resolve(&self, raw: &str, current: Option<&Path>) -> PathBuf {
        let candidate = Path::new(raw);
        if candidate.is_absolute() {
            return normalize(candidate);
        }
        let base = match current {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        normalize(&base.join(candidate))
    }

    /// True when the resolved form of `raw` may be touched.
    pub fn is_allowed(&self, raw: &str, allow_root: bool, current: Option<&Path>) -> bool {
        matches!(self.evaluate(raw, allow_root, current), PathDecision::Allow(_))
    }

    /// Resolve and authorize in one step. Containment is compared
    /// component-by-component via `Path::starts_with`, never on the raw
    /// string form, so a sibling root like `/home/user2` does not slip
    /// past a `/home/user` sandbox.
    pub fn evaluate(&self, raw: &str, allow_root: bool, current: Option<&Path>) -> PathDecision {
        let resolved = self.resolve(raw, current);

        if allow_root {
            return PathDecision::Allow(resolved);
        }

        if resolved.starts_with(&self.root) {
            PathDecision::Allow(resolved)
        } else {
            tracing::warn!(path = %resolved.display(), root = %self.root.display(), "path outside sandbox");
            PathDecision::Deny {
                reason: format!(
                    "path outside authorized root {}: {}",
                    self.root.display(),
                    resolved.display()
                ),
                path: resolved,
            }
        }
    }
}

/// Lexical normalization: collapses `.` and `..` without consulting the
/// filesystem. `..` at the root is dropped rather than escaping it.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }
    None
}
