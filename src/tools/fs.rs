//! Filesystem tool semantics. Every function authorizes its paths
//! through the execution context's guard before touching storage and
//! reports failures with the resolved absolute path included.

use std::path::{Path, PathBuf};

use crate::tools::types::{ToolError, ToolPayload};
use crate::tools::ExecutionContext;
use crate::workspace;

pub fn read_file(ctx: &ExecutionContext, path: &str) -> Result<ToolPayload, ToolError> {
    let full = ctx.authorize(path)?;
    if !full.exists() {
        return Err(ToolError::NotFound {
            path: full.display().to_string(),
        });
    }
    if !full.is_file() {
        return Err(ToolError::WrongType {
            path: full.display().to_string(),
            expected: "file",
        });
    }
    let content = std::fs::read_to_string(&full)
        .map_err(|e| ToolError::Execution(format!("failed to read {}: {e}", full.display())))?;
    Ok(ToolPayload::FileContent {
        path: full.display().to_string(),
        content,
    })
}

pub fn write_file(ctx: &ExecutionContext, path: &str, content: &str) -> Result<ToolPayload, ToolError> {
    let full = ctx.authorize(path)?;
    // Authorization happens before the parent directories come into
    // existence, so a denied path never leaves partial structure behind.
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ToolError::Execution(format!("failed to create {}: {e}", parent.display())))?;
    }
    std::fs::write(&full, content)
        .map_err(|e| ToolError::Execution(format!("failed to write {}: {e}", full.display())))?;
    Ok(ToolPayload::Written {
        path: full.display().to_string(),
    })
}

pub fn read_directory(ctx: &ExecutionContext, path: &str) -> Result<ToolPayload, ToolError> {
    let full = ctx.authorize(path)?;
    ensure_directory(&full)?;
    let entries = workspace::list_directory(&full)
        .map_err(|e| ToolError::Execution(format!("failed to list {}: {e}", full.display())))?;

    let (mut folders, mut files) = (Vec::new(), Vec::new());
    for entry in entries {
        if entry.is_dir {
            folders.push(entry.name);
        } else {
            files.push(entry.name);
        }
    }
    Ok(ToolPayload::Listing {
        path: full.display().to_string(),
        folders,
        files,
    })
}

pub fn get_tree(ctx: &ExecutionContext, path: &str) -> Result<ToolPayload, ToolError> {
    let full = ctx.authorize(path)?;
    ensure_directory(&full)?;

    let label = full
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| full.display().to_string());
    let mut rendered = format!("{label}/\n");
    render_children(&full, "", &mut rendered);

    Ok(ToolPayload::Tree {
        path: full.display().to_string(),
        rendered,
    })
}

/// Directories come first, each level alphabetical. A subdirectory that
/// cannot be read contributes an inline error marker instead of
/// aborting the whole traversal.
fn render_children(dir: &Path, prefix: &str, out: &mut String) {
    let entries = match workspace::list_directory(dir) {
        Ok(entries) => entries,
        Err(e) => {
            out.push_str(&format!("{prefix}└── [unreadable: {e}]\n"));
            return;
        }
    };

    let count = entries.len();
    for (idx, entry) in entries.into_iter().enumerate() {
        let last = idx + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        if entry.is_dir {
            out.push_str(&format!("{prefix}{connector}{}/\n", entry.name));
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_children(&dir.join(&entry.name), &child_prefix, out);
        } else {
            out.push_str(&format!("{prefix}{connector}{}\n", entry.name));
        }
    }
}

pub fn create_directory(ctx: &ExecutionContext, path: &str, name: &str) -> Result<ToolPayload, ToolError> {
    ensure_plain_name(name)?;
    let parent = ctx.authorize(path)?;
    ensure_directory(&parent)?;
    let full = parent.join(name);
    std::fs::create_dir_all(&full)
        .map_err(|e| ToolError::Execution(format!("failed to create {}: {e}", full.display())))?;
    Ok(ToolPayload::DirectoryCreated {
        path: full.display().to_string(),
    })
}

pub fn rename(ctx: &ExecutionContext, path: &str, new_name: &str) -> Result<ToolPayload, ToolError> {
    ensure_plain_name(new_name)?;
    let from = ctx.authorize(path)?;
    if !from.exists() {
        return Err(ToolError::NotFound {
            path: from.display().to_string(),
        });
    }
    let to = from
        .parent()
        .map(|parent| parent.join(new_name))
        .ok_or_else(|| ToolError::InvalidInput(format!("cannot rename {}", from.display())))?;
    std::fs::rename(&from, &to).map_err(|e| {
        ToolError::Execution(format!("failed to rename {} to {}: {e}", from.display(), to.display()))
    })?;
    Ok(ToolPayload::Renamed {
        from: from.display().to_string(),
        to: to.display().to_string(),
    })
}

pub fn delete(ctx: &ExecutionContext, path: &str) -> Result<ToolPayload, ToolError> {
    let full = ctx.authorize(path)?;
    if !full.exists() {
        return Err(ToolError::NotFound {
            path: full.display().to_string(),
        });
    }
    let result = if full.is_dir() {
        std::fs::remove_dir_all(&full)
    } else {
        std::fs::remove_file(&full)
    };
    result.map_err(|e| ToolError::Execution(format!("failed to delete {}: {e}", full.display())))?;
    Ok(ToolPayload::Deleted {
        path: full.display().to_string(),
    })
}

pub fn copy(ctx: &ExecutionContext, source: &str, destination: &str) -> Result<ToolPayload, ToolError> {
    let from = ctx.authorize(source)?;
    let to = place_into(ctx.authorize(destination)?, &from);
    if !from.exists() {
        return Err(ToolError::NotFound {
            path: from.display().to_string(),
        });
    }
    copy_recursively(&from, &to).map_err(|e| {
        ToolError::Execution(format!("failed to copy {} to {}: {e}", from.display(), to.display()))
    })?;
    Ok(ToolPayload::Copied {
        from: from.display().to_string(),
        to: to.display().to_string(),
    })
}

pub fn move_item(ctx: &ExecutionContext, source: &str, destination: &str) -> Result<ToolPayload, ToolError> {
    let from = ctx.authorize(source)?;
    let to = place_into(ctx.authorize(destination)?, &from);
    if !from.exists() {
        return Err(ToolError::NotFound {
            path: from.display().to_string(),
        });
    }
    std::fs::rename(&from, &to).map_err(|e| {
        ToolError::Execution(format!("failed to move {} to {}: {e}", from.display(), to.display()))
    })?;
    Ok(ToolPayload::Moved {
        from: from.display().to_string(),
        to: to.display().to_string(),
    })
}

pub fn navigate(ctx: &ExecutionContext, path: &str) -> Result<ToolPayload, ToolError> {
    let full = ctx.authorize(path)?;
    if !full.exists() {
        return Err(ToolError::NotFound {
            path: full.display().to_string(),
        });
    }
    ensure_directory(&full)?;
    Ok(ToolPayload::Navigated {
        path: full.display().to_string(),
    })
}

/// Destination-is-existing-directory semantics shared by copy and move:
/// the item keeps its basename and lands inside the directory.
fn place_into(destination: PathBuf, source: &Path) -> PathBuf {
    if destination.is_dir() {
        if let Some(name) = source.file_name() {
            return destination.join(name);
        }
    }
    destination
}

fn copy_recursively(from: &Path, to: &Path) -> std::io::Result<()> {
    if from.is_dir() {
        std::fs::create_dir_all(to)?;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            copy_recursively(&entry.path(), &to.join(entry.file_name()))?;
        }
    } else {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(from, to)?;
    }
    Ok(())
}

fn ensure_directory(path: &Path) -> Result<(), ToolError> {
    if !path.exists() {
        return Err(ToolError::NotFound {
            path: path.display().to_string(),
        });
    }
    if !path.is_dir() {
        return Err(ToolError::WrongType {
            path: path.display().to_string(),
            expected: "directory",
        });
    }
    Ok(())
}

fn ensure_plain_name(name: &str) -> Result<(), ToolError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(ToolError::InvalidInput(format!(
            "name must be a plain file name without separators: {name}"
        )));
    }
    Ok(())
}
