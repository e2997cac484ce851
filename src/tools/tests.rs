//! Tool executor tests against temp-directory sandboxes.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use crate::model::{ToolCall, ToolRequest};
use crate::policy::AccessGuard;
use crate::tools::{execute, ExecutionContext, ToolPayload, ToolStatus};

struct Sandbox {
    _dir: tempfile::TempDir,
    root: PathBuf,
    guard: AccessGuard,
}

fn sandbox() -> Sandbox {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().to_path_buf();
    let guard = AccessGuard::new(root.clone());
    Sandbox { _dir: dir, root, guard }
}

impl Sandbox {
    fn ctx(&self) -> ExecutionContext<'_> {
        ExecutionContext {
            guard: &self.guard,
            allow_root: false,
            current_path: &self.root,
        }
    }

    fn run(&self, request: ToolRequest) -> crate::tools::ToolResult {
        execute(&self.ctx(), &ToolCall::from_request(request))
    }
}

#[test]
fn write_then_read_round_trip() {
    let sb = sandbox();
    let written = sb.run(ToolRequest::WriteFile {
        path: "notes/todo.txt".into(),
        content: "buy milk".into(),
    });
    assert_eq!(written.status, ToolStatus::Success);

    let read = sb.run(ToolRequest::ReadFile {
        path: "notes/todo.txt".into(),
    });
    match read.payload {
        Some(ToolPayload::FileContent { content, .. }) => assert_eq!(content, "buy milk"),
        other => panic!("expected file content, got {other:?}"),
    }
}

#[test]
fn write_outside_sandbox_is_denied_and_touches_nothing() {
    let sb = sandbox();
    let outside = std::env::temp_dir().join("dirpilot-escape.txt");
    let _ = std::fs::remove_file(&outside);

    let result = sb.run(ToolRequest::WriteFile {
        path: outside.display().to_string(),
        content: "nope".into(),
    });

    assert_eq!(result.status, ToolStatus::Error);
    assert!(result.error.unwrap().contains("access denied"));
    assert!(!outside.exists());
}

#[test]
fn traversal_out_of_the_sandbox_is_denied() {
    let sb = sandbox();
    let result = sb.run(ToolRequest::ReadFile {
        path: "../../../etc/passwd".into(),
    });
    assert_eq!(result.status, ToolStatus::Error);
}

#[test]
fn read_missing_file_reports_resolved_path() {
    let sb = sandbox();
    let result = sb.run(ToolRequest::ReadFile {
        path: "ghost.txt".into(),
    });
    assert_eq!(result.status, ToolStatus::Error);
    let message = result.error.unwrap();
    assert!(message.contains("not found"));
    assert!(message.contains(&sb.root.join("ghost.txt").display().to_string()));
}

#[test]
fn read_directory_splits_folders_and_files() {
    let sb = sandbox();
    std::fs::create_dir(sb.root.join("sub")).unwrap();
    std::fs::write(sb.root.join("a.txt"), "a").unwrap();

    let result = sb.run(ToolRequest::ReadDirectory { path: ".".into() });
    match result.payload {
        Some(ToolPayload::Listing { folders, files, .. }) => {
            assert_eq!(folders, vec!["sub"]);
            assert_eq!(files, vec!["a.txt"]);
        }
        other => panic!("expected listing, got {other:?}"),
    }
}

#[test]
fn tree_renders_directories_before_files() {
    let sb = sandbox();
    std::fs::create_dir(sb.root.join("docs")).unwrap();
    std::fs::write(sb.root.join("docs/deep.txt"), "x").unwrap();
    std::fs::write(sb.root.join("zzz.txt"), "z").unwrap();
    std::fs::write(sb.root.join("aaa.txt"), "a").unwrap();

    let result = sb.run(ToolRequest::GetTree { path: ".".into() });
    let rendered = match result.payload {
        Some(ToolPayload::Tree { rendered, .. }) => rendered,
        other => panic!("expected tree, got {other:?}"),
    };

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[1], "├── docs/");
    assert_eq!(lines[2], "│   └── deep.txt");
    assert_eq!(lines[3], "├── aaa.txt");
    assert_eq!(lines[4], "└── zzz.txt");
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_becomes_inline_marker() {
    use std::os::unix::fs::PermissionsExt;

    let sb = sandbox();
    let locked = sb.root.join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::write(locked.join("hidden.txt"), "h").unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    let result = sb.run(ToolRequest::GetTree { path: ".".into() });

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.status, ToolStatus::Success);
    let rendered = match result.payload {
        Some(ToolPayload::Tree { rendered, .. }) => rendered,
        other => panic!("expected tree, got {other:?}"),
    };
    assert!(rendered.contains("[unreadable:"), "{rendered}");
}

#[test]
fn create_directory_rejects_separators_in_name() {
    let sb = sandbox();
    let result = sb.run(ToolRequest::CreateDirectory {
        path: ".".into(),
        name: "evil/../..".into(),
    });
    assert_eq!(result.status, ToolStatus::Error);
    assert!(result.error.unwrap().contains("invalid input"));
}

#[test]
fn rename_rejects_dot_dot_as_a_name() {
    let sb = sandbox();
    std::fs::write(sb.root.join("notes.txt"), "n").unwrap();

    let result = sb.run(ToolRequest::Rename {
        path: "notes.txt".into(),
        new_name: "..".into(),
    });
    assert_eq!(result.status, ToolStatus::Error);
    assert!(sb.root.join("notes.txt").exists());
}

#[test]
fn create_directory_inside_parent() {
    let sb = sandbox();
    let result = sb.run(ToolRequest::CreateDirectory {
        path: ".".into(),
        name: "projects".into(),
    });
    assert_eq!(result.status, ToolStatus::Success);
    assert!(sb.root.join("projects").is_dir());
}

#[test]
fn rename_keeps_the_item_in_its_directory() {
    let sb = sandbox();
    std::fs::write(sb.root.join("notes.txt"), "n").unwrap();

    let result = sb.run(ToolRequest::Rename {
        path: "notes.txt".into(),
        new_name: "draft.txt".into(),
    });

    assert_eq!(result.status, ToolStatus::Success);
    assert!(!sb.root.join("notes.txt").exists());
    assert!(sb.root.join("draft.txt").is_file());
}

#[test]
fn delete_removes_directories_recursively() {
    let sb = sandbox();
    std::fs::create_dir_all(sb.root.join("stack/deep")).unwrap();
    std::fs::write(sb.root.join("stack/deep/file.txt"), "f").unwrap();

    let result = sb.run(ToolRequest::Delete {
        path: "stack".into(),
    });
    assert_eq!(result.status, ToolStatus::Success);
    assert!(!sb.root.join("stack").exists());
}

#[test]
fn copy_into_existing_directory_preserves_basename() {
    let sb = sandbox();
    std::fs::write(sb.root.join("report.pdf"), "r").unwrap();
    std::fs::create_dir(sb.root.join("archive")).unwrap();

    let result = sb.run(ToolRequest::Copy {
        source: "report.pdf".into(),
        destination: "archive".into(),
    });

    assert_eq!(result.status, ToolStatus::Success);
    assert!(sb.root.join("report.pdf").exists());
    assert!(sb.root.join("archive/report.pdf").exists());
}

#[test]
fn copy_directory_recurses() {
    let sb = sandbox();
    std::fs::create_dir_all(sb.root.join("src/nested")).unwrap();
    std::fs::write(sb.root.join("src/nested/deep.txt"), "d").unwrap();

    let result = sb.run(ToolRequest::Copy {
        source: "src".into(),
        destination: "backup".into(),
    });

    assert_eq!(result.status, ToolStatus::Success);
    assert!(sb.root.join("backup/nested/deep.txt").exists());
}

#[test]
fn move_into_existing_directory_preserves_basename() {
    let sb = sandbox();
    std::fs::write(sb.root.join("song.mp3"), "s").unwrap();
    std::fs::create_dir(sb.root.join("music")).unwrap();

    let result = sb.run(ToolRequest::Move {
        source: "song.mp3".into(),
        destination: "music".into(),
    });

    assert_eq!(result.status, ToolStatus::Success);
    assert!(!sb.root.join("song.mp3").exists());
    assert!(sb.root.join("music/song.mp3").exists());
}

#[test]
fn navigate_requires_an_existing_directory() {
    let sb = sandbox();
    std::fs::write(sb.root.join("file.txt"), "f").unwrap();

    let to_file = sb.run(ToolRequest::Navigate {
        path: "file.txt".into(),
    });
    assert_eq!(to_file.status, ToolStatus::Error);

    std::fs::create_dir(sb.root.join("docs")).unwrap();
    let to_dir = sb.run(ToolRequest::Navigate { path: "docs".into() });
    match to_dir.payload {
        Some(ToolPayload::Navigated { path }) => {
            assert_eq!(Path::new(&path), sb.root.join("docs"))
        }
        other => panic!("expected navigated, got {other:?}"),
    }
}

#[test]
fn media_attachment_encodes_allowed_types() {
    let sb = sandbox();
    std::fs::write(sb.root.join("pixel.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();

    let result = sb.run(ToolRequest::ProcessMedia {
        path: "pixel.png".into(),
    });
    match result.payload {
        Some(ToolPayload::Media { mime, size_bytes, data_base64, .. }) => {
            assert_eq!(mime, "image/png");
            assert_eq!(size_bytes, 4);
            assert!(!data_base64.is_empty());
        }
        other => panic!("expected media, got {other:?}"),
    }
}

#[test]
fn media_rejects_unknown_extensions() {
    let sb = sandbox();
    std::fs::write(sb.root.join("binary.exe"), "x").unwrap();

    let result = sb.run(ToolRequest::ProcessMedia {
        path: "binary.exe".into(),
    });
    assert_eq!(result.status, ToolStatus::Error);
    assert!(result.error.unwrap().contains("unsupported media type"));
}

#[test]
fn media_enforces_the_image_ceiling() {
    let sb = sandbox();
    let oversized = vec![0u8; 21 * 1024 * 1024];
    std::fs::write(sb.root.join("huge.png"), oversized).unwrap();

    let result = sb.run(ToolRequest::ProcessMedia {
        path: "huge.png".into(),
    });
    assert_eq!(result.status, ToolStatus::Error);
    assert!(result.error.unwrap().contains("20 MB limit"));
}

#[test]
fn malformed_requests_fail_without_touching_storage() {
    let sb = sandbox();
    let result = sb.run(ToolRequest::Malformed {
        name: "format_disk".into(),
        reason: "unknown tool".into(),
    });
    assert_eq!(result.status, ToolStatus::Error);
    assert!(result.error.unwrap().contains("format_disk"));
    assert_eq!(std::fs::read_dir(&sb.root).unwrap().count(), 0);
}

#[test]
fn allow_root_permits_paths_outside_the_sandbox() {
    let sb = sandbox();
    let other = tempfile::tempdir().unwrap();
    std::fs::write(other.path().join("outside.txt"), "visible").unwrap();

    let ctx = ExecutionContext {
        guard: &sb.guard,
        allow_root: true,
        current_path: &sb.root,
    };
    let call = ToolCall::from_request(ToolRequest::ReadFile {
        path: other.path().join("outside.txt").display().to_string(),
    });
    let result = execute(&ctx, &call);
    assert_eq!(result.status, ToolStatus::Success);
}
