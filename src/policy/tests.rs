//! AccessGuard and risk classification unit tests

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::policy::{classify, AccessGuard, PathDecision, Risk};

    fn guard() -> AccessGuard {
        AccessGuard::new(PathBuf::from("/home/user"))
    }

    #[test]
    fn test_classification_is_total_over_catalogue() {
        let low = [
            "read_file",
            "read_directory",
            "get_tree",
            "navigate_user",
            "process_file",
            "create_directory",
            "copy_file",
        ];
        let high = ["write_file", "delete_item", "move_item", "rename_file"];

        for name in low {
            assert_eq!(classify(name), Risk::Low, "{name} should be low risk");
        }
        for name in high {
            assert_eq!(classify(name), Risk::High, "{name} should be high risk");
        }
    }

    #[test]
    fn test_unknown_tool_name_is_high_risk() {
        assert_eq!(classify("format_disk"), Risk::High);
        assert_eq!(classify(""), Risk::High);
    }

    #[test]
    fn test_relative_path_resolves_against_current() {
        let resolved = guard().resolve("notes.txt", Some(Path::new("/home/user/docs")));
        assert_eq!(resolved, PathBuf::from("/home/user/docs/notes.txt"));
    }

    #[test]
    fn test_absolute_path_ignores_current() {
        let resolved = guard().resolve("/home/user/a.txt", Some(Path::new("/home/user/docs")));
        assert_eq!(resolved, PathBuf::from("/home/user/a.txt"));
    }

    #[test]
    fn test_dot_segments_collapse_lexically() {
        let resolved = guard().resolve("../music/./song.mp3", Some(Path::new("/home/user/docs")));
        assert_eq!(resolved, PathBuf::from("/home/user/music/song.mp3"));
    }

    #[test]
    fn test_sibling_root_prefix_collision_is_rejected() {
        // Regression: a raw string compare would let /home/user2 through
        // for a /home/user root.
        let g = guard();
        assert!(!g.is_allowed("/home/user2/secret.txt", false, None));
        assert!(g.is_allowed("/home/user/secret.txt", false, None));
    }

    #[test]
    fn test_parent_traversal_cannot_escape() {
        let g = guard();
        assert!(!g.is_allowed("../../etc/passwd", false, Some(Path::new("/home/user/docs"))));
        assert!(!g.is_allowed("/home/user/../other", false, None));
    }

    #[test]
    fn test_allow_root_permits_everything() {
        let g = guard();
        assert!(g.is_allowed("/etc/passwd", true, None));
        assert!(g.is_allowed("/home/user2/secret.txt", true, None));
    }

    #[test]
    fn test_root_itself_is_allowed() {
        match guard().evaluate("/home/user", false, None) {
            PathDecision::Allow(path) => assert_eq!(path, PathBuf::from("/home/user")),
            PathDecision::Deny { reason, .. } => panic!("root should be allowed: {reason}"),
        }
    }

    #[test]
    fn test_denial_reports_the_offending_path() {
        match guard().evaluate("/var/log/syslog", false, None) {
            PathDecision::Allow(path) => panic!("should be denied: {}", path.display()),
            PathDecision::Deny { path, reason } => {
                assert_eq!(path, PathBuf::from("/var/log/syslog"));
                assert!(reason.contains("/var/log/syslog"));
            }
        }
    }
}
