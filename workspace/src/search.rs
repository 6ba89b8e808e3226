//! Directory-tree search for thread record files.
//!
//! There is no index: every query re-walks the tree, so externally edited
//! records are always visible. A record file qualifies when it sits directly
//! inside a `.threads` directory and carries the `.md` extension; archived
//! records live below `.threads/archive/` and are never direct children, so
//! they drop out of every search. Unreadable directories are skipped
//! silently — one bad subtree should not hide the rest of the workspace.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

use crate::git::{canonical, is_git_root};

/// Name of the reserved subdirectory holding thread records at a scope.
pub const THREADS_DIR: &str = ".threads";

/// Name of the archive subdirectory under `.threads`. Archived records are
/// not direct children of the reserved directory, so they never qualify.
pub const ARCHIVE_DIR: &str = "archive";

/// Options for a single search invocation.
///
/// Constructed fresh per query and never mutated after being handed to the
/// search functions. For both directions, `None` disables the direction,
/// `Some(None)` is the unlimited sentinel, and `Some(Some(n))` limits the
/// walk to `n` levels.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Descend into subdirectories.
    pub down: Option<Option<usize>>,

    /// Walk parent directories. Unlimited means "up to the repository root".
    pub up: Option<Option<usize>>,

    /// Descend into nested repositories instead of stopping at them.
    pub cross_repo_down: bool,

    /// Keep climbing past the repository root.
    pub cross_repo_up: bool,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_down(mut self, depth: Option<usize>) -> Self {
        self.down = Some(depth);
        self
    }

    pub fn with_up(mut self, depth: Option<usize>) -> Self {
        self.up = Some(depth);
        self
    }

    pub fn with_cross_repo_down(mut self, value: bool) -> Self {
        self.cross_repo_down = value;
        self
    }

    pub fn with_cross_repo_up(mut self, value: bool) -> Self {
        self.cross_repo_up = value;
        self
    }
}

/// Find every record file reachable from `start` under the given options.
///
/// Records at `start` itself are always collected, regardless of options.
/// Results are deduplicated by resolved path and ordered by modification
/// time, most recent first, with the path as a deterministic tiebreak.
pub fn find_threads_with_options(
    start: &Path,
    root: &Path,
    options: &FindOptions,
) -> Vec<PathBuf> {
    let start = canonical(start);
    let root = canonical(root);
    let mut found = Vec::new();

    collect_threads_at(&start, &mut found);

    if let Some(depth) = options.down {
        find_down(&start, depth, options.cross_repo_down, &mut found);
    }

    if let Some(depth) = options.up {
        find_up(&start, &root, depth, options.cross_repo_up, &mut found);
    }

    let ordered = order_by_mtime(found);
    debug!(
        "found {} thread files under {}",
        ordered.len(),
        start.display()
    );
    ordered
}

/// Find every record file in the workspace (unlimited downward search from
/// the repository root).
pub fn find_all_threads(root: &Path) -> Vec<PathBuf> {
    find_threads_with_options(root, root, &FindOptions::new().with_down(None))
}

/// Collect qualifying record files from the `.threads` directory at `dir`.
fn collect_threads_at(dir: &Path, found: &mut Vec<PathBuf>) {
    let threads_dir = dir.join(THREADS_DIR);
    let Ok(entries) = fs::read_dir(&threads_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            found.push(path);
        }
    }
}

fn find_down(start: &Path, depth: Option<usize>, cross_repos: bool, found: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(start)
        .min_depth(1)
        .max_depth(depth.unwrap_or(usize::MAX))
        .into_iter()
        .filter_entry(move |entry| {
            if !entry.file_type().is_dir() {
                return false;
            }
            // Hidden directories (including `.threads` itself, which is read
            // per visited directory, not walked).
            if entry.file_name().to_string_lossy().starts_with('.') {
                return false;
            }
            // Nested repositories bound the walk unless crossing is allowed.
            if !cross_repos && is_git_root(entry.path()) {
                return false;
            }
            true
        });

    for entry in walker {
        match entry {
            Ok(entry) => collect_threads_at(entry.path(), found),
            Err(err) => debug!("skipping unreadable directory: {err}"),
        }
    }
}

fn find_up(
    start: &Path,
    root: &Path,
    depth: Option<usize>,
    cross_root: bool,
    found: &mut Vec<PathBuf>,
) {
    let max_depth = depth.unwrap_or(usize::MAX);
    let mut current = start.to_path_buf();
    let mut climbed = 0;

    while climbed < max_depth {
        let Some(parent) = current.parent() else {
            break; // filesystem root
        };
        let parent = canonical(parent);

        // The repository root is inclusive: its records are collected, and
        // only the step beyond it is refused.
        if !cross_root && !parent.starts_with(root) {
            break;
        }

        collect_threads_at(&parent, found);
        current = parent;
        climbed += 1;
    }
}

/// Deduplicate by resolved path and order by mtime, most recent first.
fn order_by_mtime(found: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique: Vec<(SystemTime, PathBuf)> = Vec::new();

    for path in found {
        let resolved = canonical(&path);
        if !seen.insert(resolved.clone()) {
            continue;
        }
        let mtime = fs::metadata(&resolved)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        unique.push((mtime, resolved));
    }

    unique.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    unique.into_iter().map(|(_, path)| path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Create a record file at `<dir>/.threads/<file>`.
    fn make_thread(dir: &Path, file: &str) -> PathBuf {
        let threads_dir = dir.join(THREADS_DIR);
        fs::create_dir_all(&threads_dir).unwrap();
        let path = threads_dir.join(file);
        fs::write(&path, "---\nid: abc123\nname: t\nstatus: idea\n---\n").unwrap();
        path
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_start_scope_is_always_collected() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-at-root.md");

        let found = find_threads_with_options(root.path(), root.path(), &FindOptions::new());
        assert_eq!(names(&found), vec!["aaaaaa-at-root.md"]);
    }

    #[test]
    fn test_down_depth_limit() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-depth0.md");
        make_thread(&root.path().join("sub"), "bbbbbb-depth1.md");
        make_thread(&root.path().join("sub/inner"), "cccccc-depth2.md");

        let one = find_threads_with_options(
            root.path(),
            root.path(),
            &FindOptions::new().with_down(Some(1)),
        );
        assert_eq!(names(&one), vec!["aaaaaa-depth0.md", "bbbbbb-depth1.md"]);

        let all = find_threads_with_options(
            root.path(),
            root.path(),
            &FindOptions::new().with_down(None),
        );
        assert_eq!(
            names(&all),
            vec!["aaaaaa-depth0.md", "bbbbbb-depth1.md", "cccccc-depth2.md"]
        );
    }

    #[test]
    fn test_no_down_means_no_descent() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-here.md");
        make_thread(&root.path().join("sub"), "bbbbbb-below.md");

        let found = find_threads_with_options(root.path(), root.path(), &FindOptions::new());
        assert_eq!(names(&found), vec!["aaaaaa-here.md"]);
    }

    #[test]
    fn test_nested_repo_bounds_downward_search() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-ours.md");
        let vendored = root.path().join("vendored");
        fs::create_dir_all(vendored.join(".git")).unwrap();
        make_thread(&vendored, "bbbbbb-theirs.md");

        let bounded = find_threads_with_options(
            root.path(),
            root.path(),
            &FindOptions::new().with_down(None),
        );
        assert_eq!(names(&bounded), vec!["aaaaaa-ours.md"]);

        let crossed = find_threads_with_options(
            root.path(),
            root.path(),
            &FindOptions::new().with_down(None).with_cross_repo_down(true),
        );
        assert_eq!(names(&crossed), vec!["aaaaaa-ours.md", "bbbbbb-theirs.md"]);
    }

    #[test]
    fn test_hidden_directories_are_skipped() {
        let root = TempDir::new().unwrap();
        make_thread(&root.path().join(".cache/deep"), "aaaaaa-hidden.md");
        make_thread(&root.path().join("visible"), "bbbbbb-seen.md");

        let found = find_threads_with_options(
            root.path(),
            root.path(),
            &FindOptions::new().with_down(None),
        );
        assert_eq!(names(&found), vec!["bbbbbb-seen.md"]);
    }

    #[test]
    fn test_up_search_stops_at_root_inclusive() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-at-root.md");
        make_thread(&root.path().join("a"), "bbbbbb-mid.md");
        let start = root.path().join("a/b");
        fs::create_dir_all(&start).unwrap();
        make_thread(&start, "cccccc-at-start.md");

        let found =
            find_threads_with_options(&start, root.path(), &FindOptions::new().with_up(None));
        assert_eq!(
            names(&found),
            vec!["aaaaaa-at-root.md", "bbbbbb-mid.md", "cccccc-at-start.md"]
        );
    }

    #[test]
    fn test_up_depth_limit() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-at-root.md");
        make_thread(&root.path().join("a"), "bbbbbb-mid.md");
        let start = root.path().join("a/b");
        fs::create_dir_all(&start).unwrap();

        let found =
            find_threads_with_options(&start, root.path(), &FindOptions::new().with_up(Some(1)));
        assert_eq!(names(&found), vec!["bbbbbb-mid.md"]);
    }

    #[test]
    fn test_both_directions_compose_and_dedup() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-at-root.md");
        let start = root.path().join("mid");
        make_thread(&start, "bbbbbb-at-start.md");
        make_thread(&start.join("deep"), "cccccc-below.md");

        let found = find_threads_with_options(
            &start,
            root.path(),
            &FindOptions::new().with_down(None).with_up(None),
        );
        assert_eq!(
            names(&found),
            vec!["aaaaaa-at-root.md", "bbbbbb-at-start.md", "cccccc-below.md"]
        );
    }

    #[test]
    fn test_cross_repo_up_climbs_past_root() {
        let outer = TempDir::new().unwrap();
        make_thread(outer.path(), "aaaaaa-outside.md");

        let root = outer.path().join("repo");
        fs::create_dir_all(root.join(".git")).unwrap();
        make_thread(&root, "bbbbbb-at-root.md");
        let start = root.join("sub");
        fs::create_dir_all(&start).unwrap();

        // Unlimited upward search still stops at the repository root.
        let bounded = find_threads_with_options(&start, &root, &FindOptions::new().with_up(None));
        assert_eq!(names(&bounded), vec!["bbbbbb-at-root.md"]);

        let crossed = find_threads_with_options(
            &start,
            &root,
            &FindOptions::new().with_up(Some(2)).with_cross_repo_up(true),
        );
        assert_eq!(
            names(&crossed),
            vec!["aaaaaa-outside.md", "bbbbbb-at-root.md"]
        );
    }

    #[test]
    fn test_results_ordered_by_mtime_descending() {
        let root = TempDir::new().unwrap();
        let old = make_thread(root.path(), "aaaaaa-old.md");
        let mid = make_thread(&root.path().join("a"), "bbbbbb-mid.md");
        let new = make_thread(&root.path().join("b"), "cccccc-new.md");

        let base = SystemTime::now() - Duration::from_secs(300);
        for (path, offset) in [(&old, 0), (&mid, 60), (&new, 120)] {
            let file = fs::File::options().write(true).open(path).unwrap();
            file.set_modified(base + Duration::from_secs(offset)).unwrap();
        }

        let found = find_threads_with_options(
            root.path(),
            root.path(),
            &FindOptions::new().with_down(None),
        );
        let got: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            got,
            vec!["cccccc-new.md", "bbbbbb-mid.md", "aaaaaa-old.md"]
        );
    }

    #[test]
    fn test_archive_is_excluded() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-live.md");

        let archive = root.path().join(THREADS_DIR).join(ARCHIVE_DIR);
        fs::create_dir_all(&archive).unwrap();
        fs::write(archive.join("bbbbbb-old.md"), "---\nid: bbbbbb\n---\n").unwrap();

        let found = find_threads_with_options(root.path(), root.path(), &FindOptions::new());
        assert_eq!(names(&found), vec!["aaaaaa-live.md"]);
    }

    #[test]
    fn test_only_direct_children_of_threads_dir_qualify() {
        let root = TempDir::new().unwrap();
        make_thread(root.path(), "aaaaaa-direct.md");

        let nested = root.path().join(THREADS_DIR).join("drafts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("bbbbbb-nested.md"), "---\nid: bbbbbb\n---\n").unwrap();
        fs::write(root.path().join(THREADS_DIR).join("notes.txt"), "not md").unwrap();

        let found = find_threads_with_options(root.path(), root.path(), &FindOptions::new());
        assert_eq!(names(&found), vec!["aaaaaa-direct.md"]);
    }
}
