//! git backend: a document tree persisted through git plumbing commands
//!
//! reads go through `git show <branch>:<path>`. writes hash blobs as they
//! arrive, stage index entries in memory, and on commit build a tree object,
//! chain a commit onto the branch head, and advance the branch ref. until
//! commit succeeds the branch is untouched.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::name::TypedName;
use crate::path::TreePath;
use crate::store::{TreeReader, TreeWriter};

/// regular-file mode for staged index entries
const FILE_MODE: &str = "100644";

/// reads a document tree from a branch of a git repository
pub struct GitReader {
    repo: PathBuf,
    branch: String,
}

impl GitReader {
    pub fn new(repo: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    fn show(&self, path: &TreePath) -> Result<String> {
        let spec = format!("{}:{}", self.branch, path.join());
        run_git(&self.repo, &["show", &spec], None)
    }
}

impl TreeReader for GitReader {
    fn list_children(&self, path: &TreePath) -> Result<Vec<TypedName>> {
        // output is "tree <rev>:<path>", a blank line, then one entry per
        // line; subtree entries carry a trailing '/'
        let listing = self.show(path)?;
        let mut names = Vec::new();
        for line in listing.lines().skip(1) {
            let entry = line.trim_end_matches('/');
            if entry.is_empty() {
                continue;
            }
            names.push(TypedName::parse(entry)?);
        }
        Ok(names)
    }

    /// full blob content at `path`
    ///
    /// content is returned byte-for-byte; a leaf that was stored with a
    /// trailing newline keeps it.
    fn read_leaf(&self, path: &TreePath) -> Result<String> {
        self.show(path)
    }
}

/// an index entry staged for the next commit
#[derive(Debug, Clone)]
struct StagedEntry {
    mode: &'static str,
    sha: String,
    path: String,
}

/// writes a document tree as one commit on a branch
///
/// blobs are hashed into the object store as leaves arrive; index entries
/// accumulate in memory and are applied only inside `commit`, so a writer
/// dropped before commit leaves the branch untouched (dangling blobs aside).
pub struct GitWriter {
    repo: PathBuf,
    branch: String,
    message: String,
    staged: Vec<StagedEntry>,
}

impl GitWriter {
    pub fn new(
        repo: impl Into<PathBuf>,
        branch: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            branch: branch.into(),
            message: message.into(),
            staged: Vec::new(),
        }
    }

    fn branch_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }

    /// current head of the branch, if it has any commits
    fn resolve_head(&self) -> Option<String> {
        let refname = self.branch_ref();
        let output = run_git(&self.repo, &["show-ref", "--hash", &refname], None).ok()?;
        let hash = output.trim();
        if hash.is_empty() {
            None
        } else {
            Some(hash.to_string())
        }
    }
}

impl TreeWriter for GitWriter {
    fn make_tree(&mut self, path: &TreePath, child_count: usize) -> Result<()> {
        // non-empty containers exist implicitly once their descendant leaves
        // are staged. empty ones need an explicit empty-tree object because
        // git does not represent empty directories.
        if child_count > 0 {
            return Ok(());
        }
        let sha = run_git(
            &self.repo,
            &["hash-object", "-w", "-t", "tree", "--stdin"],
            Some(""),
        )?;
        self.staged.push(StagedEntry {
            mode: FILE_MODE,
            sha: sha.trim().to_string(),
            path: path.join(),
        });
        Ok(())
    }

    fn make_leaf(&mut self, path: &TreePath, content: &str) -> Result<()> {
        let sha = run_git(&self.repo, &["hash-object", "-w", "--stdin"], Some(content))?;
        self.staged.push(StagedEntry {
            mode: FILE_MODE,
            sha: sha.trim().to_string(),
            path: path.join(),
        });
        Ok(())
    }

    fn commit(self) -> Result<()> {
        // start from an empty index so the tree is exactly the staged batch
        run_git(&self.repo, &["read-tree", "--empty"], None)?;
        for entry in &self.staged {
            run_git(
                &self.repo,
                &[
                    "update-index",
                    "--add",
                    "--cacheinfo",
                    entry.mode,
                    &entry.sha,
                    &entry.path,
                ],
                None,
            )?;
        }

        let tree_sha = run_git(&self.repo, &["write-tree"], None)?;
        let tree_sha = tree_sha.trim();

        let parent = self.resolve_head();
        let mut args = vec!["commit-tree", tree_sha];
        if let Some(ref parent) = parent {
            args.push("-p");
            args.push(parent);
        }
        let commit_sha = run_git(&self.repo, &args, Some(&self.message))?;
        let commit_sha = commit_sha.trim().to_string();

        let refname = self.branch_ref();
        run_git(&self.repo, &["update-ref", &refname, &commit_sha], None)?;
        Ok(())
    }
}

/// run a git plumbing command in `repo`, returning captured stdout
///
/// non-zero exit, spawn failure, and non-UTF-8 output all surface as
/// `GitCommand` with the subcommand name and stderr (or cause) attached.
fn run_git(repo: &Path, args: &[&str], stdin: Option<&str>) -> Result<String> {
    let command_name = args.first().copied().unwrap_or("git");
    let fail = |message: String| Error::GitCommand {
        command: command_name.to_string(),
        message,
    };

    let mut cmd = Command::new("git");
    cmd.args(args)
        .current_dir(repo)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if stdin.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }

    let mut child = cmd
        .spawn()
        .map_err(|e| fail(format!("failed to spawn git: {}", e)))?;

    if let Some(input) = stdin {
        let mut handle = child
            .stdin
            .take()
            .ok_or_else(|| fail("stdin not available".to_string()))?;
        handle
            .write_all(input.as_bytes())
            .map_err(|e| fail(format!("failed to write stdin: {}", e)))?;
        // closing stdin lets git see EOF
    }

    let output = child
        .wait_with_output()
        .map_err(|e| fail(format!("failed to wait for git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(fail(stderr.trim().to_string()));
    }

    String::from_utf8(output.stdout).map_err(|_| fail("non-UTF-8 output".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Kind;
    use tempfile::{tempdir, TempDir};

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn init_repo() -> TempDir {
        let dir = tempdir().unwrap();
        run_git(dir.path(), &["init", "-q"], None).unwrap();
        run_git(dir.path(), &["config", "user.email", "jot@test"], None).unwrap();
        run_git(dir.path(), &["config", "user.name", "jot"], None).unwrap();
        dir
    }

    fn typed(base: &str, kind: Kind) -> TypedName {
        TypedName::new(base, kind).unwrap()
    }

    macro_rules! require_git {
        () => {
            if !git_available() {
                eprintln!("skipping: git not available");
                return;
            }
        };
    }

    #[test]
    fn test_write_then_read_leaf() {
        require_git!();
        let dir = init_repo();

        let mut writer = GitWriter::new(dir.path(), "main", "first");
        let users = TreePath::root().child(typed("users", Kind::Dict));
        writer.make_tree(&users, 1).unwrap();
        let alice = users.child(typed("alice", Kind::Str));
        writer.make_leaf(&alice, "admin").unwrap();
        writer.commit().unwrap();

        let reader = GitReader::new(dir.path(), "main");
        assert_eq!(reader.read_leaf(&alice).unwrap(), "admin");
    }

    #[test]
    fn test_list_children_strips_header() {
        require_git!();
        let dir = init_repo();

        let mut writer = GitWriter::new(dir.path(), "main", "msg");
        let users = TreePath::root().child(typed("users", Kind::Dict));
        writer.make_tree(&users, 2).unwrap();
        writer
            .make_leaf(&users.child(typed("alice", Kind::Str)), "a")
            .unwrap();
        writer
            .make_leaf(&users.child(typed("count", Kind::Int)), "2")
            .unwrap();
        writer.commit().unwrap();

        let reader = GitReader::new(dir.path(), "main");

        // root listing shows the subtree entry (trailing '/' stripped)
        let top = reader.list_children(&TreePath::root()).unwrap();
        assert_eq!(top, vec![typed("users", Kind::Dict)]);

        let mut children = reader.list_children(&users).unwrap();
        children.sort_by(|a, b| a.base().cmp(b.base()));
        assert_eq!(
            children,
            vec![typed("alice", Kind::Str), typed("count", Kind::Int)]
        );
    }

    #[test]
    fn test_empty_container_is_staged_explicitly() {
        require_git!();
        let dir = init_repo();

        let mut writer = GitWriter::new(dir.path(), "main", "msg");
        let empty = TreePath::root().child(typed("empty", Kind::Dict));
        writer.make_tree(&empty, 0).unwrap();
        writer.commit().unwrap();

        let reader = GitReader::new(dir.path(), "main");
        let top = reader.list_children(&TreePath::root()).unwrap();
        assert_eq!(top, vec![typed("empty", Kind::Dict)]);
    }

    #[test]
    fn test_commit_chaining() {
        require_git!();
        let dir = init_repo();

        let mut writer = GitWriter::new(dir.path(), "main", "first");
        writer
            .make_leaf(&TreePath::root().child(typed("v", Kind::Int)), "1")
            .unwrap();
        writer.commit().unwrap();
        let first = run_git(dir.path(), &["rev-parse", "main"], None).unwrap();

        let mut writer = GitWriter::new(dir.path(), "main", "second");
        writer
            .make_leaf(&TreePath::root().child(typed("v", Kind::Int)), "2")
            .unwrap();
        writer.commit().unwrap();
        let second = run_git(dir.path(), &["rev-parse", "main"], None).unwrap();
        let parent = run_git(dir.path(), &["rev-parse", "main^"], None).unwrap();

        assert_ne!(first.trim(), second.trim());
        assert_eq!(parent.trim(), first.trim());
    }

    #[test]
    fn test_second_commit_replaces_tree() {
        require_git!();
        let dir = init_repo();

        let mut writer = GitWriter::new(dir.path(), "main", "first");
        writer
            .make_leaf(&TreePath::root().child(typed("old", Kind::Str)), "x")
            .unwrap();
        writer.commit().unwrap();

        let mut writer = GitWriter::new(dir.path(), "main", "second");
        writer
            .make_leaf(&TreePath::root().child(typed("new", Kind::Str)), "y")
            .unwrap();
        writer.commit().unwrap();

        // the second tree is exactly the second batch; no stale entries
        let reader = GitReader::new(dir.path(), "main");
        let top = reader.list_children(&TreePath::root()).unwrap();
        assert_eq!(top, vec![typed("new", Kind::Str)]);
    }

    #[test]
    fn test_dropped_writer_leaves_branch_untouched() {
        require_git!();
        let dir = init_repo();

        let mut writer = GitWriter::new(dir.path(), "main", "never");
        writer
            .make_leaf(&TreePath::root().child(typed("x", Kind::Str)), "x")
            .unwrap();
        drop(writer);

        match run_git(dir.path(), &["show-ref", "--hash", "refs/heads/main"], None) {
            Err(Error::GitCommand { .. }) => {}
            Ok(out) => assert!(out.trim().is_empty()),
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_roundtrip_through_git() {
        require_git!();
        let dir = init_repo();

        let doc = serde_json::json!({
            "name": "alice",
            "age": 30,
            "link": "ref:users/alice",
            "tags": ["x", "x", "y"],
            "empty": {}
        });
        crate::encode::convert(GitWriter::new(dir.path(), "main", "snapshot"), &doc).unwrap();

        let back = crate::decode::convert(&GitReader::new(dir.path(), "main"), "").unwrap();
        assert_eq!(back["name"], doc["name"]);
        assert_eq!(back["age"], doc["age"]);
        assert_eq!(back["link"], doc["link"]);
        assert_eq!(back["empty"], serde_json::json!({}));
        let tags = back["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 2);

        // subtree query against the git store
        let age = crate::decode::convert(&GitReader::new(dir.path(), "main"), "age").unwrap();
        assert_eq!(age, serde_json::json!(30));
    }

    #[test]
    fn test_read_missing_path() {
        require_git!();
        let dir = init_repo();

        let reader = GitReader::new(dir.path(), "main");
        let path = TreePath::root().child(typed("nope", Kind::Str));
        assert!(matches!(
            reader.read_leaf(&path),
            Err(Error::GitCommand { .. })
        ));
    }

    #[test]
    fn test_run_git_reports_stderr() {
        require_git!();
        let dir = init_repo();

        let err = run_git(dir.path(), &["rev-parse", "--verify", "nothing"], None).unwrap_err();
        match err {
            Error::GitCommand { command, .. } => assert_eq!(command, "rev-parse"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
