//! Shared test helpers for jjws integration tests.
//!
//! All tests use temp directories and a scripted jj; nothing touches the
//! real repo or needs jj installed. Each test builds its own layout with
//! `TestRepo::new()` and drives `WorkspaceManager` through a `FakeJj`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use jjws::WorkspaceManager;
use jjws::exec::{CommandOutput, CommandRunner};
use jjws::repo::absolute_path;
use tempfile::TempDir;

/// A default workspace at `<tmp>/my-repo` with `.jj/repo` as a directory.
pub struct TestRepo {
    _dir: TempDir,
    root: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path().join("my-repo");
        fs::create_dir_all(root.join(".jj").join("repo")).unwrap();
        let root = absolute_path(&root);
        Self { _dir: dir, root }
    }

    /// Default workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Container directory for the default suffix.
    pub fn container(&self) -> PathBuf {
        self.root.parent().unwrap().join("my-repo-workspaces")
    }

    /// Expected path of workspace `name` under the default suffix.
    pub fn ws_path(&self, name: &str) -> PathBuf {
        self.container().join(name)
    }

    pub fn write_config(&self, json: &str) {
        fs::write(self.root.join(".jjws.json"), json).unwrap();
    }

    pub fn write_file(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Lay out a secondary workspace at `dir` pointing back at this repo.
    pub fn link_workspace(&self, dir: &Path) {
        fs::create_dir_all(dir.join(".jj")).unwrap();
        let pointer = self.root.join(".jj").join("repo");
        fs::write(dir.join(".jj").join("repo"), pointer.to_string_lossy().as_bytes()).unwrap();
    }

    /// Manager starting from the default workspace root.
    pub fn manager<'a>(&self, jj: &'a FakeJj) -> WorkspaceManager<&'a FakeJj> {
        WorkspaceManager::new(self.root.clone(), jj)
    }

    /// Manager starting from `cwd`.
    pub fn manager_in<'a>(&self, cwd: &Path, jj: &'a FakeJj) -> WorkspaceManager<&'a FakeJj> {
        WorkspaceManager::new(cwd.to_path_buf(), jj)
    }
}

/// Run the jjws binary with `args`, starting in `dir`.
pub fn jjws_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jjws"))
        .args(args)
        .current_dir(dir)
        .env_remove("JJWS_LOG")
        .env_remove("JJWS_LOG_FORMAT")
        .output()
        .expect("failed to execute jjws")
}

/// One recorded process invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Call {
    pub fn is_jj(&self, subcommand: &[&str]) -> bool {
        self.program == "jj"
            && self.args.len() >= subcommand.len()
            && self.args.iter().zip(subcommand).all(|(a, s)| a == s)
    }
}

#[derive(Default)]
struct State {
    /// Tracked workspaces and the change id each is editing.
    workspaces: BTreeMap<String, String>,
    next_change: usize,
    calls: Vec<Call>,
    /// jj subcommands (`"add"`, `"forget"`, `"list"`, `"rename"`, `"edit"`) that exit 1.
    failing: HashSet<String>,
    /// Exit codes for non-jj programs. Unlisted programs exit 0.
    exit_codes: HashMap<String, i32>,
}

/// In-memory stand-in for the jj binary.
///
/// `workspace add` creates the directory with a linked `.jj/repo` file, like
/// jj does; everything else only updates the tracked workspace table.
pub struct FakeJj {
    default_root: PathBuf,
    state: RefCell<State>,
}

impl FakeJj {
    pub fn new(repo: &TestRepo) -> Self {
        let mut state = State::default();
        state
            .workspaces
            .insert("default".to_owned(), "qpvuntsm".to_owned());
        Self {
            default_root: repo.root().to_path_buf(),
            state: RefCell::new(state),
        }
    }

    /// Track `name` without creating a directory for it.
    pub fn track(&self, name: &str, change: &str) {
        self.state
            .borrow_mut()
            .workspaces
            .insert(name.to_owned(), change.to_owned());
    }

    pub fn fail(&self, subcommand: &str) {
        self.state.borrow_mut().failing.insert(subcommand.to_owned());
    }

    pub fn set_exit_code(&self, program: &str, code: i32) {
        self.state
            .borrow_mut()
            .exit_codes
            .insert(program.to_owned(), code);
    }

    pub fn tracked(&self) -> Vec<String> {
        self.state.borrow().workspaces.keys().cloned().collect()
    }

    pub fn change_of(&self, name: &str) -> Option<String> {
        self.state.borrow().workspaces.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn jj_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.program == "jj").collect()
    }

    fn jj(&self, state: &mut State, args: &[&str], cwd: Option<&Path>) -> CommandOutput {
        let key = match args {
            ["workspace", sub, ..] => *sub,
            [sub, ..] => *sub,
            [] => "",
        };
        if state.failing.contains(key) {
            return exit(1, "", &format!("Error: {key} failed"));
        }

        match args {
            ["workspace", "add", rest @ ..] => {
                let name = flag(rest, "--name").unwrap_or_default();
                let Some(path) = rest.last() else {
                    return exit(2, "", "Error: missing destination");
                };
                let path = Path::new(path);
                fs::create_dir_all(path.join(".jj")).unwrap();
                let pointer = self.default_root.join(".jj").join("repo");
                fs::write(path.join(".jj").join("repo"), pointer.to_string_lossy().as_bytes()).unwrap();
                state.next_change += 1;
                let change = flag(rest, "--revision")
                    .map_or_else(|| format!("zzzz{:04}", state.next_change), ToOwned::to_owned);
                state.workspaces.insert(name.to_owned(), change);
                exit(0, "", &format!("Created workspace in \"{}\"\n", path.display()))
            }
            ["workspace", "forget", name] => {
                if state.workspaces.remove(*name).is_some() {
                    exit(0, "", "")
                } else {
                    exit(1, "", &format!("Error: No such workspace: {name}"))
                }
            }
            ["workspace", "rename", new] => {
                let current = cwd
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                match state.workspaces.remove(&current) {
                    Some(change) => {
                        state.workspaces.insert((*new).to_owned(), change);
                        exit(0, "", "")
                    }
                    None => exit(1, "", "Error: The current workspace is not tracked"),
                }
            }
            ["workspace", "list"] => {
                let listing: String = state
                    .workspaces
                    .iter()
                    .enumerate()
                    .map(|(i, (name, change))| format!("{name}: {change} {i:08x} (no description set)\n"))
                    .collect();
                exit(0, &listing, "")
            }
            ["edit", _rev] => exit(0, "", ""),
            _ => exit(2, "", "Error: unrecognized subcommand"),
        }
    }
}

impl CommandRunner for FakeJj {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<CommandOutput> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call {
            program: program.to_owned(),
            args: args.iter().map(ToString::to_string).collect(),
            cwd: cwd.map(Path::to_path_buf),
        });

        if program == "jj" {
            return Ok(self.jj(&mut state, args, cwd));
        }
        match state.exit_codes.get(program) {
            Some(-1) => Err(io::Error::new(io::ErrorKind::NotFound, format!("{program}: not found"))),
            Some(code) => Ok(exit(*code, "", &format!("{program} failed"))),
            None => Ok(exit(0, "", "")),
        }
    }
}

fn flag<'a>(args: &[&'a str], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| *a == name)
        .and_then(|i| args.get(i + 1).copied())
}

fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_owned(),
        stderr: stderr.to_owned(),
        exit_code: code,
    }
}
