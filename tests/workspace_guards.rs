//! Preconditions that must fail before jj or the filesystem is touched.

mod common;

use std::fs;

use common::{FakeJj, TestRepo};
use jjws::WorkspaceError;
use jjws::WorkspaceManager;

fn ws_error(err: &anyhow::Error) -> &WorkspaceError {
    err.downcast_ref::<WorkspaceError>()
        .unwrap_or_else(|| panic!("expected WorkspaceError, got: {err:#}"))
}

/// Sorted listing of every path under `dir`, for before/after comparisons.
fn snapshot(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in fs::read_dir(&d).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path.clone());
            }
            out.push(path);
        }
    }
    out.sort();
    out
}

#[test]
fn remove_default_touches_nothing() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    let mgr = repo.manager(&jj);
    mgr.create("feat", None).unwrap();
    let base = repo.root().parent().unwrap().to_path_buf();
    let before = snapshot(&base);
    let calls_before = jj.calls().len();

    let err = mgr.remove("default").unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::CannotRemoveDefault));

    assert_eq!(jj.calls().len(), calls_before);
    assert_eq!(snapshot(&base), before);
}

#[test]
fn remove_default_fails_even_outside_a_repository() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);

    let err = WorkspaceManager::new(tmp.path(), &jj)
        .remove("default")
        .unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::CannotRemoveDefault));
    assert!(jj.calls().is_empty());
}

#[test]
fn create_over_existing_path_never_calls_jj() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    fs::create_dir_all(repo.ws_path("feature")).unwrap();

    let err = repo.manager(&jj).create("feature", None).unwrap_err();
    match ws_error(&err) {
        WorkspaceError::AlreadyExists { name, path } => {
            assert_eq!(name, "feature");
            assert_eq!(path, &repo.ws_path("feature"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(jj.calls().is_empty());
}

#[test]
fn create_rejects_empty_and_reserved_names() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    let mgr = repo.manager(&jj);

    for name in ["", "   ", "default"] {
        let err = mgr.create(name, None).unwrap_err();
        assert!(
            matches!(ws_error(&err), WorkspaceError::Validation { .. }),
            "name {name:?}: {err:#}"
        );
    }
    assert!(jj.calls().is_empty());
}

#[test]
fn create_reports_jj_failure() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    jj.fail("add");

    let err = repo.manager(&jj).create("feat", None).unwrap_err();
    match ws_error(&err) {
        WorkspaceError::ExternalTool { operation, stderr } => {
            assert_eq!(operation, "create workspace");
            assert_eq!(stderr, "Error: add failed");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn go_and_copy_to_missing_workspace_are_not_found() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    let mgr = repo.manager(&jj);

    for err in [mgr.go("nope").unwrap_err(), mgr.copy_to("nope").unwrap_err()] {
        assert!(matches!(
            ws_error(&err),
            WorkspaceError::NotFound { name } if name == "nope"
        ));
    }
}

#[test]
fn rename_guards() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    let mgr = repo.manager(&jj);
    mgr.create("a", None).unwrap();
    mgr.create("b", None).unwrap();
    let calls_before = jj.calls().len();

    let err = mgr.rename("default", "x").unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::CannotRemoveDefault));

    let err = mgr.rename("a", "default").unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::Validation { .. }));

    let err = mgr.rename("missing", "x").unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::NotFound { .. }));

    let err = mgr.rename("a", "b").unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::AlreadyExists { .. }));

    assert_eq!(jj.calls().len(), calls_before);
}

#[test]
fn use_default_is_a_validation_error() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);

    for name in ["default", ""] {
        let err = repo.manager(&jj).use_workspace(name).unwrap_err();
        assert!(matches!(ws_error(&err), WorkspaceError::Validation { .. }));
    }
    assert!(jj.calls().is_empty());
}

#[test]
fn use_outside_default_workspace_never_calls_jj() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    let other = repo.ws_path("other");
    repo.link_workspace(&other);
    jj.track("other", "oooo");
    jj.track("x", "xxxx");

    let err = repo.manager_in(&other, &jj).use_workspace("x").unwrap_err();
    assert!(matches!(
        ws_error(&err),
        WorkspaceError::NotDefaultWorkspace { .. }
    ));
    assert!(jj.calls().is_empty());
}

#[test]
fn use_unlisted_workspace_is_not_found() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);

    let err = repo.manager(&jj).use_workspace("ghost").unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::NotFound { .. }));
    assert!(jj.jj_calls().iter().all(|c| !c.is_jj(&["edit"])));
}

#[test]
fn use_reports_edit_failure() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    jj.track("feat", "ffff");
    jj.fail("edit");

    let err = repo.manager(&jj).use_workspace("feat").unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::ExternalTool { .. }));
}

#[test]
fn this_in_default_workspace_is_a_validation_error() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);

    let err = repo.manager(&jj).this().unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::Validation { .. }));
    assert!(jj.calls().is_empty());
}

#[test]
fn this_for_unlisted_workspace_is_a_validation_error() {
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    let stray = repo.ws_path("stray");
    repo.link_workspace(&stray);

    let err = repo.manager_in(&stray, &jj).this().unwrap_err();
    assert!(matches!(ws_error(&err), WorkspaceError::Validation { .. }));
}

#[test]
fn operations_outside_a_repository_fail_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = TestRepo::new();
    let jj = FakeJj::new(&repo);
    let mgr = WorkspaceManager::new(tmp.path(), &jj);

    for err in [
        mgr.init().unwrap_err(),
        mgr.list().unwrap_err(),
        mgr.go("feat").unwrap_err(),
    ] {
        assert!(matches!(
            ws_error(&err),
            WorkspaceError::NotARepository { .. }
        ));
    }
    assert!(jj.calls().is_empty());
}
