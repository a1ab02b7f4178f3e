//! Testing utilities and fixtures
//!
//! This module provides the mock workspace API and shared workspace fixtures
//! used by unit and integration tests.

pub mod mocks;

use crate::tfcloud::models::Workspace;

/// Five workspaces covering every filter decision.
///
/// With include `["prod"]` and exclude `["ignore"]` only `A` and `D` are
/// selected: `B` is excluded, `C` runs locally and `E` lacks the tag.
pub fn sample_workspaces() -> Vec<Workspace> {
    vec![
        Workspace::new("ws-a", "A", ["prod"], "remote"),
        Workspace::new("ws-b", "B", ["staging", "ignore"], "remote"),
        Workspace::new("ws-c", "C", Vec::<String>::new(), "local"),
        Workspace::new("ws-d", "D", ["prod", "canary"], "remote"),
        Workspace::new("ws-e", "E", Vec::<String>::new(), "remote"),
    ]
}

/// `count` untagged remote workspaces named `w0..` with ids `ws-0..`
pub fn remote_workspaces(count: usize) -> Vec<Workspace> {
    (0..count)
        .map(|i| Workspace::new(format!("ws-{i}"), format!("w{i}"), Vec::<String>::new(), "remote"))
        .collect()
}
