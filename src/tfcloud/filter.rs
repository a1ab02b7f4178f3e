//! Execution-mode and tag policy applied to a workspace listing

use super::models::Workspace;
use std::collections::BTreeSet;

/// Include/exclude tag sets supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

/// Outcome of evaluating one workspace, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Execution mode is not `remote`
    NotRemote,
    /// Carries at least one excluded tag
    Excluded,
    /// Lacks at least one required tag
    MissingTags,
    Selected,
}

impl FilterDecision {
    pub fn is_selected(self) -> bool {
        matches!(self, Self::Selected)
    }
}

impl TagFilter {
    pub fn new<I, E, T, U>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = T>,
        E: IntoIterator<Item = U>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    pub fn include(&self) -> &BTreeSet<String> {
        &self.include
    }

    pub fn exclude(&self) -> &BTreeSet<String> {
        &self.exclude
    }

    /// Exclusion wins over inclusion.
    pub fn evaluate(&self, workspace: &Workspace) -> FilterDecision {
        if !workspace.execution_mode.is_remote() {
            return FilterDecision::NotRemote;
        }

        if !workspace.tags.is_disjoint(&self.exclude) {
            return FilterDecision::Excluded;
        }

        if !self.include.is_empty() && !workspace.tags.is_superset(&self.include) {
            return FilterDecision::MissingTags;
        }

        FilterDecision::Selected
    }

    pub fn matches(&self, workspace: &Workspace) -> bool {
        self.evaluate(workspace).is_selected()
    }
}

/// Keep the selected workspaces, preserving input order
pub fn filter_workspaces(workspaces: Vec<Workspace>, filter: &TagFilter) -> Vec<Workspace> {
    workspaces
        .into_iter()
        .filter(|workspace| filter.matches(workspace))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfcloud::models::ExecutionMode;

    fn ws(id: &str, tags: &[&str], mode: &str) -> Workspace {
        Workspace::new(id, id, tags.iter().copied(), mode)
    }

    fn catalog() -> Vec<Workspace> {
        vec![
            ws("A", &["prod"], "remote"),
            ws("B", &["staging", "ignore"], "remote"),
            ws("C", &[], "local"),
            ws("D", &["prod", "canary"], "remote"),
            ws("E", &[], "remote"),
        ]
    }

    fn ids(workspaces: &[Workspace]) -> Vec<&str> {
        workspaces.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn test_include_and_exclude_scenario() {
        let filter = TagFilter::new(["prod"], ["ignore"]);
        let matched = filter_workspaces(catalog(), &filter);
        assert_eq!(ids(&matched), vec!["A", "D"]);
    }

    #[test]
    fn test_empty_include_selects_all_remote_not_excluded() {
        let filter = TagFilter::new(Vec::<String>::new(), ["ignore"]);
        let matched = filter_workspaces(catalog(), &filter);
        assert_eq!(ids(&matched), vec!["A", "D", "E"]);
    }

    #[test]
    fn test_empty_filter_selects_every_remote_workspace() {
        let matched = filter_workspaces(catalog(), &TagFilter::default());
        assert_eq!(ids(&matched), vec!["A", "B", "D", "E"]);
        assert!(matched.iter().all(|w| w.execution_mode == ExecutionMode::Remote));
    }

    #[test]
    fn test_exclude_takes_precedence_over_include() {
        let workspace = ws("X", &["prod", "canary", "ignore"], "remote");
        let filter = TagFilter::new(["prod", "canary"], ["ignore"]);
        assert_eq!(filter.evaluate(&workspace), FilterDecision::Excluded);
    }

    #[test]
    fn test_include_requires_every_tag() {
        let filter = TagFilter::new(["prod", "canary"], Vec::<String>::new());
        assert_eq!(
            filter.evaluate(&ws("A", &["prod"], "remote")),
            FilterDecision::MissingTags
        );
        assert_eq!(
            filter.evaluate(&ws("D", &["prod", "canary", "extra"], "remote")),
            FilterDecision::Selected
        );
    }

    #[test]
    fn test_mode_checked_before_tags() {
        let filter = TagFilter::new(["prod"], ["prod"]);
        assert_eq!(
            filter.evaluate(&ws("Z", &["prod"], "agent")),
            FilterDecision::NotRemote
        );
    }

    #[test]
    fn test_membership_property_over_tag_combinations() {
        let universe = ["a", "b", "c"];
        let subsets: Vec<Vec<&str>> = (0..8u8)
            .map(|mask| {
                universe
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, t)| *t)
                    .collect()
            })
            .collect();

        let workspaces: Vec<Workspace> = subsets
            .iter()
            .enumerate()
            .flat_map(|(i, tags)| {
                ["remote", "local"]
                    .into_iter()
                    .map(move |mode| Workspace::new(format!("{i}-{mode}"), "w", tags.clone(), mode))
            })
            .collect();

        for include in &subsets {
            for exclude in &subsets {
                let filter = TagFilter::new(include.clone(), exclude.clone());
                let matched = filter_workspaces(workspaces.clone(), &filter);

                for workspace in &workspaces {
                    let expected = workspace.execution_mode.is_remote()
                        && workspace.tags.is_disjoint(filter.exclude())
                        && workspace.tags.is_superset(filter.include());
                    assert_eq!(matched.contains(workspace), expected);
                }
            }
        }
    }
}
