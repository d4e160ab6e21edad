//
//  octane-cli
//  api/entity_type.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The catalog of Octane entity types.
//!
//! Callers address collections by a logical name (`stories`, `test_manual`,
//! `fields`), and the client resolves the REST path segment. Most names map
//! to themselves; a few do not:
//!
//! | Logical name | Path segment |
//! |--------------|--------------|
//! | `test_manual` | `manual_tests` |
//! | `user_tag` | `user_tags` |
//! | `fields` | `metadata/fields` |
//!
//! The catalog is closed: there is no way to register new types at runtime.

use std::fmt;
use std::str::FromStr;

use super::ApiError;

/// A resource collection exposed by the Octane REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Attachments,
    Stories,
    WorkItems,
    Releases,
    Features,
    Defects,
    Teams,
    TestManual,
    ManualRuns,
    RunSteps,
    ListNodes,
    MetadataFields,
    Phases,
    Transitions,
    WorkspaceUsers,
    Users,
    WorkItemRoots,
    Epics,
    Sprints,
    Fields,
    Metaphases,
    WorkspaceRoles,
    Tests,
    Tasks,
    UserTag,
    Comments,
    Programs,
    QualityStories,
    Milestones,
    ApplicationModules,
}

impl EntityType {
    /// Every entity type, in catalog order.
    pub const ALL: &'static [EntityType] = &[
        EntityType::Attachments,
        EntityType::Stories,
        EntityType::WorkItems,
        EntityType::Releases,
        EntityType::Features,
        EntityType::Defects,
        EntityType::Teams,
        EntityType::TestManual,
        EntityType::ManualRuns,
        EntityType::RunSteps,
        EntityType::ListNodes,
        EntityType::MetadataFields,
        EntityType::Phases,
        EntityType::Transitions,
        EntityType::WorkspaceUsers,
        EntityType::Users,
        EntityType::WorkItemRoots,
        EntityType::Epics,
        EntityType::Sprints,
        EntityType::Fields,
        EntityType::Metaphases,
        EntityType::WorkspaceRoles,
        EntityType::Tests,
        EntityType::Tasks,
        EntityType::UserTag,
        EntityType::Comments,
        EntityType::Programs,
        EntityType::QualityStories,
        EntityType::Milestones,
        EntityType::ApplicationModules,
    ];

    /// The logical name callers use.
    pub fn name(self) -> &'static str {
        match self {
            EntityType::Attachments => "attachments",
            EntityType::Stories => "stories",
            EntityType::WorkItems => "work_items",
            EntityType::Releases => "releases",
            EntityType::Features => "features",
            EntityType::Defects => "defects",
            EntityType::Teams => "teams",
            EntityType::TestManual => "test_manual",
            EntityType::ManualRuns => "manual_runs",
            EntityType::RunSteps => "run_steps",
            EntityType::ListNodes => "list_nodes",
            EntityType::MetadataFields => "metadata_fields",
            EntityType::Phases => "phases",
            EntityType::Transitions => "transitions",
            EntityType::WorkspaceUsers => "workspace_users",
            EntityType::Users => "users",
            EntityType::WorkItemRoots => "work_item_roots",
            EntityType::Epics => "epics",
            EntityType::Sprints => "sprints",
            EntityType::Fields => "fields",
            EntityType::Metaphases => "metaphases",
            EntityType::WorkspaceRoles => "workspace_roles",
            EntityType::Tests => "tests",
            EntityType::Tasks => "tasks",
            EntityType::UserTag => "user_tag",
            EntityType::Comments => "comments",
            EntityType::Programs => "programs",
            EntityType::QualityStories => "quality_stories",
            EntityType::Milestones => "milestones",
            EntityType::ApplicationModules => "application_modules",
        }
    }

    /// The URL path segment under the workspace.
    pub fn path(self) -> &'static str {
        match self {
            EntityType::TestManual => "manual_tests",
            EntityType::Fields => "metadata/fields",
            EntityType::UserTag => "user_tags",
            other => other.name(),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| ApiError::UnknownEntityType(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renamed_paths() {
        assert_eq!(EntityType::TestManual.path(), "manual_tests");
        assert_eq!(EntityType::UserTag.path(), "user_tags");
        assert_eq!(EntityType::Fields.path(), "metadata/fields");
        assert_eq!(EntityType::Stories.path(), "stories");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("defects".parse::<EntityType>().unwrap(), EntityType::Defects);
        assert_eq!("test_manual".parse::<EntityType>().unwrap(), EntityType::TestManual);
        // path segments are not logical names
        assert!("manual_tests".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = EntityType::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EntityType::ALL.len());
        assert_eq!(EntityType::ALL.len(), 30);
    }
}
