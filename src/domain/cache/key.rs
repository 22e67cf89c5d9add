//! Cache key scheme for resource reads
//!
//! Point reads live at `{resource}:{id}`, list reads at
//! `{resource}:list:{limit}:{offset}`. A write clears the whole list family
//! with the glob `{resource}:list:*`; a delete also clears every key of the
//! kinds its row cascades to, with `{resource}:*`.

use std::fmt;

use crate::domain::pagination::Page;

/// Kinds of cacheable resources, each owning a distinct key prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Workout,
    Exercise,
    WorkoutExercise,
    WorkoutSession,
    Program,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        Self::User,
        Self::Workout,
        Self::Exercise,
        Self::WorkoutExercise,
        Self::WorkoutSession,
        Self::Program,
    ];

    /// Key prefix for this resource kind
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Workout => "workout",
            Self::Exercise => "exercise",
            Self::WorkoutExercise => "workout_exercise",
            Self::WorkoutSession => "workout_session",
            Self::Program => "program",
        }
    }

    /// Kinds whose rows the schema removes or rewrites when a row of this
    /// kind is deleted
    ///
    /// Follows `ON DELETE CASCADE` transitively and `ON DELETE SET NULL` one
    /// level: deleting a user cascades to its workouts, which cascade to their
    /// workout exercises.
    pub fn cascades_to(&self) -> &'static [ResourceKind] {
        match self {
            Self::User => &[
                Self::Workout,
                Self::WorkoutExercise,
                Self::WorkoutSession,
                Self::Program,
            ],
            Self::Workout => &[Self::WorkoutExercise, Self::WorkoutSession],
            Self::Exercise => &[Self::WorkoutExercise],
            Self::Program => &[Self::Workout],
            Self::WorkoutExercise | Self::WorkoutSession => &[],
        }
    }

    /// Human readable name used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Workout => "Workout",
            Self::Exercise => "Exercise",
            Self::WorkoutExercise => "Workout exercise",
            Self::WorkoutSession => "Workout session",
            Self::Program => "Program",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Builds cache keys for one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    kind: ResourceKind,
}

impl CacheKey {
    pub fn new(kind: ResourceKind) -> Self {
        Self { kind }
    }

    /// `{resource}:{id}`
    pub fn point(&self, id: impl fmt::Display) -> String {
        format!("{}:{}", self.kind.prefix(), id)
    }

    /// `{resource}:list:{limit}:{offset}`
    pub fn list(&self, page: Page) -> String {
        format!(
            "{}:list:{}:{}",
            self.kind.prefix(),
            page.limit(),
            page.offset()
        )
    }

    /// Glob matching every list key of this resource kind
    pub fn list_pattern(&self) -> String {
        format!("{}:list:*", self.kind.prefix())
    }

    /// Glob matching every point and list key of this resource kind
    pub fn all_pattern(&self) -> String {
        format!("{}:*", self.kind.prefix())
    }
}

/// Translates a cache glob into an anchored regex; `*` is the only wildcard
pub fn glob_to_regex(pattern: &str) -> String {
    let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
    format!("^{}$", escaped.join(".*"))
}
