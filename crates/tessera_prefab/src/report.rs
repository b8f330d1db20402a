//! Summary of a prefab update.

use std::fmt;
use std::sync::Arc;

/// What a propagating [`update_prefab`](crate::PrefabSystem::update_prefab)
/// did to existing instances.
///
/// A non-propagating update always yields an empty report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Components destroyed because their type left the template.
    pub removed: usize,
    /// Individual fields overwritten with new template values.
    pub updated_fields: usize,
    /// Components created because their type joined the template.
    pub created: usize,
    /// Component types skipped because no store is registered for them.
    pub skipped_types: Vec<Arc<str>>,
    /// Per-instance writes or creations that failed and were skipped.
    pub failures: usize,
}

impl PropagationReport {
    /// Returns true if no instance was changed.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.removed == 0 && self.updated_fields == 0 && self.created == 0
    }
}

impl fmt::Display for PropagationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} removed, {} fields updated, {} created",
            self.removed, self.updated_fields, self.created
        )?;
        if !self.skipped_types.is_empty() {
            write!(f, ", {} types skipped", self.skipped_types.len())?;
        }
        if self.failures > 0 {
            write!(f, ", {} failures", self.failures)?;
        }
        Ok(())
    }
}
