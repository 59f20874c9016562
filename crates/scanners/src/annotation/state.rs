//! Single-writer annotation state.
//!
//! Owns the current issue list, the overlay built from it, and the ignore
//! list. Every recomputation takes a [`Generation`]; results carrying an
//! older generation than the latest one handed out are discarded, so
//! overlay updates land in mutation order even when scans finish out of
//! order.

use crate::annotation::ignore::{IgnoreEntry, IgnoreList};
use crate::annotation::overlay::{Overlay, OverlayVersion};
use crate::core::{Issue, SeverityTable};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stable,
    Recomputing { generation: Generation },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(OverlayVersion),
    Stale,
}

#[derive(Debug)]
pub struct AnnotationState {
    issues: Vec<Issue>,
    overlay: Overlay,
    ignore: IgnoreList,
    severities: SeverityTable,
    latest: Generation,
    phase: Phase,
}

impl AnnotationState {
    pub fn new(severities: SeverityTable) -> Self {
        Self {
            issues: Vec::new(),
            overlay: Overlay::default(),
            ignore: IgnoreList::new(),
            severities,
            latest: Generation::default(),
            phase: Phase::Stable,
        }
    }

    /// Install a previously saved ignore list.
    pub fn set_ignore_list(&mut self, ignore: IgnoreList) -> OverlayVersion {
        self.ignore = ignore;
        self.rebuild()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn overlay_version(&self) -> OverlayVersion {
        self.overlay.version()
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }

    pub fn severities(&self) -> &SeverityTable {
        &self.severities
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ignored(&self, issue: &Issue) -> bool {
        self.ignore.contains(issue)
    }

    /// Start a recomputation. Any generation handed out earlier becomes stale.
    pub fn begin_recompute(&mut self) -> Generation {
        self.latest = Generation(self.latest.0 + 1);
        self.phase = Phase::Recomputing {
            generation: self.latest,
        };
        self.latest
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest
    }

    /// Install the issues of a finished recomputation, unless a newer one
    /// has started since.
    pub fn apply(&mut self, generation: Generation, issues: Vec<Issue>) -> ApplyOutcome {
        if !self.is_current(generation) {
            debug!(
                generation = generation.get(),
                latest = self.latest.get(),
                "Discarding stale scan results"
            );
            return ApplyOutcome::Stale;
        }
        self.issues = issues;
        self.phase = Phase::Stable;
        ApplyOutcome::Applied(self.rebuild())
    }

    /// Replace the issue list outright, superseding any recomputation in
    /// flight.
    pub fn replace_issues(&mut self, issues: Vec<Issue>) -> OverlayVersion {
        let generation = self.begin_recompute();
        match self.apply(generation, issues) {
            ApplyOutcome::Applied(version) => version,
            ApplyOutcome::Stale => self.overlay_version(),
        }
    }

    pub fn dismiss(&mut self, issue: &Issue) -> OverlayVersion {
        self.ignore.push(IgnoreEntry::from(issue));
        self.rebuild()
    }

    pub fn clear_ignored(&mut self) -> OverlayVersion {
        self.ignore.clear();
        self.rebuild()
    }

    fn rebuild(&mut self) -> OverlayVersion {
        let version = self.overlay.version().next();
        self.overlay = Overlay::build(version, &self.issues, &self.ignore, &self.severities);
        version
    }
}

impl Default for AnnotationState {
    fn default() -> Self {
        Self::new(SeverityTable::default())
    }
}
