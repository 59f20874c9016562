use crate::annotation::ignore::IgnoreList;
use crate::core::{Issue, SeverityTable};
use serde::Serialize;
use std::fmt;

/// Token identifying one built overlay. Reusing an overlay keeps its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct OverlayVersion(u64);

impl OverlayVersion {
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OverlayVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeDecoration {
    pub from: usize,
    pub to: usize,
    pub style_class: String,
}

/// Clickable marker placed at the start of an issue range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMarker {
    pub position: usize,
    pub style_class: String,
    pub issue: Issue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    version: OverlayVersion,
    ranges: Vec<RangeDecoration>,
    markers: Vec<PointMarker>,
}

impl Overlay {
    /// Decorate every issue not on the ignore list, in issue order.
    pub fn build(
        version: OverlayVersion,
        issues: &[Issue],
        ignore: &IgnoreList,
        severities: &SeverityTable,
    ) -> Self {
        let mut ranges = Vec::with_capacity(issues.len());
        let mut markers = Vec::with_capacity(issues.len());

        for issue in issues.iter().filter(|issue| !ignore.contains(issue)) {
            // Issues reaching the overlay have passed the geometry filter.
            let (from, to) = (issue.from.max(0) as usize, issue.to.max(0) as usize);
            let style_class = severities.style_class(&issue.severity);
            ranges.push(RangeDecoration {
                from,
                to,
                style_class: style_class.clone(),
            });
            markers.push(PointMarker {
                position: from,
                style_class,
                issue: issue.clone(),
            });
        }

        Self {
            version,
            ranges,
            markers,
        }
    }

    pub fn version(&self) -> OverlayVersion {
        self.version
    }

    pub fn ranges(&self) -> &[RangeDecoration] {
        &self.ranges
    }

    pub fn markers(&self) -> &[PointMarker] {
        &self.markers
    }

    pub fn visible_issues(&self) -> impl Iterator<Item = &Issue> {
        self.markers.iter().map(|marker| &marker.issue)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
