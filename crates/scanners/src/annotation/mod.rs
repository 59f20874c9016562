//! Annotation state: ignore list, overlay construction and the
//! reuse/rebuild machine that keeps them in step with the document.

pub mod ignore;
pub mod overlay;
pub mod state;

pub use ignore::{IgnoreEntry, IgnoreList};
pub use overlay::{Overlay, OverlayVersion, PointMarker, RangeDecoration};
pub use state::{AnnotationState, ApplyOutcome, Generation, Phase};
