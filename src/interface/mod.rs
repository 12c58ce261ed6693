//! Seams toward external collaborators (navigation, physics, presentation)

pub mod navigation;
pub mod presentation;
pub mod spatial;

pub use navigation::{FixedSpeedNav, Navigation, NullNavigation};
pub use presentation::{AnimationCue, AudioCue, NullPresentation, Presentation, RecordingPresentation};
pub use spatial::{OpenField, SpatialQuery, WallGrid};
