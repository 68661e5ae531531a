pub mod compose;
pub mod guard;
pub mod settings;
pub mod tracker;

pub use compose::{compose, SectionKey, SectionUnit};
pub use guard::GuardDecision;
pub use settings::{SectionSettingsResolver, SettingsSource, SettingsState};
pub use tracker::{ActiveSectionTracker, IntersectionEntry};
