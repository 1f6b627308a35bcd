pub mod chronology;
pub mod record;
pub mod text;

pub use chronology::{Chronology, PersonDetails, TimelineStats};
pub use record::{Interval, RecordKind, TimeRecord};
pub use text::{Lang, LocalizedText};
