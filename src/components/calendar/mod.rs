pub mod bucket;
pub mod controller;
pub mod models;
pub mod presenter;
pub mod query;
pub mod selection;
pub mod store;

pub use bucket::{bucket, DayBucket};
pub use controller::CalendarController;
pub use models::{Category, Event, EventDraft, Priority};
pub use presenter::{present, EventView};
pub use query::{ActivityLevel, CalendarStats};
pub use selection::{Selection, SelectionController};
pub use store::{EventStore, LoadOutcome, LoadTicket};
