pub(crate) mod error;
pub(crate) mod event;
pub(crate) mod field;
mod parse;

pub use error::CalendarError;
pub use event::{Event, EventClass};
pub use field::Field;
