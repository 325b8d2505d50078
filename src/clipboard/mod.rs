pub mod paste;
pub mod store;

pub use store::{Clipboard, WeekOffset};
