pub mod attendance;
pub mod clipboard;
pub mod slots;
