pub mod attendance;
pub mod interval;
pub mod slot;
