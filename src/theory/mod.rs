pub mod interval;
pub mod pitch;
pub mod scale;
