//! Core task implementations.

mod delay;
mod emit_event;
mod set_data;
mod transform;

pub use delay::DelayTask;
pub use emit_event::EmitEventTask;
pub use set_data::SetDataTask;
pub use transform::TransformTask;
