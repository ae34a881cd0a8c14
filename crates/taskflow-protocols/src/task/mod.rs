//! Task protocol definitions.
//!
//! A task is one pluggable workflow operation. The registry and the runner
//! only ever talk to tasks through the [`Task`] trait.

mod definition;
mod display;
mod output;
mod schema;
mod traits;
mod validation;

pub use definition::*;
pub use display::*;
pub use output::*;
pub use schema::*;
pub use traits::*;
pub use validation::*;
