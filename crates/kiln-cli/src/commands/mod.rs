//! Command implementations for kiln

mod behavior;
mod export;

pub use behavior::Behavior;
pub use export::Export;
