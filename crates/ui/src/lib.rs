pub mod render;
pub mod state;
pub mod vm;

pub use state::{ViewError, ViewState, view_state_from_result};
