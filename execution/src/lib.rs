pub mod tower;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod layer;

mod state;

pub use layer::{GameStart, Layer};
pub use state::{current_day, Memory, State, Status};
