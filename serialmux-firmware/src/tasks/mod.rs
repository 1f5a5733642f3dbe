//! Embassy async tasks
//!
//! The receive task produces into the ring, the console task consumes it.

pub mod console;
pub mod rx;

pub use console::{console_task, BoardConsole, BoardController};
pub use rx::rx_task;
