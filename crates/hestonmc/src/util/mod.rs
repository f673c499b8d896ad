pub mod format;
pub mod io;

pub use format::{format_count, format_dollars};
pub use io::atomic_write;
