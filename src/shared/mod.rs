pub mod error;
pub mod fs_guard;
pub mod result;

pub use result::Result;
