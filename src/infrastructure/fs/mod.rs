//! File System Infrastructure

mod local;
mod scanner;

pub use local::LocalFs;
pub use scanner::DirectoryScanner;
