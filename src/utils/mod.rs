//! 工具模块

pub mod merge;

pub use merge::{deep_merge, merge_typed};
