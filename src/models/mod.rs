//! 数据模型模块
//!
//! 定义事件、用户画像库和安全分类的核心数据结构。

pub mod event;
pub mod safety;
pub mod vault;

pub use event::{Event, EventKind};
pub use safety::{GuardianLevel, GuardianResult, SafetyClassification};
pub use vault::{UserVault, VaultProfile, VaultTraits};
