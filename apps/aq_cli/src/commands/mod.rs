// apps/aq_cli/src/commands/mod.rs

//! 子命令

pub mod compute;
pub mod info;
pub mod protocol;
pub mod validate;
