//! # mac-cleanup
//!
//! Reclaims disk space on macOS in a single privileged pass.
//!
//! - **One prompt**: administrator rights are requested once and kept alive
//!   in the background until the sweep ends, however it ends
//! - **Idempotent targets**: system and user caches, logs, trash, IDE and SDK
//!   caches, each gated on the tool or directory it belongs to
//! - **Native tool cleanup**: Homebrew, Docker, npm, Yarn, pnpm, CocoaPods,
//!   Go, Composer, Conda and friends clean up after themselves
//! - **Never stops half way**: a failing path or tool is recorded and the
//!   sweep moves on; free space is reported at the end

pub mod cli;
pub mod common;
pub mod privilege;
pub mod space;
pub mod sweeper;
pub mod tools;
