//! tikdl library
//!
//! URL checks, the scripted "download" pipeline and run orchestration for
//! the tikdl CLI. Nothing here touches the network.

pub mod core;
pub mod error;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;
