//! Core logic: URL checks, the scripted pipeline and run orchestration

pub mod events;
pub mod pipeline;
pub mod session;
pub mod synth;
pub mod validator;
