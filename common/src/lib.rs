//! Ambient helpers shared by the session workspace: logger bootstrap,
//! trace ids and span constructors.

pub mod logger;
