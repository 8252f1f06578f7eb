//! MSGit embedding CLI library.
//!
//! Command implementations for the `msgit-embed` binary: round-tripping a
//! container file through decode and encode, inspecting headers, and
//! verifying two files against each other.

pub mod commands;
