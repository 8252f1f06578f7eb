//! Shared fixtures for the MSGit embedding integration tests.

pub mod fixtures;
