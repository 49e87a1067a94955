//! Utility functions shared by the binaries.

pub mod bootstrap;
