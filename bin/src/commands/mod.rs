//! CLI command implementations.

pub(crate) mod archive;
pub(crate) mod query;
