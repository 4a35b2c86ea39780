//! CLI command implementations

pub(crate) mod common;
pub(crate) mod info;
pub(crate) mod migrate;
pub(crate) mod parse;
pub(crate) mod validate;
