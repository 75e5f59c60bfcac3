//! CLI command implementations.

pub(crate) mod serve;
pub(crate) mod validate;

pub(crate) use serve::ServeArgs;
pub(crate) use validate::ValidateArgs;
