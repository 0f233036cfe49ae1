//! HTTP request handlers.

pub(crate) mod changes;
