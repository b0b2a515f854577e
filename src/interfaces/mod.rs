//! User-facing interfaces over the link services.

pub mod cli;
