//! Tulcea Guide library exports

pub mod backend;
pub mod cli;
pub mod core;
pub mod directory;

#[cfg(test)]
pub mod test_support;
