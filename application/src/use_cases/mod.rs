//! Use cases for the application layer
//!
//! - [`generate_script`]: the ten-page story script
//! - [`illustrate_book`]: style-anchored page illustrations
//! - [`generate_book`]: the full pipeline, ending with a persisted book

pub mod errors;
pub mod generate_book;
pub mod generate_script;
pub mod illustrate_book;

#[cfg(test)]
pub(crate) mod test_support;
