//! Book storage adapters

pub mod fs_repository;

#[cfg(test)]
mod pipeline_tests;
