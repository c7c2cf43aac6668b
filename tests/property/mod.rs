//! Property-based tests

pub mod document_proptest;
