//! Integration tests against a running server

pub mod collab_test;
