//! Integration tests: the real gateway against a wiremock backend

mod auth_tests;
mod common;
