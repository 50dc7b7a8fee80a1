//! Integration test entry point

mod api_tests;
