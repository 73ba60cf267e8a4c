mod build_tests;
mod common;
mod release_tests;
