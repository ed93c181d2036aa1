//! Studio API integration tests
//!
//! Drive the composed router end to end with the mock text and image backends.

#![allow(dead_code)]

mod common;
mod studio;
