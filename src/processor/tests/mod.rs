//! Integration tests for the processor module
//!
//! Tests the complete processing pipeline against measurement files written
//! to temporary directories.
