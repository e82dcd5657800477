//! Test doubles: a scripted driver and row builders.

pub mod mock;
pub mod test_helpers;

pub use mock::{MOCK_CODES, MockCursor, MockDriver, Scripted};
pub use test_helpers::{create_result_set, create_test_row};
