//! Unit tests for the delivery module
