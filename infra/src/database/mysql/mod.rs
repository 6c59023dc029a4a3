//! MySQL implementations of core repository traits

pub mod user_directory_impl;

pub use user_directory_impl::MySqlUserDirectory;
