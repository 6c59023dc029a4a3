#[path = "trait.rs"]
mod trait_;
mod memory;


pub use memory::InMemoryUserDirectory;
pub use trait_::UserDirectory;
