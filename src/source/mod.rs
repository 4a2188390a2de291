mod acquire;
pub use acquire::*;

mod file_entry;
pub use file_entry::*;

mod filter;
pub use filter::*;

mod walker;
pub use walker::*;
