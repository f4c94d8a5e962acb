//! Where the console gets its data from
//!
//! The console talks to the backend only through [`CommandSource`], so the
//! polling and scheduling logic can run against the mock API or a stub.

mod mock;
#[cfg(test)]
pub mod stub;
mod traits;

pub use traits::CommandSource;
