//! Command storage for the mock backend
//!
//! This module handles:
//! - Holding the device catalog and every command per device
//! - Allocating command identifiers
//! - Deciding each command's outcome once, at creation
//! - Advancing stored commands through their lifecycle on read

mod random;
mod store;

pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use store::{CommandStore, SEED_DEVICE_IDS};
