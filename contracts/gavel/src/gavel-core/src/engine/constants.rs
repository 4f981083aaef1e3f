//! Fixed addresses of the built-in strategy logics.

use alloy_primitives::{address, Address};

pub const RELATIVE_QUORUM_LOGIC: Address = address!("0000000000000000000000000000000000005201");
pub const ABSOLUTE_QUORUM_LOGIC: Address = address!("0000000000000000000000000000000000005202");
