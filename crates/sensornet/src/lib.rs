//! `sensornet` models a field of wireless sensors in which data nodes hold overflow packets that
//! must be offloaded to storage nodes. Given the field's parameters, it builds a network, prices
//! every transfer with a first-order radio energy model, and decides whether the overflow can be
//! stored within the storage and battery budgets.

#![warn(unreachable_pub, missing_docs)]

pub mod core;
pub mod utils;

pub mod impls;
