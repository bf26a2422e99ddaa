//! Core sensor network data structures, traits, and routines. The most common entry point is
//! [`Network::generate_connected`], which places nodes at random until every node can reach
//! every other.

pub use sensornet_core::*;
