//! Reading and writing networks in the `.sn` and JSON formats.

pub use sensornet_utils::*;
