//! The first-order radio energy model. All costs are reported in integer micro-joules.
//!
//! This is the only place geometry enters the cost model: every downstream algorithm treats
//! cost as a function of (sender, receiver, packet count).

use crate::network::types::SensorNode;
use crate::units::MicroJoules;

/// Bits in one data packet.
pub const BITS_PER_PACKET: u64 = 3200;

/// Energy spent by the radio electronics per bit, in joules.
pub const E_ELEC: f64 = 100e-9;

/// Energy spent by the transmit amplifier per bit per square meter, in joules.
pub const E_AMP: f64 = 100e-12;

/// Slack added to the range test so that nodes exactly on the boundary stay adjacent.
pub const RANGE_TOLERANCE: f64 = 1e-4;

const MICRO: f64 = 1e6;

fn to_micro_joules(joules: f64) -> MicroJoules {
    MicroJoules::new((joules * MICRO).round() as u64)
}

/// The energy `from` spends transmitting `packets` packets to `to`.
pub fn transmission_cost(from: &SensorNode, to: &SensorNode, packets: u64) -> MicroJoules {
    let bits = (packets * BITS_PER_PACKET) as f64;
    let distance = from.distance_to(to);
    to_micro_joules(bits * (E_ELEC + E_AMP * distance.powi(2)))
}

/// The energy any node spends receiving `packets` packets.
pub fn receiving_cost(packets: u64) -> MicroJoules {
    let bits = (packets * BITS_PER_PACKET) as f64;
    to_micro_joules(bits * E_ELEC)
}

/// The cost of moving a single packet over one hop, paid by both ends.
pub fn hop_cost(from: &SensorNode, to: &SensorNode) -> MicroJoules {
    transmission_cost(from, to, 1) + receiving_cost(1)
}
