use std::fmt;
use std::hash::{Hash, Hasher};

use crate::energy;
use crate::units::MicroJoules;

identifier!(NodeId, usize);

/// A point in the field, in meters.
#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The two kinds of sensor in a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    Data,
    Storage,
}

impl NodeKind {
    /// The prefix used when naming nodes of this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeKind::Data => "DN",
            NodeKind::Storage => "SN",
        }
    }
}

/// A sensor node. Position, range and identity are fixed at creation; energy and packet counters
/// change as packets are sent and stored.
///
/// Two nodes are equal iff they have the same ID, regardless of where they are.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SensorNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) position: Point,
    pub(crate) range: f64,
    pub(crate) battery_capacity: MicroJoules,
    pub(crate) energy: MicroJoules,
    pub(crate) role: Role,
}

/// Role-specific state of a [`SensorNode`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Role {
    Data(DataState),
    Storage(StorageState),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DataState {
    overflow_packets: u64,
    packets_left: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageState {
    capacity: u64,
    used_space: u64,
}

impl SensorNode {
    pub(crate) fn new_data(
        id: NodeId,
        name: String,
        position: Point,
        range: f64,
        battery_capacity: MicroJoules,
        overflow_packets: u64,
    ) -> Self {
        Self {
            id,
            name,
            position,
            range,
            battery_capacity,
            energy: battery_capacity,
            role: Role::Data(DataState {
                overflow_packets,
                packets_left: overflow_packets,
            }),
        }
    }

    pub(crate) fn new_storage(
        id: NodeId,
        name: String,
        position: Point,
        range: f64,
        battery_capacity: MicroJoules,
        capacity: u64,
    ) -> Self {
        Self {
            id,
            name,
            position,
            range,
            battery_capacity,
            energy: battery_capacity,
            role: Role::Storage(StorageState {
                capacity,
                used_space: 0,
            }),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn transmission_range(&self) -> f64 {
        self.range
    }

    pub fn kind(&self) -> NodeKind {
        match self.role {
            Role::Data(_) => NodeKind::Data,
            Role::Storage(_) => NodeKind::Storage,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_data(&self) -> bool {
        matches!(self.role, Role::Data(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self.role, Role::Storage(_))
    }

    pub fn as_data(&self) -> Option<&DataState> {
        match &self.role {
            Role::Data(state) => Some(state),
            Role::Storage(_) => None,
        }
    }

    pub fn as_storage(&self) -> Option<&StorageState> {
        match &self.role {
            Role::Storage(state) => Some(state),
            Role::Data(_) => None,
        }
    }

    pub fn distance_to(&self, other: &SensorNode) -> f64 {
        self.position.distance_to(&other.position)
    }

    /// Returns true if the two nodes can hear each other. The tolerance absorbs rounding at
    /// distances exactly on the boundary.
    pub fn in_range_of(&self, other: &SensorNode) -> bool {
        self.distance_to(other) <= self.range.min(other.range) + energy::RANGE_TOLERANCE
    }

    pub fn battery_capacity(&self) -> MicroJoules {
        self.battery_capacity
    }

    pub fn energy(&self) -> MicroJoules {
        self.energy
    }

    pub fn has_energy(&self) -> bool {
        self.energy > MicroJoules::ZERO
    }

    /// Sets a new battery capacity and recharges the node to it.
    pub fn set_battery_capacity(&mut self, capacity: MicroJoules) {
        self.battery_capacity = capacity;
        self.reset_energy();
    }

    pub fn reset_energy(&mut self) {
        self.energy = self.battery_capacity;
    }

    /// Returns true if this node has enough energy to send one packet to `receiver`.
    pub fn can_transmit(&self, receiver: &SensorNode) -> bool {
        energy::transmission_cost(self, receiver, 1) <= self.energy
    }

    /// Returns true if this node has enough energy to receive one packet.
    pub fn can_receive(&self) -> bool {
        energy::receiving_cost(1) <= self.energy
    }

    /// Packets this node still has to offload. Zero for storage nodes.
    pub fn packets_left(&self) -> u64 {
        self.as_data().map_or(0, |d| d.packets_left)
    }

    /// Packets this node can still absorb. Zero for data nodes.
    pub fn space_left(&self) -> u64 {
        self.as_storage().map_or(0, |s| s.space_left())
    }

    pub(crate) fn remove_packets(&mut self, packets: u64) -> Result<(), PacketError> {
        match &mut self.role {
            Role::Data(state) => state.remove_packets(packets).map_err(|(left, total)| {
                PacketError::Remove {
                    node: self.name.clone(),
                    requested: packets,
                    left,
                    total,
                }
            }),
            Role::Storage(_) => Err(PacketError::WrongKind {
                node: self.name.clone(),
                expected: NodeKind::Data,
            }),
        }
    }

    pub(crate) fn store_packets(&mut self, packets: u64) -> Result<(), PacketError> {
        match &mut self.role {
            Role::Storage(state) => state.store_packets(packets).map_err(|(used, capacity)| {
                PacketError::Store {
                    node: self.name.clone(),
                    requested: packets,
                    used,
                    capacity,
                }
            }),
            Role::Data(_) => Err(PacketError::WrongKind {
                node: self.name.clone(),
                expected: NodeKind::Storage,
            }),
        }
    }

    pub(crate) fn reset_packets(&mut self) {
        match &mut self.role {
            Role::Data(state) => state.reset_packets(),
            Role::Storage(state) => state.reset_packets(),
        }
    }

    pub(crate) fn set_overflow_packets(&mut self, packets: u64) {
        if let Role::Data(state) = &mut self.role {
            state.set_overflow_packets(packets);
        }
    }

    pub(crate) fn set_capacity(&mut self, capacity: u64) {
        if let Role::Storage(state) = &mut self.role {
            state.set_capacity(capacity);
        }
    }
}

impl PartialEq for SensorNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SensorNode {}

impl Hash for SensorNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SensorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<14}({:.6}, {:.6}) [{}]",
            self.name, self.position.x, self.position.y, self.id
        )
    }
}

impl DataState {
    pub fn overflow_packets(&self) -> u64 {
        self.overflow_packets
    }

    pub fn packets_left(&self) -> u64 {
        self.packets_left
    }

    pub fn is_empty(&self) -> bool {
        self.packets_left == 0
    }

    pub fn can_remove_packets(&self, packets: u64) -> bool {
        packets <= self.packets_left
    }

    // On failure, returns the packets left and the overflow total.
    fn remove_packets(&mut self, packets: u64) -> Result<(), (u64, u64)> {
        if !self.can_remove_packets(packets) {
            return Err((self.packets_left, self.overflow_packets));
        }
        self.packets_left -= packets;
        Ok(())
    }

    fn reset_packets(&mut self) {
        self.packets_left = self.overflow_packets;
    }

    fn set_overflow_packets(&mut self, packets: u64) {
        self.overflow_packets = packets;
        self.packets_left = packets;
    }
}

impl StorageState {
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn used_space(&self) -> u64 {
        self.used_space
    }

    pub fn space_left(&self) -> u64 {
        self.capacity - self.used_space
    }

    pub fn is_full(&self) -> bool {
        self.used_space >= self.capacity
    }

    pub fn can_store(&self, packets: u64) -> bool {
        packets <= self.space_left()
    }

    // On failure, returns the used space and the capacity.
    fn store_packets(&mut self, packets: u64) -> Result<(), (u64, u64)> {
        if !self.can_store(packets) {
            return Err((self.used_space, self.capacity));
        }
        self.used_space += packets;
        Ok(())
    }

    fn reset_packets(&mut self) {
        self.used_space = 0;
    }

    fn set_capacity(&mut self, capacity: u64) {
        self.capacity = capacity;
        self.used_space = 0;
    }
}

/// Hands out IDs and role-prefixed names for the nodes of a single network.
#[derive(Debug, Clone)]
pub(crate) struct NodeSequence {
    next_id: NodeId,
    next_data: usize,
    next_storage: usize,
}

impl NodeSequence {
    pub(crate) fn new() -> Self {
        Self {
            next_id: NodeId::FIRST,
            next_data: 1,
            next_storage: 1,
        }
    }

    /// Returns the next ID and a name for a node of the given kind.
    pub(crate) fn next(&mut self, kind: NodeKind) -> (NodeId, String) {
        let id = self.next_id;
        self.next_id = id.next();
        let counter = match kind {
            NodeKind::Data => &mut self.next_data,
            NodeKind::Storage => &mut self.next_storage,
        };
        let name = format!("{}{:02}", kind.prefix(), *counter);
        *counter += 1;
        (id, name)
    }
}

/// Errors from offloading or storing packets at a single node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    #[error("{node} cannot remove {requested} packets ({left}/{total} left)")]
    Remove {
        node: String,
        requested: u64,
        left: u64,
        total: u64,
    },

    #[error("{node} cannot store {requested} packets ({used}/{capacity} full)")]
    Store {
        node: String,
        requested: u64,
        used: u64,
        capacity: u64,
    },

    #[error("{node} is not a {expected:?} node")]
    WrongKind { node: String, expected: NodeKind },
}
