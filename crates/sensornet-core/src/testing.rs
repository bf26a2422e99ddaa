use crate::network::types::{NodeId, NodeKind, Point, SensorNode};
use crate::network::{Network, Placement};
use crate::params::NetworkParams;
use crate::units::MicroJoules;

pub(crate) const RANGE: f64 = 10.0;
pub(crate) const BATTERY: MicroJoules = MicroJoules::new(1_000_000);

pub(crate) fn data_node(id: usize, x: f64, y: f64) -> SensorNode {
    SensorNode::new_data(
        NodeId::new(id),
        format!("DN{id:02}"),
        Point::new(x, y),
        RANGE,
        BATTERY,
        5,
    )
}

pub(crate) fn storage_node(id: usize, x: f64, y: f64) -> SensorNode {
    SensorNode::new_storage(
        NodeId::new(id),
        format!("SN{id:02}"),
        Point::new(x, y),
        RANGE,
        BATTERY,
        4,
    )
}

/// Parameters for a 100m x 100m field with `nr_nodes` nodes, `nr_data_nodes` of which hold 5
/// packets; storage nodes hold 4.
pub(crate) fn params(nr_nodes: usize, nr_data_nodes: usize) -> NetworkParams {
    NetworkParams::builder()
        .width(100.0)
        .length(100.0)
        .nr_nodes(nr_nodes)
        .transmission_range(RANGE)
        .nr_data_nodes(nr_data_nodes)
        .packets_per_node(5)
        .storage_capacity(4)
        .battery_capacity(BATTERY)
        .build()
}

/// A data node followed by two storage nodes, 10m apart on a line. Only neighbors on the line
/// are in range of each other.
pub(crate) fn chain_nodes() -> Vec<SensorNode> {
    vec![
        data_node(1, 0.0, 0.0),
        storage_node(2, 10.0, 0.0),
        storage_node(3, 20.0, 0.0),
    ]
}

/// A `k` x `k` grid with the given spacing. Roles alternate, starting with a data node.
pub(crate) fn grid_nodes(k: usize, spacing: f64) -> Vec<SensorNode> {
    (0..k * k)
        .map(|i| {
            let (x, y) = ((i % k) as f64 * spacing, (i / k) as f64 * spacing);
            if i % 2 == 0 {
                data_node(i + 1, x, y)
            } else {
                storage_node(i + 1, x, y)
            }
        })
        .collect()
}

pub(crate) fn placements(layout: &[(NodeKind, f64, f64)]) -> Vec<Placement> {
    layout
        .iter()
        .map(|&(kind, x, y)| Placement::new(kind, Point::new(x, y)))
        .collect()
}

/// Builds a network from explicit placements with the given range.
pub(crate) fn network(range: f64, layout: &[(NodeKind, f64, f64)]) -> Network {
    let nr_data_nodes = layout.iter().filter(|(k, ..)| *k == NodeKind::Data).count();
    let mut params = params(layout.len(), nr_data_nodes);
    params.transmission_range = range;
    Network::from_placements(params, &placements(layout)).expect("invalid test network")
}

/// The line `DN01 - SN01 - SN02` with 10m hops.
pub(crate) fn chain_network() -> Network {
    network(
        RANGE,
        &[
            (NodeKind::Data, 0.0, 0.0),
            (NodeKind::Storage, 10.0, 0.0),
            (NodeKind::Storage, 20.0, 0.0),
        ],
    )
}
