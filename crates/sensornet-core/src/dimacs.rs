//! Export of the offloading problem as a DIMACS min-cost flow instance.
//!
//! Node 0 is a synthetic source that supplies every overflow packet and node `N + 1` is a
//! synthetic sink that absorbs them. Sensor nodes keep their own IDs.

use std::{fmt::Write, fs, path::Path};

use rayon::prelude::*;

use crate::{
    network::{Network, NodeId},
    units::MicroJoules,
};

/// Formats `network` as a DIMACS min-cost flow problem.
///
/// Every data node gets an arc to every storage node it can reach, priced at the cost of the
/// cheapest path between them. Pairs without a path get no arc.
pub fn write_min_cost_flow(network: &Network) -> String {
    let sink = network.nr_nodes() + 1;
    let supply = network.total_supply();
    let demand = -i128::from(supply);

    let source_arcs = network
        .data_nodes()
        .filter_map(|n| Some((0, n.id().inner(), n.as_data()?.overflow_packets(), 0)))
        .collect::<Vec<_>>();
    let pair_arcs = pair_costs(network)
        .into_iter()
        .filter_map(|(dn, sn, cost)| {
            let capacity = network.node(dn)?.as_data()?.overflow_packets();
            Some((dn.inner(), sn.inner(), capacity, cost?.into_u64()))
        })
        .collect::<Vec<_>>();
    let sink_arcs = network
        .storage_nodes()
        .filter_map(|n| Some((n.id().inner(), sink, n.as_storage()?.capacity(), 0)))
        .collect::<Vec<_>>();
    let nr_arcs = source_arcs.len() + pair_arcs.len() + sink_arcs.len();
    log::debug!(
        "DIMACS export: {} of {} data/storage pairs are reachable",
        pair_arcs.len(),
        network.data_ids().len() * network.storage_ids().len()
    );

    let mut s = String::new();
    let nr_vertices = network.nr_nodes() + 2;
    writeln!(
        s,
        "c Min-Cost flow problem with {nr_vertices} nodes and {nr_arcs} arcs (edges)"
    )
    .unwrap();
    writeln!(s, "p min {nr_vertices} {nr_arcs}").unwrap();
    writeln!(s, "c Supply of {supply} at node 0 (\"Source\")").unwrap();
    writeln!(s, "n 0 {supply}").unwrap();
    writeln!(s, "c Demand of {demand} at node {sink} (\"Sink\")").unwrap();
    writeln!(s, "n {sink} {demand}").unwrap();
    writeln!(s, "c arc list follows").unwrap();
    writeln!(s, "c arc has <tail> <head> <capacity l.b.> <capacity u.b> <cost>").unwrap();
    for (tail, head, capacity, cost) in source_arcs.into_iter().chain(pair_arcs).chain(sink_arcs) {
        writeln!(s, "a {tail} {head} 0 {capacity} {cost}").unwrap();
    }
    s
}

/// Writes the DIMACS export of `network` to `path`.
pub fn save(network: &Network, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    fs::write(path, write_min_cost_flow(network))?;
    log::info!("Saved DIMACS min-cost flow problem to {}", path.display());
    Ok(())
}

/// The cost of the cheapest path between every data node and every storage node, in data-node
/// then storage-node order. Unreachable pairs are `None`.
pub fn pair_costs(network: &Network) -> Vec<(NodeId, NodeId, Option<MicroJoules>)> {
    network
        .data_ids()
        .par_iter()
        .flat_map_iter(|&dn| {
            network
                .storage_ids()
                .iter()
                .map(move |&sn| (dn, sn, network.min_cost(dn, sn)))
        })
        .collect()
}
