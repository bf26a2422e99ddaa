//! Utilities for reading and writing sensor networks.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

use std::fmt::Write;
use std::path::{Path, PathBuf};

use sensornet_core::{
    units::MicroJoules, Network, NetworkParams, NodeKind, ParamsError, Placement, Point,
};

/// Reads a [`Network`] from a file in `.sn` or JSON format. The format is picked by extension.
pub fn read_network(path: impl AsRef<Path>) -> Result<Network, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let network = match path.extension().and_then(|ext| ext.to_str()) {
        Some("sn") => parse_network(&contents)?,
        Some("json") => {
            let spec: NetworkSpec = serde_json::from_str(&contents)?;
            Network::from_placements(spec.params, &spec.placements)?
        }
        _ => return Err(Error::UnknownFileType(path.into())),
    };
    log::info!(
        "Read {} nodes ({} data) from {}",
        network.nr_nodes(),
        network.data_ids().len(),
        path.display()
    );
    Ok(network)
}

/// Writes a [`Network`] to a file in `.sn` or JSON format. The format is picked by extension.
pub fn write_network(network: &Network, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("sn") => format_network(network),
        Some("json") => serde_json::to_string_pretty(&NetworkSpec::from(network))?,
        _ => return Err(Error::UnknownFileType(path.into())),
    };
    std::fs::write(path, contents)?;
    log::info!("Saved sensor network to {}", path.display());
    Ok(())
}

/// Reads [`NetworkParams`] from a JSON file.
pub fn read_params(path: impl AsRef<Path>) -> Result<NetworkParams, Error> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let params: NetworkParams = serde_json::from_str(&contents)?;
    params.validate()?;
    Ok(params)
}

/// A network's parameters and node placements. This is the JSON form of a network.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct NetworkSpec {
    /// Parameters.
    pub params: NetworkParams,
    /// Placements, in node order.
    pub placements: Vec<Placement>,
}

impl From<&Network> for NetworkSpec {
    fn from(network: &Network) -> Self {
        Self {
            params: network.params().clone(),
            placements: network.placements(),
        }
    }
}

/// Formats a network in the `.sn` format:
///
/// ```text
/// width length transmission_range
/// packets_per_node storage_capacity
/// nr_nodes battery_capacity
/// (d|s) x y
/// ...
/// ```
///
/// Reals use the shortest representation that parses back to the same value.
pub fn format_network(network: &Network) -> String {
    let params = network.params();
    let mut s = String::new();
    writeln!(
        s,
        "{} {} {}",
        params.width, params.length, params.transmission_range
    )
    .unwrap();
    writeln!(s, "{} {}", params.packets_per_node, params.storage_capacity).unwrap();
    writeln!(
        s,
        "{} {}",
        network.nr_nodes(),
        params.battery_capacity.into_u64()
    )
    .unwrap();
    for node in network.nodes() {
        let role = match node.kind() {
            NodeKind::Data => 'd',
            NodeKind::Storage => 's',
        };
        writeln!(s, "{role} {} {}", node.x(), node.y()).unwrap();
    }
    s
}

/// Parses a network in the `.sn` format. See [`format_network`].
pub fn parse_network(s: &str) -> Result<Network, Error> {
    let mut lines = s.trim_end().lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut next_line = |expected| next_fields(&mut lines, expected);

    let (nr, fields) = next_line(3)?;
    let width = parse_field(nr, fields[0])?;
    let length = parse_field(nr, fields[1])?;
    let transmission_range = parse_field(nr, fields[2])?;
    let (nr, fields) = next_line(2)?;
    let packets_per_node = parse_field(nr, fields[0])?;
    let storage_capacity = parse_field(nr, fields[1])?;
    let (nr, fields) = next_line(2)?;
    let nr_nodes: usize = parse_field(nr, fields[0])?;
    let battery_capacity: u64 = parse_field(nr, fields[1])?;

    let mut placements = Vec::with_capacity(nr_nodes);
    for _ in 0..nr_nodes {
        let (nr, fields) = next_line(3)?;
        let kind = match fields[0] {
            "d" => NodeKind::Data,
            "s" => NodeKind::Storage,
            role => {
                return Err(ParseError::UnknownRole {
                    line: nr,
                    role: role.to_owned(),
                }
                .into())
            }
        };
        let x = parse_field(nr, fields[1])?;
        let y = parse_field(nr, fields[2])?;
        placements.push(Placement::new(kind, Point::new(x, y)));
    }
    if let Some((nr, _)) = lines.next() {
        return Err(ParseError::TrailingLine { line: nr }.into());
    }

    let nr_data_nodes = placements
        .iter()
        .filter(|p| p.kind == NodeKind::Data)
        .count();
    let params = NetworkParams::builder()
        .width(width)
        .length(length)
        .nr_nodes(nr_nodes)
        .transmission_range(transmission_range)
        .nr_data_nodes(nr_data_nodes)
        .packets_per_node(packets_per_node)
        .storage_capacity(storage_capacity)
        .battery_capacity(MicroJoules::new(battery_capacity))
        .build();
    Ok(Network::from_placements(params, &placements)?)
}

fn next_fields<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    expected: usize,
) -> Result<(usize, Vec<&'a str>), ParseError> {
    let (line, contents) = lines.next().ok_or(ParseError::UnexpectedEof)?;
    let fields = contents.split_whitespace().collect::<Vec<_>>();
    if fields.len() != expected {
        return Err(ParseError::WrongNrFields {
            line,
            expected,
            got: fields.len(),
        });
    }
    Ok((line, fields))
}

fn parse_field<T: std::str::FromStr>(line: usize, field: &str) -> Result<T, ParseError> {
    field.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        field: field.to_owned(),
    })
}

/// Error parsing the `.sn` format. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Incorrect number of fields.
    #[error("line {line}: wrong number of fields (expected {expected}, got {got})")]
    WrongNrFields {
        /// Line number.
        line: usize,
        /// Expected number of fields.
        expected: usize,
        /// Actual number of fields.
        got: usize,
    },

    /// A field that should be a number is not.
    #[error("line {line}: invalid number {field:?}")]
    InvalidNumber {
        /// Line number.
        line: usize,
        /// The offending field.
        field: String,
    },

    /// A node line with a role other than `d` or `s`.
    #[error("line {line}: unknown role {role:?}")]
    UnknownRole {
        /// Line number.
        line: usize,
        /// The offending role.
        role: String,
    },

    /// Fewer lines than the header promises.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// More node lines than the header promises.
    #[error("line {line}: more node lines than declared")]
    TrailingLine {
        /// Line number.
        line: usize,
    },
}

/// Error kinds for network files and I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown file type.
    #[error("unknown file type: {0}")]
    UnknownFileType(PathBuf),

    /// Error parsing the `.sn` format.
    #[error("invalid .sn file")]
    Parse(#[from] ParseError),

    /// Error serializing/deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// The file describes parameters no network can be built from.
    #[error("invalid network parameters")]
    Params(#[from] ParamsError),
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use sensornet_core::NodeId;

    use super::*;

    const CHAIN: &str = "\
30 20 10
5 4
3 1000000
d 0 0
s 10 0
s 20 0.5
";

    fn random_network(seed: u64) -> anyhow::Result<Network> {
        let params = NetworkParams::builder()
            .width(50.0)
            .length(40.0)
            .nr_nodes(20)
            .transmission_range(12.5)
            .nr_data_nodes(6)
            .packets_per_node(3)
            .storage_capacity(7)
            .battery_capacity(MicroJoules::new(250_000))
            .build();
        Ok(Network::generate(params, StdRng::seed_from_u64(seed))?)
    }

    #[test]
    fn parse_chain() -> anyhow::Result<()> {
        let network = parse_network(CHAIN)?;
        assert_eq!(network.nr_nodes(), 3);
        assert_eq!(network.data_ids(), &[NodeId::new(1)]);
        assert_eq!(network.params().battery_capacity, MicroJoules::new(1_000_000));
        assert_eq!(network.params().width, 30.0);
        assert!(network.is_adjacent(NodeId::new(1), NodeId::new(2)));
        assert!(!network.is_adjacent(NodeId::new(2), NodeId::new(3)));
        assert_eq!(format_network(&network), CHAIN);
        Ok(())
    }

    #[test]
    fn round_trip_reproduces_nodes_and_adjacency() -> anyhow::Result<()> {
        for seed in 0..5 {
            let network = random_network(seed)?;
            let reparsed = parse_network(&format_network(&network))?;
            assert_eq!(reparsed.params(), network.params());
            assert_eq!(reparsed.placements(), network.placements());
            for (a, b) in network.nodes().iter().zip(reparsed.nodes()) {
                assert_eq!(a.name(), b.name());
                for c in network.nodes() {
                    assert_eq!(
                        network.is_adjacent(a.id(), c.id()),
                        reparsed.is_adjacent(b.id(), c.id())
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn file_round_trip() -> anyhow::Result<()> {
        let network = random_network(9)?;
        let dir = tempfile::tempdir()?;
        for name in ["network.sn", "network.json"] {
            let path = dir.path().join(name);
            write_network(&network, &path)?;
            let read = read_network(&path)?;
            assert_eq!(read.placements(), network.placements());
            assert_eq!(read.nr_edges(), network.nr_edges());
        }
        assert!(matches!(
            write_network(&network, dir.path().join("network.txt")),
            Err(Error::UnknownFileType(..))
        ));
        Ok(())
    }

    #[test]
    fn params_file() -> anyhow::Result<()> {
        let network = random_network(1)?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("params.json");
        std::fs::write(&path, serde_json::to_string(network.params())?)?;
        assert_eq!(&read_params(&path)?, network.params());
        Ok(())
    }

    #[test]
    fn trailing_blank_lines_are_ignored() -> anyhow::Result<()> {
        let network = parse_network(&format!("{CHAIN}\n\n"))?;
        assert_eq!(network.nr_nodes(), 3);
        Ok(())
    }

    fn parse_err(s: &str) -> ParseError {
        match parse_network(s) {
            Err(Error::Parse(e)) => e,
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_files_fail() {
        assert_eq!(
            parse_err("30 20\n5 4\n1 100\ns 0 0\n"),
            ParseError::WrongNrFields {
                line: 1,
                expected: 3,
                got: 2
            }
        );
        assert_eq!(
            parse_err("30 20 10\n5 four\n1 100\ns 0 0\n"),
            ParseError::InvalidNumber {
                line: 2,
                field: "four".to_owned()
            }
        );
        assert_eq!(
            parse_err("30 20 10\n5 4\n2 100\ns 0 0\nx 1 1\n"),
            ParseError::UnknownRole {
                line: 5,
                role: "x".to_owned()
            }
        );
        assert_eq!(
            parse_err("30 20 10\n5 4\n2 100\ns 0 0\n"),
            ParseError::UnexpectedEof
        );
        assert_eq!(
            parse_err("30 20 10\n5 4\n1 100\ns 0 0\ns 1 1\n"),
            ParseError::TrailingLine { line: 5 }
        );
        assert_eq!(
            parse_err("30 20 10\n5 4\n1 100\ns 0 0 7\n"),
            ParseError::WrongNrFields {
                line: 4,
                expected: 3,
                got: 4
            }
        );
    }

    #[test]
    fn invalid_params_fail() {
        assert!(matches!(
            parse_network("0 20 10\n5 4\n1 100\ns 0 0\n"),
            Err(Error::Params(ParamsError::NonPositiveDimension { .. }))
        ));
    }

    #[test]
    fn unknown_extension_fails() {
        assert!(matches!(
            read_network("network.txt"),
            Err(Error::Io(..) | Error::UnknownFileType(..))
        ));
    }
}
