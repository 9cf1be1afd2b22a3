//! Socket counts from the Linux `/proc/net` tables.

use std::path::Path;

/// Count sockets listed in a `/proc/net/{tcp,udp}` style table.
///
/// The first line is a column header; every following non-empty line is one
/// socket.
pub fn count_sockets(table: &str) -> u64 {
    table
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .count() as u64
}

/// Sum the socket counts across the IPv4 and IPv6 tables for `proto`
/// (`"tcp"` or `"udp"`).  Missing tables count as zero.
pub fn read_connections(proto: &str) -> u64 {
    read_from(Path::new("/proc/net"), proto)
}

fn read_from(root: &Path, proto: &str) -> u64 {
    [proto.to_string(), format!("{proto}6")]
        .iter()
        .filter_map(|name| std::fs::read_to_string(root.join(name)).ok())
        .map(|table| count_sockets(&table))
        .sum()
}
