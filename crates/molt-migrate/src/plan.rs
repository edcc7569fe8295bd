// crates/molt-migrate/src/plan.rs
//
// Shard planner: expands one legacy record into the ordered store/add
// requests for its CAR parts. Pure and deterministic, no I/O.

use molt_core::{ShardAdd, UploadRecord};

/// Default public gateway the legacy service serves CAR bytes from.
pub const DEFAULT_GATEWAY: &str = "https://w3s.link/ipfs";

/// One ShardAdd per part, preserving export order.
///
/// `part_url` is the gateway location the shard bytes can be fetched from
/// if the destination asks for them. The declared size is the record's
/// whole-DAG size (0 when the legacy metadata omits it); the destination
/// treats it as advisory.
pub fn shard_adds(record: &UploadRecord, gateway: &str) -> Vec<ShardAdd> {
    let base = gateway.trim_end_matches('/');
    let size = record.dag_size.unwrap_or(0);
    record
        .parts
        .iter()
        .map(|part| ShardAdd {
            link: part.clone(),
            size,
            part_url: format!("{}/{}", base, part),
        })
        .collect()
}
