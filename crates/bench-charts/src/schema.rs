//! Column names of the measurement logs.

pub const BLOCK_NUM: &str = "block_num";
pub const ITERATION: &str = "iteration";
pub const FILE_SIZE: &str = "file_size";
pub const NUM_BLOCK_COPIES: &str = "num_block_copies";
pub const TOTAL_TIME: &str = "total_time";

/// Columns identifying a measurement point.
pub const KEY_COLUMNS: &[&str] = &[BLOCK_NUM, ITERATION, NUM_BLOCK_COPIES, FILE_SIZE];

/// Columns of the single-source breakdown log.
pub mod breakdown {
    pub const FIEMAP_TIME: &str = "fiemap_time";
    pub const RPC_TIME: &str = "rpc_time";
    pub const IO_TIME: &str = "io_time";
    pub const CLIENT_TOTAL_TIME: &str = "client_total_time";
    pub const BASELINE_TIME: &str = "baseline_time";

    /// Averaged timing columns.
    pub const TIME_COLUMNS: &[&str] = &[FIEMAP_TIME, RPC_TIME, IO_TIME, CLIENT_TOTAL_TIME, BASELINE_TIME];

    /// Components of the left (RPC) stack, bottom to top.
    pub const STACKED: &[&str] = &[FIEMAP_TIME, RPC_TIME, IO_TIME];

    /// Every bar component in legend order.
    pub const COMPONENTS: &[&str] = &[FIEMAP_TIME, RPC_TIME, IO_TIME, BASELINE_TIME];
}

/// Columns of the dual-source `rpc.log` / `baseline.log` pair.
pub mod compare {
    pub const READ_NS: &str = "read_ns";
    pub const WRITE_NS: &str = "write_ns";
    pub const IO_NS: &str = "io_ns";
    pub const FIEMAP_NS: &str = "fiemap_ns";
    pub const RPC_NS: &str = "rpc_ns";
    pub const OTHER_NS: &str = "other_ns";
    pub const PREP_NS: &str = "prep_ns";
    pub const END_NS: &str = "end_ns";

    /// Stacked components, bottom to top.
    pub const PARTS: &[&str] = &[READ_NS, WRITE_NS, IO_NS, FIEMAP_NS, RPC_NS, OTHER_NS];

    /// Components which may be absent from a log and are then filled with zero.
    pub const OPTIONAL: &[&str] = &[READ_NS, WRITE_NS, IO_NS, FIEMAP_NS, RPC_NS, OTHER_NS, PREP_NS, END_NS];

    /// Columns folded into [`OTHER_NS`].
    pub const FOLDED_INTO_OTHER: &[&str] = &[PREP_NS, END_NS];

    /// Server-side names used by the RPC log.
    pub const RPC_RENAMES: &[(&str, &str)] = &[
        ("server_read_ns", READ_NS),
        ("server_write_ns", WRITE_NS),
        ("server_other_ns", OTHER_NS),
    ];

    /// Components labeled inside their segments by default.
    pub const LABELED: &[&str] = &[READ_NS, WRITE_NS, RPC_NS];
}
