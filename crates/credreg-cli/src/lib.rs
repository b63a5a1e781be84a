//! # credreg-cli — Credential Registry Command-Line Interface
//!
//! Applies one registry call per invocation against a local JSON state file.
//! The caller identity and block height are given on the command line. The
//! designated principals come from a YAML deployment config or principal
//! flags when the state file is created, and are recorded in it; later
//! invocations use the recorded config and refuse a conflicting one.
//!
//! ## Subcommands
//!
//! - `institution` — register, verify, show
//! - `student` — register, verify, show
//! - `achievement` — issue, revoke, show
//! - `status` — state file summary and store digest
//!
//! ## Exit codes
//!
//! - `0` — call committed, or query answered.
//! - `1` — operational failure (unreadable state, bad config), or a query
//!   found no record.
//! - `2` — the registry rejected the call; the state file is untouched.

pub mod achievement;
pub mod institution;
pub mod session;
pub mod student;
