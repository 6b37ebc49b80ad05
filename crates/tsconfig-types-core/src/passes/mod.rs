//! Rewrite pass modules.
//!
//! Each pass is a self-contained transformation over a parsed declaration
//! file. Passes are executed in order (1-4) and each assumes the output of
//! the previous ones.

pub mod p1_root;
pub mod p2_string_widening;
pub mod p3_unknown_records;
pub mod p4_index_signatures;
