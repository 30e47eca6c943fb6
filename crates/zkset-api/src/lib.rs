//! Serverset data model and member codec.
//!
//! This crate provides:
//! - `Endpoint` and `Member`, the decoded shape of one serverset entry
//! - `Digest`, the mapping from child name to member that is mirrored to disk
//! - tolerant `decode` and `encode` for member payloads

pub mod member;

pub use member::{DecodeError, Digest, Endpoint, Member, decode, encode};
