//! Signature device engine.
//!
//! Issues signing devices (one asymmetric key pair each) and produces
//! tamper-evident, chained signatures over client-submitted data: every
//! signature binds to the device's monotonically increasing counter and to
//! the previous signature, forming a verifiable chain per device.
//!
//! Layers, bottom up:
//! - [`crypto`] — algorithm tags, key pair generators and signers
//! - [`device`] — the `SignatureDevice` aggregate and the chained-signing
//!   protocol
//! - [`storage`] — the repository contract and the in-memory store that
//!   serializes concurrent signing per device
//! - [`service`] — orchestration consumed by an external transport layer

pub mod crypto;
pub mod device;
pub mod service;
pub mod storage;
