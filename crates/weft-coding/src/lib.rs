//! # weft-coding
//!
//! Random linear network coding over GF(2).
//!
//! A sender splits data into equal-size symbols and transmits linear
//! combinations of them; a receiver rebuilds the originals from any
//! sufficiently large, possibly reordered, possibly redundant subset of
//! those combinations. Two strategies share one algebraic core: a closed
//! **full-vector** generation, and a **sliding window** that retires
//! symbols as decoder feedback confirms them, for continuous streaming.
//!
//! The crate is pure logic — no sockets, no clocks, no threads. The channel
//! between an encoder and its decoder (ordering, duplication, loss, delay)
//! is the caller's business; the algebra does not care.
//!
//! ## Crate structure
//!
//! - [`gf2`] — GF(2) combine and the coefficient bit-vector
//! - [`config`] — capacity bounds shared by both sides
//! - [`store`] — fixed-capacity source symbol storage
//! - [`echelon`] — incremental Gaussian elimination, rank, recovery
//! - [`wire`] — payload wire codec
//! - [`feedback`] — feedback wire codec and capability traits
//! - [`encoder`] — full-vector and sliding-window encoders
//! - [`decoder`] — full-vector and sliding-window decoders
//! - [`stats`] — serializable per-instance counters
//! - [`error`] — typed error surface

pub mod config;
pub mod decoder;
pub mod echelon;
pub mod encoder;
pub mod error;
pub mod feedback;
pub mod gf2;
pub mod stats;
pub mod store;
pub mod wire;
