//! Flutter-facing bindings for the wellness dashboard core.

pub mod api;
