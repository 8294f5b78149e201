//! Public library API for decoding Supercell glTF (GLB/Odin) containers.

/// Container parsing, document normalization, vertex stream decoding, and
/// shader material decoding.
pub mod glb;
