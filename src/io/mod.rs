//! Asynchronous boundaries: uploads, exports, and the collaborators behind them.

pub mod collab;
pub mod export;
pub mod fs;
pub mod gateway;
pub mod ingest;
pub mod memory;
