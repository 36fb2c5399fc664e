//! Application Layer
//!
//! The application layer wires the optimizer core to the outside world.
//! It defines:
//!
//! - **Ports**: Interfaces for chain sources, live prices and position storage
//! - **Use Cases**: Optimize, evaluate and record strategies through those ports

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
