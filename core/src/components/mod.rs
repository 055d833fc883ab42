//! Built-in nodes: leaves and containers.

pub mod button;
pub mod container;
pub mod label;

pub use button::{Button, button};
pub use container::{Container, container, hstack, vstack};
pub use label::{Label, label};
