#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

mod app;
pub mod config;
pub mod log;

pub use app::App;
pub use config::{Config, ConfigError, LogConfig, WindowConfig};

#[doc(inline)]
pub use eddy_core::*;

pub mod prelude {
    //! A collection of commonly used types and functions for easy importing.
    //!
    //! # Example
    //!
    //! ```rust
    //! use eddy::prelude::*;
    //!
    //! fn greeting() -> Label {
    //!     label("Hello, world!")
    //! }
    //! ```
    pub use crate::{App, Config};
    pub use eddy_core::{
        AnyNode, Backend, Button, Component, Container, Direction, Error, Hooks, IntoNode, Label,
        MemoryBackend, Node, Setter, Window, button, component, container, hstack, label, nodes,
        vstack,
    };
}
