//! An Eddy application representation.

use eddy_core::{Backend, Error, IntoNode, Window};

use crate::{config::Config, log};

/// Represents an Eddy application.
#[derive(Debug, Clone, Default)]
pub struct App {
    config: Config,
}

impl App {
    /// Create a new application from its configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the configuration the application was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the main window on `backend`, titled and sized from the config.
    pub fn window<B: Backend>(&self, backend: B) -> Window<B> {
        Window::new(backend)
            .title(self.config.window.title.clone())
            .size(self.config.window.size())
    }

    /// Installs logging, mounts `root` and runs the event loop until the
    /// backend ends it. The window is closed before returning.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the mount or an update cycle.
    pub fn run<B: Backend>(&self, backend: B, root: impl IntoNode) -> Result<(), Error> {
        log::install(&self.config.log);
        let mut window = self.window(backend);
        tracing::info!(title = %self.config.window.title, "starting application");
        let result = window.mount(root);
        if let Err(err) = &result {
            tracing::error!(error = %err, "application stopped");
        }
        window.close();
        result
    }
}
