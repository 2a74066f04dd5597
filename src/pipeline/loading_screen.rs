//! Loading Screen
//!
//! The pipeline reports progress to a [`LoadingScreen`] while it is being
//! created. Drawing one is the host's business; the built-in screens either
//! ignore progress or forward it to the log.

pub trait LoadingScreen {
    /// Called once before any stage is created.
    fn create(&mut self);

    /// Reports a step of pipeline construction.
    fn progress(&mut self, message: &str);

    /// Called once construction has finished.
    fn remove(&mut self);
}

/// Loading screen that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyLoadingScreen;

impl LoadingScreen for EmptyLoadingScreen {
    fn create(&mut self) {}

    fn progress(&mut self, _message: &str) {}

    fn remove(&mut self) {}
}

/// Default loading screen: logs each step.
#[derive(Debug, Default, Clone)]
pub struct LogLoadingScreen {
    steps: usize,
}

impl LogLoadingScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of progress messages received since `create`.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl LoadingScreen for LogLoadingScreen {
    fn create(&mut self) {
        self.steps = 0;
        log::info!("Loading render pipeline");
    }

    fn progress(&mut self, message: &str) {
        self.steps += 1;
        log::info!("[{}] {message}", self.steps);
    }

    fn remove(&mut self) {
        log::info!("Render pipeline ready after {} steps", self.steps);
    }
}
