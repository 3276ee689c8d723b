use std::sync::Arc;

use shared::domain::ThemeMode;
use tokio::sync::watch;

/// Visual mode shared by every view. Created once at startup and handed to
/// consumers; clones observe the same value.
#[derive(Clone)]
pub struct ThemeContext {
    mode: Arc<watch::Sender<ThemeMode>>,
}

impl ThemeContext {
    pub fn new(initial: ThemeMode) -> Self {
        let (mode, _) = watch::channel(initial);
        Self {
            mode: Arc::new(mode),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        *self.mode.borrow()
    }

    pub fn set(&self, mode: ThemeMode) {
        self.mode.send_replace(mode);
    }

    pub fn toggle(&self) -> ThemeMode {
        self.mode.send_modify(|mode| *mode = mode.toggled());
        self.mode()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.mode.subscribe()
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}
