use log::debug;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::{Error, Result};

/// Stop request shared between signal handlers, the reader and the main loop.
/// Raising it more than once has no further effect.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag on SIGINT and SIGTERM.
    pub fn register_signals(&self) -> Result<()> {
        use signal_hook::consts::{SIGINT, SIGTERM};

        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&self.flag)).map_err(Error::Signal)?;
            debug!("registered shutdown flag for signal {}", signal);
        }
        Ok(())
    }

    pub fn raise(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            debug!("shutdown raised");
        }
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
