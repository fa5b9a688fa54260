use std::sync::{Arc, Mutex};

/// Exit status used when a run is cut short by a signal
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

type Action = Box<dyn FnOnce() + Send>;

/// Teardown that runs exactly once, whichever path gets there first:
/// normal completion, an error return, a signal, or drop.
pub struct Finalizer {
    action: Mutex<Option<Action>>,
}

impl Finalizer {
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            action: Mutex::new(Some(Box::new(action))),
        }
    }

    /// Run the teardown. Returns `false` if it had already run.
    pub fn run(&self) -> bool {
        let action = self.action.lock().unwrap_or_else(|e| e.into_inner()).take();
        match action {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }

    pub fn has_run(&self) -> bool {
        self.action
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

impl Drop for Finalizer {
    fn drop(&mut self) {
        self.run();
    }
}

/// Body of the interrupt handler: tear down, then hand back the exit code
pub fn on_interrupt(finalizer: &Finalizer) -> i32 {
    tracing::warn!("interrupted, tearing down");
    finalizer.run();
    INTERRUPTED_EXIT_CODE
}

/// Route SIGINT, SIGTERM and SIGHUP through `finalizer`, then exit
pub fn install_signal_handler(finalizer: Arc<Finalizer>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let code = on_interrupt(&finalizer);
        std::process::exit(code);
    })
}
