use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
use std::sync::Arc;

/// Cooperative cancellation flag, checked by the generator once per sample
#[derive(Clone, Debug)]
#[repr(transparent)]
pub struct Interruptor(Arc<AtomicBool>);

impl Interruptor {
    pub fn new() -> Self {
        Interruptor(Arc::new(AtomicBool::new(false)))
    }

    /// Set the flag on the first Ctrl-C, exit the process on the second one
    pub fn install_ctrlc_handler(&self) -> Result<(), ctrlc::Error> {
        let intr = self.clone();
        ctrlc::set_handler(move || {
            if intr.is_set() {
                let exit_code = if cfg!(target_family = "unix") {
                    // 128 (fatal error signal "n") + 2 (control-c is fatal error signal 2)
                    130
                } else {
                    // Windows code 3221225786
                    // -1073741510 == C000013A
                    -1073741510
                };
                std::process::exit(exit_code);
            } else {
                intr.set();
            }
        })
    }

    pub fn set(&self) {
        self.0.store(true, SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(SeqCst)
    }
}

impl Default for Interruptor {
    fn default() -> Self {
        Self::new()
    }
}
