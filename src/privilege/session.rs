use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::common::errors::SweepError;

/// Default seconds between renewals
pub const DEFAULT_RENEWAL_INTERVAL: Duration = Duration::from_secs(60);

/// Source of elevated credentials
pub trait Authorizer: Send + Sync {
    /// Prompt for credentials once. Declining is an error.
    fn acquire(&self) -> Result<(), SweepError>;

    /// Extend an existing grant without prompting. `false` when the grant
    /// could not be extended; callers ignore it.
    fn refresh(&self) -> bool;
}

/// Credentials via `sudo`'s timestamp cache
#[derive(Debug, Default, Clone, Copy)]
pub struct SudoAuthorizer;

impl Authorizer for SudoAuthorizer {
    fn acquire(&self) -> Result<(), SweepError> {
        let status = Command::new("sudo")
            .arg("-v")
            .status()
            .map_err(|e| SweepError::Authorization {
                message: format!("could not run sudo: {}", e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SweepError::Authorization {
                message: "sudo -v was declined or failed".to_string(),
            })
        }
    }

    fn refresh(&self) -> bool {
        Command::new("sudo")
            .args(["-n", "-v"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// Handle on the running keep-alive thread
struct Keepalive {
    cancel: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

/// Holds elevated privileges for the duration of a sweep.
///
/// After `acquire` a background thread re-validates the grant every
/// interval. The thread exits as soon as `release` drops its cancellation
/// sender, so it can never outlive the session.
pub struct PrivilegeSession {
    authorizer: Arc<dyn Authorizer>,
    interval: Duration,
    owner_pid: u32,
    keepalive: Mutex<Option<Keepalive>>,
    /// Bumped by every `release`
    generation: AtomicU64,
}

impl PrivilegeSession {
    pub fn new(authorizer: Arc<dyn Authorizer>, interval: Duration) -> Self {
        Self {
            authorizer,
            interval,
            owner_pid: std::process::id(),
            keepalive: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Keepalive>> {
        self.keepalive.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn owner_pid(&self) -> u32 {
        self.owner_pid
    }

    pub fn renewal_interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    /// Prompt once and start renewing. A second call while active is a no-op.
    ///
    /// The prompt runs without holding the session lock, so `release` from a
    /// signal handler returns immediately. A release that lands while the
    /// prompt is open wins: no keep-alive is started and this returns an
    /// authorization error.
    ///
    /// If the renewal thread cannot be spawned the session is still active,
    /// and the grant lasts until the authorizer's own timeout.
    pub fn acquire(&self) -> Result<(), SweepError> {
        if self.is_active() {
            return Ok(());
        }
        let generation = self.generation.load(Ordering::SeqCst);

        self.authorizer.acquire()?;

        let mut slot = self.slot();
        if slot.is_some() {
            return Ok(());
        }
        if self.generation.load(Ordering::SeqCst) != generation {
            return Err(SweepError::Authorization {
                message: "session was released while waiting for credentials".to_string(),
            });
        }

        let (cancel, cancelled) = mpsc::channel::<()>();
        let authorizer = Arc::clone(&self.authorizer);
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name("privilege-keepalive".into())
            .spawn(move || loop {
                match cancelled.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !authorizer.refresh() {
                            tracing::debug!("privilege renewal failed, will retry");
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        let handle = match handle {
            Ok(h) => Some(h),
            Err(e) => {
                // The grant still holds until it expires on its own.
                tracing::warn!("could not start privilege keep-alive: {}", e);
                None
            }
        };

        tracing::debug!(
            pid = self.owner_pid,
            interval_secs = interval.as_secs(),
            "privilege session acquired"
        );
        *slot = Some(Keepalive { cancel, handle });
        Ok(())
    }

    /// Stop renewing and reset. Safe to call any number of times.
    pub fn release(&self) {
        let taken = {
            let mut slot = self.slot();
            self.generation.fetch_add(1, Ordering::SeqCst);
            slot.take()
        };

        let Some(Keepalive { cancel, handle }) = taken else {
            return;
        };

        drop(cancel);
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("privilege keep-alive thread panicked");
            }
        }
        tracing::debug!("privilege session released");
    }
}

impl Drop for PrivilegeSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::time::Instant;

    #[derive(Default)]
    struct FakeAuthorizer {
        deny: AtomicBool,
        acquires: AtomicUsize,
        refreshes: AtomicUsize,
    }

    impl Authorizer for FakeAuthorizer {
        fn acquire(&self) -> Result<(), SweepError> {
            self.acquires.fetch_add(1, Ordering::SeqCst);
            if self.deny.load(Ordering::SeqCst) {
                Err(SweepError::Authorization {
                    message: "declined".into(),
                })
            } else {
                Ok(())
            }
        }

        fn refresh(&self) -> bool {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            // Swallowed by the session either way
            false
        }
    }

    #[test]
    fn test_acquire_and_release() {
        let auth = Arc::new(FakeAuthorizer::default());
        let session = PrivilegeSession::new(auth.clone(), Duration::from_secs(60));
        assert!(!session.is_active());

        session.acquire().unwrap();
        assert!(session.is_active());
        assert_eq!(session.owner_pid(), std::process::id());

        session.release();
        assert!(!session.is_active());
    }

    #[test]
    fn test_acquire_twice_prompts_once() {
        let auth = Arc::new(FakeAuthorizer::default());
        let session = PrivilegeSession::new(auth.clone(), Duration::from_secs(60));
        session.acquire().unwrap();
        session.acquire().unwrap();
        assert_eq!(auth.acquires.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_declined_acquire_is_authorization_error() {
        let auth = Arc::new(FakeAuthorizer::default());
        auth.deny.store(true, Ordering::SeqCst);
        let session = PrivilegeSession::new(auth, Duration::from_secs(60));

        let err = session.acquire().unwrap_err();
        assert!(matches!(err, SweepError::Authorization { .. }));
        assert!(!session.is_active());
    }

    #[test]
    fn test_release_is_idempotent() {
        let auth = Arc::new(FakeAuthorizer::default());
        let session = PrivilegeSession::new(auth, Duration::from_secs(60));

        // Nothing acquired yet
        session.release();

        session.acquire().unwrap();
        session.release();
        session.release();
        assert!(!session.is_active());
    }

    #[test]
    fn test_keepalive_renews_and_stops_on_release() {
        let auth = Arc::new(FakeAuthorizer::default());
        let session = PrivilegeSession::new(auth.clone(), Duration::from_millis(10));
        session.acquire().unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while auth.refreshes.load(Ordering::SeqCst) < 2 {
            assert!(std::time::Instant::now() < deadline, "keep-alive never ran");
            thread::sleep(Duration::from_millis(5));
        }

        session.release();
        let after_release = auth.refreshes.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(auth.refreshes.load(Ordering::SeqCst), after_release);
    }

    #[test]
    fn test_release_does_not_wait_for_interval() {
        let auth = Arc::new(FakeAuthorizer::default());
        let session = PrivilegeSession::new(auth, Duration::from_secs(3600));
        session.acquire().unwrap();

        let start = std::time::Instant::now();
        session.release();
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    /// Holds the prompt open until told to answer
    struct SlowAuthorizer {
        prompting: AtomicBool,
        answer: Mutex<bool>,
        refreshes: AtomicUsize,
    }

    impl SlowAuthorizer {
        fn new() -> Self {
            Self {
                prompting: AtomicBool::new(false),
                answer: Mutex::new(false),
                refreshes: AtomicUsize::new(0),
            }
        }

        fn wait_for_prompt(&self) {
            let deadline = Instant::now() + Duration::from_secs(5);
            while !self.prompting.load(Ordering::SeqCst) {
                assert!(Instant::now() < deadline, "prompt never opened");
                thread::sleep(Duration::from_millis(5));
            }
        }
    }

    impl Authorizer for SlowAuthorizer {
        fn acquire(&self) -> Result<(), SweepError> {
            self.prompting.store(true, Ordering::SeqCst);
            let deadline = Instant::now() + Duration::from_secs(5);
            while !*self.answer.lock().unwrap() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(5));
            }
            Ok(())
        }

        fn refresh(&self) -> bool {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn test_release_during_prompt_does_not_wait() {
        let auth = Arc::new(SlowAuthorizer::new());
        let session = Arc::new(PrivilegeSession::new(
            auth.clone(),
            Duration::from_millis(5),
        ));

        let prompting = {
            let session = Arc::clone(&session);
            thread::spawn(move || session.acquire())
        };
        auth.wait_for_prompt();

        let start = Instant::now();
        session.release();
        assert!(
            start.elapsed() < Duration::from_secs(1),
            "release waited {:?} for the prompt",
            start.elapsed()
        );

        *auth.answer.lock().unwrap() = true;
        let result = prompting.join().unwrap();
        assert!(matches!(result, Err(SweepError::Authorization { .. })));
        assert!(!session.is_active());

        thread::sleep(Duration::from_millis(30));
        assert_eq!(auth.refreshes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_acquire_after_release_starts_again() {
        let auth = Arc::new(FakeAuthorizer::default());
        let session = PrivilegeSession::new(auth.clone(), Duration::from_secs(60));
        session.acquire().unwrap();
        session.release();
        session.acquire().unwrap();
        assert!(session.is_active());
        assert_eq!(auth.acquires.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_release_without_keepalive_thread() {
        // State left behind when the renewal thread could not be spawned
        let session = PrivilegeSession::new(
            Arc::new(FakeAuthorizer::default()),
            Duration::from_secs(60),
        );
        let (cancel, _cancelled) = mpsc::channel();
        *session.slot() = Some(Keepalive {
            cancel,
            handle: None,
        });
        assert!(session.is_active());

        session.release();
        assert!(!session.is_active());
    }
}
