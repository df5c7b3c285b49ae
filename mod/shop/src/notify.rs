//! SMS notification seam.
//!
//! The service only knows this trait. The console implementation logs
//! messages instead of sending them; a real gateway (e.g. Twilio) can be
//! injected at startup without touching the service layer.

use crustops_core::ServiceError;

/// Pluggable outbound SMS sender.
pub trait Notifier: Send + Sync {
    /// Send `message` to the phone number `to`.
    fn send(&self, to: &str, message: &str) -> Result<(), ServiceError>;
}

/// Logs messages via tracing instead of sending SMS. The development
/// and test default.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send(&self, to: &str, message: &str) -> Result<(), ServiceError> {
        tracing::info!(to, message, "sms");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records sent messages for assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, to: &str, message: &str) -> Result<(), ServiceError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), message.to_string()));
            Ok(())
        }
    }

    /// Always fails; used to prove notification failures don't fail
    /// the triggering operation.
    pub struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn send(&self, _to: &str, _message: &str) -> Result<(), ServiceError> {
            Err(ServiceError::Internal("sms gateway down".into()))
        }
    }
}
