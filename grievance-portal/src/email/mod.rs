//! Email delivery abstractions

pub mod console;
pub mod smtp;
pub mod templates;

pub use console::ConsoleNotifier;
pub use smtp::{SmtpConfig, SmtpNotifier};

/// Trait for delivering portal mail. OTP delivery failures are fatal to the
/// issuing request; confirmation failures are logged and swallowed by callers.
pub trait Notifier: Send + Sync {
    /// Send an HTML email. The error string is logged or surfaced by the caller.
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String>;
}

/// Allow using Box<dyn Notifier> as a Notifier
impl Notifier for Box<dyn Notifier> {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        (**self).send(to, subject, html_body)
    }
}
