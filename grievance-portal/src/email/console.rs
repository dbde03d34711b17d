//! Console-based notifier for development

use super::Notifier;

/// Notifier that logs to the console instead of sending mail (for development)
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        println!();
        println!("========================================");
        println!("  MAIL TO: {}", to);
        println!("  SUBJECT: {}", subject);
        println!("========================================");
        println!();

        tracing::info!(to = %to, subject = %subject, bytes = html_body.len(), "Email logged to console");

        Ok(())
    }
}
