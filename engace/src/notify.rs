use engace_api::Notifier;

/// Prints request notices inline with the rest of the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, title: &str, message: &str) {
        tracing::debug!(message, "success notice");
        println!("[{title}] {message}");
    }

    fn error(&self, title: &str, message: &str) {
        tracing::debug!(message, "error notice");
        eprintln!("[{title}] {message}");
    }
}
