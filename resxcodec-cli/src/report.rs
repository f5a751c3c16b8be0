use resxcodec::Notifier;

/// Prints user-visible messages to stderr.
///
/// stdout is reserved for command output and UI messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        eprintln!("ℹ️  {}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}
