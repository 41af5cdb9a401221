use colorful::{Color, Colorful};
use hotdoge_staking::notify::Notifier;

/// Prints notifications to the terminal, green for success and red for errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        let line = format!("✔ {}", message);
        println!("{}", line.as_str().color(Color::Green));
    }

    fn error(&self, message: &str) {
        let line = format!("✖ {}", message);
        eprintln!("{}", line.as_str().color(Color::Red));
    }
}
