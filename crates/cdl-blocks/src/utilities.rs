//! Utility blocks.

use crate::block::stateless_block;

stateless_block!(
    /// Emits `message` as a warning whenever `u` is false. Never fails and
    /// produces no outputs.
    Assert { message: String },
    bool => (),
    |this, u| {
        if !u {
            tracing::warn!(block = Self::NAME, "{}", this.message);
        }
        Ok(())
    }
);

impl Assert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Assert {
    fn default() -> Self {
        Self::new("Assertion failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn with_captured_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.text()
    }

    #[test]
    fn warns_only_when_condition_fails() {
        let mut check = Assert::new("supply fan not proven");
        let logs = with_captured_logs(|| {
            check.compute(true).unwrap();
        });
        assert!(logs.is_empty());

        let logs = with_captured_logs(|| {
            check.compute(false).unwrap();
        });
        assert!(logs.contains("WARN"));
        assert!(logs.contains("supply fan not proven"));
        assert!(logs.contains("Assert"));
    }

    #[test]
    fn default_message() {
        assert_eq!(Assert::default().message, "Assertion failed");
    }
}
