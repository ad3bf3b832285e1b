use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine};

/// Somewhere text can be copied to
pub trait Clipboard {
    /// Replaces the clipboard contents with `text`
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be written
    fn write_text(&self, text: &str) -> std::io::Result<()>;
}

/// Terminal clipboard using the OSC 52 escape sequence
///
/// Works over SSH as long as the terminal emulator honours OSC 52.
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()
    }
}

/// Escape sequence that sets the system clipboard to `text`
#[must_use]
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(
            osc52_sequence("https://podu.pics/AbCdE12345"),
            "\x1b]52;c;aHR0cHM6Ly9wb2R1LnBpY3MvQWJDZEUxMjM0NQ==\x07"
        );
    }
}
