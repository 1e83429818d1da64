use crate::core::input::{InputError, InputProvider};
use std::io::{self, Write};

/// Reads menu answers from stdin.
pub struct TerminalInput;

impl InputProvider for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut buf = String::new();
        if io::stdin().read_line(&mut buf)? == 0 {
            return Err(InputError::Io(io::ErrorKind::UnexpectedEof.into()));
        }
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    }
}
