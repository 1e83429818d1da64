use std::fmt::Display;
use std::io;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("Parse failure: {0}")]
    Parse(String),
}

/// Source of terminal input lines, swapped for a scripted one in tests.
pub trait InputProvider {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;
}

pub struct InputHandler<I: InputProvider> {
    provider: I,
}

impl<I: InputProvider> InputHandler<I> {
    pub fn new(provider: I) -> Self {
        Self { provider }
    }

    pub fn get_string_trimmed(&mut self, prompt: &str) -> Result<String, InputError> {
        self.provider.read_line(prompt).map(|s| s.trim().to_string())
    }

    pub fn parse_trimmed<T>(&mut self, prompt: &str) -> Result<T, InputError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let s = self.get_string_trimmed(prompt)?;
        s.parse::<T>().map_err(|e| InputError::Parse(e.to_string()))
    }

    /// Reads a 1-based menu number and returns the matching 0-based index.
    pub fn pick_index(&mut self, prompt: &str, len: usize) -> Result<usize, InputError> {
        match self.parse_trimmed::<usize>(prompt)? {
            n if (1..=len).contains(&n) => Ok(n - 1),
            n => Err(InputError::Parse(format!("{n} is not between 1 and {len}"))),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedInput;
    use super::*;

    #[test]
    fn test_parse_trimmed_success() {
        let mut handler = InputHandler::new(ScriptedInput::new(&[" 42 "]));
        assert_eq!(handler.parse_trimmed::<u32>("test").unwrap(), 42);
    }

    #[test]
    fn test_pick_index_bounds() {
        let mut handler = InputHandler::new(ScriptedInput::new(&["3", "0", "4"]));
        assert_eq!(handler.pick_index("#", 3).unwrap(), 2);
        assert!(matches!(handler.pick_index("#", 3), Err(InputError::Parse(_))));
        assert!(matches!(handler.pick_index("#", 3), Err(InputError::Parse(_))));
    }

    #[test]
    fn test_exhausted_input_is_io_error() {
        let mut handler = InputHandler::new(ScriptedInput::new(&[]));
        assert!(matches!(handler.get_string_trimmed("x"), Err(InputError::Io(_))));
    }
}
