use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Ask a yes/no question; anything but an explicit yes declines.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be written or read.
    fn confirm(&self, message: &str) -> io::Result<bool>;
}

pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, message: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{message} [y/N] ")?;
        stdout.flush()?;
        drop(stdout);

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(is_yes(&line))
    }
}

/// Answers every prompt the same way, for `--yes` and tests.
pub struct FixedPrompter(pub bool);

impl Prompter for FixedPrompter {
    fn confirm(&self, _message: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
