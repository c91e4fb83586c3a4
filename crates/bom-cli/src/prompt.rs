//! Terminal interaction for credentials and login retries.

use std::io::{self, BufRead, Stderr, StdinLock, Write};

use bom_upload::{Credentials, OperatorPrompt};

/// Prompts on `output` and reads answers line by line from `input`.
///
/// Credentials given up front (flags or environment) are used for the first
/// login attempt only; after a failure the operator is asked again.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    username: Option<String>,
    password: Option<String>,
    /// Read the password from the terminal without echo instead of from `input`.
    mask_password: bool,
}

impl TerminalPrompt<StdinLock<'static>, Stderr> {
    /// Prompt bound to the process's stdin and stderr.
    pub fn stdio() -> Self {
        Self {
            mask_password: true,
            ..Self::new(io::stdin().lock(), io::stderr())
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            username: None,
            password: None,
            mask_password: false,
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username.filter(|value| !value.is_empty());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|value| !value.is_empty());
        self
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_password(&mut self) -> io::Result<String> {
        if self.mask_password {
            return rpassword::prompt_password("Password: ");
        }
        self.ask("Password: ")
    }
}

impl<R: BufRead, W: Write> OperatorPrompt for TerminalPrompt<R, W> {
    fn credentials(&mut self) -> io::Result<Credentials> {
        let username = match self.username.take() {
            Some(username) => username,
            None => self.ask("Username: ")?,
        };
        let password = match self.password.take() {
            Some(password) => password,
            None => self.ask_password()?,
        };
        Ok(Credentials::new(username, password))
    }

    fn confirm_retry(&mut self) -> io::Result<bool> {
        let answer = self.ask("Login failed. Would you like to try again? [y/N] ")?;
        Ok(is_affirmative(&answer))
    }
}

/// `y` or `yes` in any case.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_the_terminal_prompt_masks_passwords() {
        assert!(TerminalPrompt::stdio().mask_password);
        assert!(!TerminalPrompt::new(io::empty(), io::sink()).mask_password);
    }
}
