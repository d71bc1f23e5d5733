use std::io::{self, BufRead, IsTerminal};

use zeroize::Zeroizing;

use crate::config::PasswordPolicy;
use crate::error::{Error, Result};

/// Environment variable consulted before any prompt.
pub const PASSWORD_ENV: &str = "AESGCM_PASSWORD";

/// Acquires passwords from the user.
pub trait Terminal {
    /// Asks for a new password twice; both entries must match and respect
    /// the length bounds.
    fn password_for_encryption(&self) -> Result<Zeroizing<String>>;

    /// Asks once; only empty and over-long input is rejected.
    fn password_for_decryption(&self) -> Result<Zeroizing<String>>;
}

impl<T: Terminal + ?Sized> Terminal for &T {
    fn password_for_encryption(&self) -> Result<Zeroizing<String>> {
        (**self).password_for_encryption()
    }

    fn password_for_decryption(&self) -> Result<Zeroizing<String>> {
        (**self).password_for_decryption()
    }
}

/// Reads the password from, in order:
///
/// 1. `AESGCM_PASSWORD`, e.g. `AESGCM_PASSWORD="supersecret" aesgcm decrypt notes.aes`
/// 2. piped stdin, e.g. `printf 'pw\npw\n' | aesgcm encrypt notes.txt`
/// 3. an interactive prompt on the TTY
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTerminal {
    policy: PasswordPolicy,
}

impl ConsoleTerminal {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }
}

impl Terminal for ConsoleTerminal {
    fn password_for_encryption(&self) -> Result<Zeroizing<String>> {
        if let Some(pw) = env_password() {
            self.policy.check_new(&pw, &pw)?;
            return Ok(pw);
        }

        if !io::stdin().is_terminal() {
            return read_new_password(&self.policy, io::stdin().lock());
        }

        let pw = prompt(&format!(
            "Please enter your password (min. {} characters): ",
            self.policy.min_length()
        ))?;
        self.policy.check_new_bounds(&pw)?;

        let confirmation = prompt("Please re-enter your password: ")?;
        self.policy.check_new(&pw, &confirmation)?;

        Ok(pw)
    }

    fn password_for_decryption(&self) -> Result<Zeroizing<String>> {
        if let Some(pw) = env_password() {
            self.policy.check_existing(&pw)?;
            return Ok(pw);
        }

        if !io::stdin().is_terminal() {
            return read_existing_password(&self.policy, io::stdin().lock());
        }

        let pw = prompt("Please enter your password: ")?;
        self.policy.check_existing(&pw)?;
        Ok(pw)
    }
}

fn env_password() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

fn prompt(message: &str) -> Result<Zeroizing<String>> {
    rpassword::prompt_password(message)
        .map(Zeroizing::new)
        .map_err(|e| Error::Input(format!("an error occurred while reading the password: {e}")))
}

/// Reads a password line and its confirmation line.
pub(crate) fn read_new_password<R: BufRead>(
    policy: &PasswordPolicy,
    mut reader: R,
) -> Result<Zeroizing<String>> {
    let pw = read_line(&mut reader)?;
    policy.check_new_bounds(&pw)?;

    let confirmation = read_line(&mut reader)?;
    policy.check_new(&pw, &confirmation)?;

    Ok(pw)
}

pub(crate) fn read_existing_password<R: BufRead>(
    policy: &PasswordPolicy,
    mut reader: R,
) -> Result<Zeroizing<String>> {
    let pw = read_line(&mut reader)?;
    policy.check_existing(&pw)?;
    Ok(pw)
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    reader
        .read_line(&mut line)
        .map_err(|e| Error::Input(format!("an error occurred while reading the password: {e}")))?;
    trim_newline(&mut line);
    Ok(line)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::new(8, 16).unwrap()
    }

    #[test]
    fn piped_new_password_with_confirmation() {
        let pw = read_new_password(&policy(), Cursor::new("password1\npassword1\n")).unwrap();
        assert_eq!(pw.as_str(), "password1");
    }

    #[test]
    fn piped_crlf_is_trimmed() {
        let pw = read_new_password(&policy(), Cursor::new("password1\r\npassword1\r\n")).unwrap();
        assert_eq!(pw.as_str(), "password1");
    }

    #[test]
    fn piped_mismatch_fails() {
        match read_new_password(&policy(), Cursor::new("password1\npassword2\n")) {
            Err(Error::Input(msg)) => assert_eq!(msg, "passwords do not match"),
            other => panic!("expected Input error, got: {other:?}"),
        }
    }

    #[test]
    fn piped_missing_confirmation_fails() {
        assert!(matches!(
            read_new_password(&policy(), Cursor::new("password1\n")),
            Err(Error::Input(_))
        ));
    }

    #[test]
    fn piped_new_password_out_of_bounds_fails() {
        assert!(matches!(
            read_new_password(&policy(), Cursor::new("short\nshort\n")),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            read_new_password(
                &policy(),
                Cursor::new("waytoolongpassword\nwaytoolongpassword\n")
            ),
            Err(Error::Input(_))
        ));
    }

    #[test]
    fn piped_existing_password_has_no_minimum() {
        let pw = read_existing_password(&policy(), Cursor::new("abc\n")).unwrap();
        assert_eq!(pw.as_str(), "abc");
    }

    #[test]
    fn piped_existing_password_rejects_empty_and_too_long() {
        assert!(matches!(
            read_existing_password(&policy(), Cursor::new("\n")),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            read_existing_password(&policy(), Cursor::new("")),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            read_existing_password(&policy(), Cursor::new("waytoolongpassword\n")),
            Err(Error::Input(_))
        ));
    }
}
