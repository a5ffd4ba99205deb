//! Session join codes
//!
//! Six characters drawn uniformly from `A-Z0-9`, giving 36⁶ ≈ 2.2 × 10⁹
//! codes. The generator does not check for collisions; whoever persists a
//! session must reject a code that is already taken and draw again.

use crate::error::SessionCodeError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters a code may contain
pub const SESSION_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Characters per code
pub const SESSION_CODE_LENGTH: usize = 6;

/// A validated, uppercase join code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// The code text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionCode {
    type Err = SessionCodeError;

    /// Parse user input, trimming whitespace and uppercasing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let len = code.chars().count();
        if len != SESSION_CODE_LENGTH {
            return Err(SessionCodeError::InvalidLength {
                expected: SESSION_CODE_LENGTH,
                found: len,
            });
        }
        if let Some(bad) = code
            .chars()
            .find(|c| !c.is_ascii() || !SESSION_CODE_ALPHABET.contains(&(*c as u8)))
        {
            return Err(SessionCodeError::InvalidCharacter(bad));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for SessionCode {
    type Error = SessionCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}

/// Draw a code from the thread-local RNG
#[must_use]
pub fn generate_session_code() -> SessionCode {
    generate_session_code_with(&mut rand::thread_rng())
}

/// Draw a code from the given RNG
pub fn generate_session_code_with<R: Rng + ?Sized>(rng: &mut R) -> SessionCode {
    let code: String = (0..SESSION_CODE_LENGTH)
        .filter_map(|_| SESSION_CODE_ALPHABET.choose(&mut *rng))
        .map(|&b| char::from(b))
        .collect();
    SessionCode(code)
}
