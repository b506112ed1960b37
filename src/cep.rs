use std::fmt;
use crate::error::LookupError;

/// Required length of a CEP, in bytes.
pub const CEP_LEN: usize = 8;

/// A postal code that passed the length check.
///
/// Only the length is checked, `"abcdefgh"` is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cep(String);

impl Cep {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        if raw.len() != CEP_LEN {
            return Err(LookupError::InvalidInput {
                cep: raw.to_string(),
                len: raw.len(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    /// take the CEP from the first positional argument
    ///
    /// * `args` - the process arguments, program name included
    pub fn from_args<I>(args: I) -> Result<Self, LookupError>
    where
        I: IntoIterator<Item = String>,
    {
        let raw = args.into_iter()
            .nth(1)
            .ok_or(LookupError::MissingArgument)?;
        Self::parse(&raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
