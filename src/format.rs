//! String form of identifiers
//!
//! Without a fixed length the id is printed in decimal. With `id_length`
//! set, the id is written in base62 and left-padded to exactly that many
//! characters. The prefix is prepended in both cases.

use crate::base62;
use crate::config::GeneratorOptions;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdFormatter {
    id_length: u8,
    prefix: String,
}

impl IdFormatter {
    pub fn new(id_length: u8, prefix: impl Into<String>) -> Self {
        Self {
            id_length,
            prefix: prefix.into(),
        }
    }

    pub(crate) fn for_options(options: &GeneratorOptions) -> Self {
        Self::new(options.id_length(), options.id_prefix())
    }

    #[inline(always)]
    pub fn id_length(&self) -> u8 {
        self.id_length
    }

    #[inline(always)]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn format(&self, id: i64) -> Result<String> {
        let body = if self.id_length == 0 {
            id.to_string()
        } else {
            base62::encode_padded(id as u64, self.id_length as usize).ok_or(
                Error::IdLengthOverflow {
                    id,
                    id_length: self.id_length,
                },
            )?
        };

        if self.prefix.is_empty() {
            return Ok(body);
        }
        let mut out = String::with_capacity(self.prefix.len() + body.len());
        out.push_str(&self.prefix);
        out.push_str(&body);
        Ok(out)
    }

    /// Inverse of [`format`](Self::format)
    pub fn parse(&self, input: &str) -> Result<i64> {
        let body = input
            .strip_prefix(self.prefix.as_str())
            .ok_or_else(|| Error::invalid_id_string(input, "missing id prefix"))?;

        if self.id_length == 0 {
            if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_id_string(input, "expected decimal digits only"));
            }
            return body
                .parse::<i64>()
                .map_err(|e| Error::invalid_id_string(input, e));
        }

        if body.len() != self.id_length as usize {
            return Err(Error::invalid_id_string(
                input,
                format!("expected {} characters after the prefix", self.id_length),
            ));
        }
        let value = base62::decode(body).map_err(|e| Error::invalid_id_string(input, e))?;
        i64::try_from(value).map_err(|e| Error::invalid_id_string(input, e))
    }
}
