//! Parser for the textual `.ls8` program format.
//!
//! One instruction byte per line, written as eight binary digits. Text
//! after `#` is a comment; blank and comment-only lines are skipped.
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 00000001 # HLT
//! ```

use ls8_core::MEMORY_SIZE;
use thiserror::Error;

/// Errors raised while parsing a program file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A non-blank line was not exactly eight binary digits.
    #[error("line {line}: `{text}` is not an 8-digit binary instruction")]
    MalformedLine {
        /// 1-indexed line number in the source file.
        line: usize,
        /// The offending token, comments and whitespace stripped.
        text: String,
    },
    /// The program holds more bytes than memory has cells.
    #[error("program is {len} bytes but memory holds {capacity}")]
    ProgramTooLarge {
        /// Number of instruction bytes in the program.
        len: usize,
        /// Memory capacity in bytes.
        capacity: usize,
    },
}

/// Parses `.ls8` source text into the raw byte image the core loads at
/// address 0.
///
/// # Errors
///
/// Returns [`LoadError::MalformedLine`] for any line whose non-comment
/// content is not exactly eight `0`/`1` characters, and
/// [`LoadError::ProgramTooLarge`] when the image exceeds 256 bytes.
pub fn parse_program(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut image = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let token = line.split('#').next().unwrap_or("").trim();
        if token.is_empty() {
            continue;
        }

        let byte = parse_instruction_byte(token).ok_or_else(|| LoadError::MalformedLine {
            line: idx + 1,
            text: token.to_string(),
        })?;
        image.push(byte);
    }

    if image.len() > MEMORY_SIZE {
        return Err(LoadError::ProgramTooLarge {
            len: image.len(),
            capacity: MEMORY_SIZE,
        });
    }

    Ok(image)
}

/// Parses one token as exactly eight binary digits.
fn parse_instruction_byte(token: &str) -> Option<u8> {
    if token.len() != 8 || !token.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(token, 2).ok()
}
