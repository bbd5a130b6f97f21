// License: MIT

use std::fmt;

use crate::tag::TypeTag;

/// The main error type for PMT values and their binary codec.
#[derive(Debug, Clone, PartialEq)]
pub enum PmtError {
    /// Raised by `MapValue::at` when the key has never been set.
    KeyNotFound {
        key: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    IndexOutOfRange {
        index: usize,
        length: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a value is downcast to a variant or element type it does not hold.
    TypeMismatch {
        expected: String,
        found: TypeTag,
        hint: Option<String>,
        code: Option<u32>,
    },
    InvalidKey {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a container would end up holding itself or one of its ancestors.
    CycleDetected {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    UnknownType {
        tag: u8,
        offset: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when the buffer ends before a declared length is satisfied.
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    Malformed {
        message: String,
        offset: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    LimitExceeded {
        message: String,
        offset: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for PmtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PmtError::KeyNotFound { key, hint, code } =>
                write!(f, "[PMT] Key '{}' not found{}", key, suffix(hint, code)),
            PmtError::IndexOutOfRange { index, length, hint, code } =>
                write!(f, "[PMT] Index {} out of range for length {}{}",
                    index, length, suffix(hint, code)),
            PmtError::TypeMismatch { expected, found, hint, code } =>
                write!(f, "[PMT] Type mismatch: expected {}, found {}{}",
                    expected, found, suffix(hint, code)),
            PmtError::InvalidKey { message, hint, code } =>
                write!(f, "[PMT] Invalid key: {}{}", message, suffix(hint, code)),
            PmtError::CycleDetected { message, hint, code } =>
                write!(f, "[PMT] Cycle detected: {}{}", message, suffix(hint, code)),
            PmtError::UnknownType { tag, offset, hint, code } =>
                write!(f, "[PMT] Unknown type tag 0x{:02x} at byte {}{}",
                    tag, offset, suffix(hint, code)),
            PmtError::Truncated { offset, needed, available, hint, code } =>
                write!(f, "[PMT] Truncated input at byte {}: needed {} more bytes, {} available{}",
                    offset, needed, available, suffix(hint, code)),
            PmtError::Malformed { message, offset, hint, code } =>
                write!(f, "[PMT] Malformed input at byte {}: {}{}",
                    offset, message, suffix(hint, code)),
            PmtError::LimitExceeded { message, offset, hint, code } =>
                write!(f, "[PMT] Limit exceeded at byte {}: {}{}",
                    offset, message, suffix(hint, code)),
        }
    }
}

impl std::error::Error for PmtError {}

impl PmtError {
    pub fn key_not_found(key: &str) -> Self {
        PmtError::KeyNotFound {
            key: key.to_string(),
            hint: Some("Use `entry` to create the slot, or check `contains_key` first".into()),
            code: Some(101),
        }
    }

    pub fn index_out_of_range(index: usize, length: usize) -> Self {
        PmtError::IndexOutOfRange {
            index,
            length,
            hint: None,
            code: Some(102),
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, found: TypeTag) -> Self {
        PmtError::TypeMismatch {
            expected: expected.into(),
            found,
            hint: None,
            code: Some(103),
        }
    }

    pub fn invalid_key(message: impl Into<String>) -> Self {
        PmtError::InvalidKey {
            message: message.into(),
            hint: Some("Map keys must be non-empty strings".into()),
            code: Some(104),
        }
    }

    pub fn cycle_detected(message: impl Into<String>) -> Self {
        PmtError::CycleDetected {
            message: message.into(),
            hint: Some("Insert a `deep_clone()` of the value instead".into()),
            code: Some(105),
        }
    }

    pub fn unknown_type(tag: u8, offset: usize) -> Self {
        PmtError::UnknownType {
            tag,
            offset,
            hint: Some("The buffer was written by a newer encoder or is corrupt".into()),
            code: Some(201),
        }
    }

    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        PmtError::Truncated {
            offset,
            needed,
            available,
            hint: None,
            code: Some(202),
        }
    }

    pub fn malformed(message: impl Into<String>, offset: usize) -> Self {
        PmtError::Malformed {
            message: message.into(),
            offset,
            hint: None,
            code: Some(203),
        }
    }

    pub fn limit_exceeded(message: impl Into<String>, offset: usize) -> Self {
        PmtError::LimitExceeded {
            message: message.into(),
            offset,
            hint: Some("Raise the limit in `DecodeOptions` if the input is trusted".into()),
            code: Some(204),
        }
    }

    /// Numeric error code, stable across releases.
    pub fn code(&self) -> Option<u32> {
        match self {
            PmtError::KeyNotFound { code, .. }
            | PmtError::IndexOutOfRange { code, .. }
            | PmtError::TypeMismatch { code, .. }
            | PmtError::InvalidKey { code, .. }
            | PmtError::CycleDetected { code, .. }
            | PmtError::UnknownType { code, .. }
            | PmtError::Truncated { code, .. }
            | PmtError::Malformed { code, .. }
            | PmtError::LimitExceeded { code, .. } => *code,
        }
    }
}
