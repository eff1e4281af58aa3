//! Fixed-capacity message formatting.
//!
//! Callers that format through the macros get the same bounds a fixed
//! stack buffer would impose: a message that does not fit, or whose
//! arguments fail to format, is dropped whole rather than truncated.

use std::fmt::{self, Write};

/// Capacity of the narrow buffer in bytes, terminator included.
pub const NARROW_CAPACITY: usize = 512;

/// Capacity of the wide buffer in UTF-16 code units, terminator included.
pub const WIDE_CAPACITY: usize = 1024;

/// Which buffer a message is formatted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Bytes of UTF-8
    Narrow,
    /// UTF-16 code units
    Wide,
}

impl Width {
    /// Units available to the message itself.
    #[must_use]
    pub const fn usable(self) -> usize {
        match self {
            Self::Narrow => NARROW_CAPACITY - 1,
            Self::Wide => WIDE_CAPACITY - 1,
        }
    }

    const fn measure(self, s: &str) -> usize {
        match self {
            Self::Narrow => s.len(),
            Self::Wide => utf16_len(s),
        }
    }
}

const fn utf16_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut units = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        // Continuation bytes add nothing; 4-byte sequences need a surrogate pair
        if b & 0xC0 != 0x80 {
            units += if b >= 0xF0 { 2 } else { 1 };
        }
        i += 1;
    }
    units
}

struct BoundedBuffer {
    width: Width,
    used: usize,
    text: String,
}

impl Write for BoundedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let used = self.used + self.width.measure(s);
        if used > self.width.usable() {
            return Err(fmt::Error);
        }
        self.used = used;
        self.text.push_str(s);
        Ok(())
    }
}

/// Formats `args` if the result fits the `width` buffer.
///
/// Returns `None` when the message is too long or a formatting
/// implementation reports an error.
#[must_use]
pub fn format_bounded(width: Width, args: fmt::Arguments<'_>) -> Option<String> {
    if let Some(s) = args.as_str() {
        return (width.measure(s) <= width.usable()).then(|| s.to_string());
    }

    let mut buffer = BoundedBuffer {
        width,
        used: 0,
        text: String::new(),
    };
    buffer.write_fmt(args).ok()?;
    Some(buffer.text)
}
