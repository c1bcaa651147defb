//! Wire protocol: inbound requests and outbound replies.
//!
//! One datagram in, one datagram out.  The only recognised request is
//! the exact ASCII payload `GET COLOR`; the reply is either
//! `COLOR <r> <g> <b>` or `ERROR`.

use core::fmt::{self, Write};

/// The one request the service understands, byte for byte.
pub const GET_COLOR: &[u8] = b"GET COLOR";

const COLOR_PREFIX: &str = "COLOR ";
const ERROR_REPLY: &str = "ERROR";

/// Longest reply: `COLOR 255 255 255`.
pub const MAX_REPLY_LEN: usize = 24;

/// An RGB colour triple, in fixed red, green, blue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// A decoded inbound datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    GetColor,
    /// Anything else, including an empty payload.
    Invalid,
}

impl Request {
    /// Exact byte match: no trimming, no case folding.
    pub fn decode(payload: &[u8]) -> Self {
        if payload == GET_COLOR {
            Self::GetColor
        } else {
            Self::Invalid
        }
    }
}

/// An outbound reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Color(Rgb),
    Error,
}

impl Reply {
    /// Render the reply without touching the heap.
    pub fn encode(&self) -> heapless::String<MAX_REPLY_LEN> {
        let mut out = heapless::String::new();
        // Cannot overflow: the longest reply is 17 bytes.
        let _ = match self {
            Self::Color(c) => write!(out, "{COLOR_PREFIX}{} {} {}", c.r, c.g, c.b),
            Self::Error => out.write_str(ERROR_REPLY),
        };
        out
    }

    /// Parse a reply as received by a client.  `None` if the payload is
    /// neither a well-formed `COLOR r g b` nor `ERROR`.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        let text = core::str::from_utf8(payload).ok()?;
        if text == ERROR_REPLY {
            return Some(Self::Error);
        }
        let mut fields = text.strip_prefix(COLOR_PREFIX)?.split(' ');
        let mut next = || -> Option<u8> {
            let field = fields.next()?;
            // Reject "+5", "007" and the like; replies never carry them.
            if field.is_empty()
                || !field.bytes().all(|b| b.is_ascii_digit())
                || (field.len() > 1 && field.starts_with('0'))
            {
                return None;
            }
            field.parse().ok()
        };
        let color = Rgb::new(next()?, next()?, next()?);
        if fields.next().is_some() {
            return None;
        }
        Some(Self::Color(color))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
