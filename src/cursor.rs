//! Summary: Shared cursor state machine for bidirectional traversal.
//! Copyright (c) YOAB. All rights reserved.
//!
//! Both tree cursors run the same three-state machine: `AtBegin` sits one
//! position before the first record, `Mid` points at a live record, and
//! `AtEnd` sits one past the last. Advancing the begin sentinel lands on the
//! first record; retreating the end sentinel lands on the last.

use crate::error::{Error, Result};

/// Position class of a tree cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// One position before the first record.
    AtBegin,
    /// Pointing at a live record.
    Mid,
    /// One position past the last record.
    AtEnd,
}

impl CursorState {
    /// Returns the numeric tag for this state (-1, 0 or 1).
    #[inline]
    pub fn tag(self) -> i8 {
        match self {
            CursorState::AtBegin => -1,
            CursorState::Mid => 0,
            CursorState::AtEnd => 1,
        }
    }
}

impl TryFrom<i8> for CursorState {
    type Error = Error;

    /// Decodes a numeric state tag: -1 is begin, 0 is mid, 1 is end.
    fn try_from(tag: i8) -> Result<Self> {
        match tag {
            -1 => Ok(CursorState::AtBegin),
            0 => Ok(CursorState::Mid),
            1 => Ok(CursorState::AtEnd),
            _ => Err(Error::InvalidIterator { tag }),
        }
    }
}
