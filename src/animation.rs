//! Animation descriptors: `duration,x,y,dx,dy|duration,x,y,dx,dy|...`.

use std::fmt;

use macroquad::math::UVec2;

use crate::props::parse_canonical_u32;

const FRAME_FIELD_COUNT: usize = 5;

/// One frame of a tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Always > 0
    pub duration_ms: u32,
    /// Atlas cell of the animated sprite
    pub tile: UVec2,
    /// Offset (in cells) from `tile` shown during this frame
    pub offset: UVec2,
}

impl Frame {
    /// Atlas cell displayed during this frame, `None` if `tile + offset` overflows.
    pub fn cell(&self) -> Option<UVec2> {
        Some(UVec2::new(
            self.tile.x.checked_add(self.offset.x)?,
            self.tile.y.checked_add(self.offset.y)?,
        ))
    }
}

/// A non-empty, looping sequence of frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<Frame>,
}

/// Why an animation descriptor was rejected. `frame` is the 0-based record index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAnimationError {
    /// A record does not have five fields
    FieldCount {
        /// Record index
        frame: usize,
        /// Fields found
        found: usize,
    },
    /// A field is not a canonical unsigned integer
    NotANumber {
        /// Record index
        frame: usize,
        /// Offending text
        value: String,
    },
    /// A record has a duration of 0
    ZeroDuration {
        /// Record index
        frame: usize,
    },
}

impl fmt::Display for ParseAnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAnimationError::FieldCount { frame, found } => write!(
                f,
                "frame {} has {} fields, expected {}",
                frame, found, FRAME_FIELD_COUNT
            ),
            ParseAnimationError::NotANumber { frame, value } => {
                write!(f, "frame {} has non-numeric field '{}'", frame, value)
            }
            ParseAnimationError::ZeroDuration { frame } => {
                write!(f, "frame {} has a zero duration", frame)
            }
        }
    }
}

impl std::error::Error for ParseAnimationError {}

fn parse_frame(index: usize, record: &str) -> Result<Frame, ParseAnimationError> {
    let fields: Vec<&str> = record.split(',').collect();
    if fields.len() != FRAME_FIELD_COUNT {
        return Err(ParseAnimationError::FieldCount {
            frame: index,
            found: fields.len(),
        });
    }

    let mut values = [0u32; FRAME_FIELD_COUNT];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = parse_canonical_u32(field).ok_or_else(|| ParseAnimationError::NotANumber {
            frame: index,
            value: (*field).to_owned(),
        })?;
    }

    let [duration_ms, x, y, dx, dy] = values;
    if duration_ms == 0 {
        return Err(ParseAnimationError::ZeroDuration { frame: index });
    }

    Ok(Frame {
        duration_ms,
        tile: UVec2::new(x, y),
        offset: UVec2::new(dx, dy),
    })
}

impl Animation {
    /// Empty input means "not animated". Only canonical text is accepted, so
    /// `to_string()` on the result reproduces `s`.
    pub fn parse(s: &str) -> Result<Option<Self>, ParseAnimationError> {
        if s.is_empty() {
            return Ok(None);
        }
        let frames = s
            .split('|')
            .enumerate()
            .map(|(i, record)| parse_frame(i, record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Animation { frames }))
    }

    /// Returns `None` when `frames` is empty or any duration is zero.
    pub fn from_frames(frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() || frames.iter().any(|f| f.duration_ms == 0) {
            return None;
        }
        Some(Animation { frames })
    }

    /// Frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames, at least 1.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false` for a parsed animation.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Length of one loop.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }

    /// Frame shown `elapsed_ms` after the animation started, looping forever.
    pub fn frame_at(&self, elapsed_ms: u64) -> &Frame {
        let mut t = elapsed_ms % self.total_duration_ms();
        for frame in &self.frames {
            let d = u64::from(frame.duration_ms);
            if t < d {
                return frame;
            }
            t -= d;
        }
        // durations are non-zero, so the loop always returns
        &self.frames[self.frames.len() - 1]
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(
                f,
                "{},{},{},{},{}",
                frame.duration_ms, frame.tile.x, frame.tile.y, frame.offset.x, frame.offset.y
            )?;
        }
        Ok(())
    }
}
