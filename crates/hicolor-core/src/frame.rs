use std::time::Duration;

use crate::palette::Palette;

/// GIF disposal method (spec §3 glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    Unspecified,
    DoNotDispose,
    RestoreToBackground,
    RestoreToPrevious,
}

impl Disposal {
    /// Value of the 3-bit disposal field in the Graphic Control Extension.
    pub fn code(self) -> u8 {
        match self {
            Disposal::Unspecified => 0,
            Disposal::DoNotDispose => 1,
            Disposal::RestoreToBackground => 2,
            Disposal::RestoreToPrevious => 3,
        }
    }
}

/// {NotSet, Set(u16)} where 0 means infinite looping (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCount {
    NotSet,
    Set(u16),
}

/// One 8-bit indexed sub-frame of the output animation (spec §3).
#[derive(Debug, Clone)]
pub struct Frame {
    pub offset: (u16, u16),
    pub width: u16,
    pub height: u16,
    /// Row-major palette indices, length `width * height`.
    pub indices: Vec<u8>,
    pub palette: Palette,
    pub duration: Duration,
    pub disposal: Disposal,
    pub transparent_color_index: Option<u8>,
    pub use_local_color_table: bool,
}

impl Frame {
    pub const MIN_DURATION: Duration = Duration::from_millis(10);

    pub fn new(width: u16, height: u16, palette: Palette) -> Self {
        Frame {
            offset: (0, 0),
            width,
            height,
            indices: vec![0u8; width as usize * height as usize],
            palette,
            duration: Frame::MIN_DURATION,
            disposal: Disposal::Unspecified,
            transparent_color_index: None,
            use_local_color_table: false,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
