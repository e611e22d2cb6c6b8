use crate::color::Color;

/// Ordered sequence of up to 256 colors (spec §3). Index 0 is reserved for
/// transparent in sub-frames produced by the hi-color layerer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new() -> Self {
        Palette { colors: Vec::new() }
    }

    pub fn from_colors(colors: Vec<Color>) -> Self {
        Palette { colors }
    }

    pub fn push(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    /// No duplicate ARGB values among the first `n` entries (spec §3
    /// invariant).
    pub fn has_distinct_argb(&self, n: usize) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.colors.iter().take(n).all(|c| seen.insert(c.argb_key()))
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Palette { colors }
    }
}

impl IntoIterator for Palette {
    type Item = Color;
    type IntoIter = std::vec::IntoIter<Color>;
    fn into_iter(self) -> Self::IntoIter {
        self.colors.into_iter()
    }
}
