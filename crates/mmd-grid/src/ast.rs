//! Document model for a parsed music grid.

/// A parsed grid document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    /// Header and footer information.
    pub info: GridInfo,
    /// Body blocks in source order.
    pub blocks: Vec<Block>,
}

/// Document header fields. The last occurrence of each field wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub copyright: Option<String>,
}

/// A top-level block of the grid body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Vertical space, optionally with a size kind (`%vspace-big%`).
    Vspace(Option<String>),
    /// A raw HTML line copied to the output untouched.
    RawHtml(String),
    /// A section header line (`- [A] x2 -> [B]`).
    Section(Vec<SectionItem>),
    /// A row of measures.
    Row(Vec<BarBlock>),
    /// A line no rule matched. Rendered as a visible syntax error.
    Unrecognized(String),
}

/// Item of a section header line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionItem {
    Name(String),
    Repetitions(String),
    Arrow,
    Comment(String),
}

/// Display width of a measure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarSize {
    #[default]
    Normal,
    Short,
    Long,
}

impl BarSize {
    /// CSS class suffix for the measure container.
    pub fn class(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

/// One measure plus its optional volta ("case") label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BarBlock {
    pub size: BarSize,
    pub case: Option<String>,
    pub bar: Bar,
}

/// Barline shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarlineKind {
    Single,
    DoubleStart,
    DoubleEnd,
}

impl BarlineKind {
    /// Map a barline character to its kind.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '|' => Some(Self::Single),
            '[' => Some(Self::DoubleStart),
            ']' => Some(Self::DoubleEnd),
            _ => None,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Single => "",
            Self::DoubleStart => "double-start",
            Self::DoubleEnd => "double-end",
        }
    }
}

/// A chord slot inside a measure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Chord {
    Named(String),
    Empty,
    /// Repeat of the previous measure (`%`).
    Same,
}

/// Element of a measure, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BarItem {
    Barline(BarlineKind),
    Repeat,
    Time { divisions: String, value: String },
    Pause(String),
    Pentagram,
    Chords(Vec<Chord>),
}

/// Contents of a single measure.
///
/// Chords are collected into one [`BarItem::Chords`] group that sits where
/// the first chord was pushed, so barlines before and after keep their place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bar {
    items: Vec<BarItem>,
    chord_group: Option<usize>,
}

impl Bar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a non-chord item.
    pub fn push(&mut self, item: BarItem) {
        if let BarItem::Chords(chords) = item {
            for chord in chords {
                self.push_chord(chord);
            }
            return;
        }
        self.items.push(item);
    }

    /// Append a chord to the measure's chord group.
    pub fn push_chord(&mut self, chord: Chord) {
        let index = *self.chord_group.get_or_insert_with(|| {
            self.items.push(BarItem::Chords(Vec::new()));
            self.items.len() - 1
        });
        if let Some(BarItem::Chords(chords)) = self.items.get_mut(index) {
            chords.push(chord);
        }
    }

    pub fn items(&self) -> &[BarItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chords_grouped_at_first_position() {
        let mut bar = Bar::new();
        bar.push(BarItem::Barline(BarlineKind::Single));
        bar.push_chord(Chord::Named("C".to_owned()));
        bar.push(BarItem::Repeat);
        bar.push_chord(Chord::Named("G".to_owned()));

        assert_eq!(
            bar.items(),
            &[
                BarItem::Barline(BarlineKind::Single),
                BarItem::Chords(vec![
                    Chord::Named("C".to_owned()),
                    Chord::Named("G".to_owned())
                ]),
                BarItem::Repeat,
            ]
        );
    }

    #[test]
    fn test_push_chords_item_merges_into_group() {
        let mut bar = Bar::new();
        bar.push_chord(Chord::Empty);
        bar.push(BarItem::Chords(vec![Chord::Same]));

        assert_eq!(
            bar.items(),
            &[BarItem::Chords(vec![Chord::Empty, Chord::Same])]
        );
    }

    #[test]
    fn test_barline_kind_from_char() {
        assert_eq!(BarlineKind::from_char('|'), Some(BarlineKind::Single));
        assert_eq!(BarlineKind::from_char('['), Some(BarlineKind::DoubleStart));
        assert_eq!(BarlineKind::from_char(']'), Some(BarlineKind::DoubleEnd));
        assert_eq!(BarlineKind::from_char('x'), None);
    }
}
