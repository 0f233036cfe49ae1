//! Line-oriented parser for music grid markdown.
//!
//! Every line is classified on its own; nothing spans lines. Parsing never
//! fails: a line that matches no rule becomes [`Block::Unrecognized`] so the
//! author sees the mistake in the rendered page.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Bar, BarBlock, BarItem, BarSize, BarlineKind, Block, Chord, Grid, SectionItem};

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#([^#]+)$").unwrap());
static SUBTITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##([^#]+)$").unwrap());
static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?i:author:)(.+)$").unwrap());
static COPYRIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:copyright:)(.+)$").unwrap());
static VSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^%vspace-?(.*)%$").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<.*>$").unwrap());
static SECTION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-(.*)$").unwrap());
static GRID_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d/\d)?\s*[|\[\]].*[|\[\]]$").unwrap());

static MEASURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\d/\d\s+)?[|\[\]][^|\[\]]*").unwrap());
static CASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());
static BARLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(:)?([|\[\]])(:)?").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d)/(\d)").unwrap());
static PAUSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-(\d+)-").unwrap());
static PENTAGRAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^==+").unwrap());
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.(?i:i?([ls]))").unwrap());

static SECTION_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*?)\](?:\s*x(\d+))?").unwrap());

/// Parse a music grid markdown document.
pub fn parse(source: &str) -> Grid {
    let mut grid = Grid::default();

    for raw in source.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        parse_line(line, &mut grid);
    }

    tracing::debug!(blocks = grid.blocks.len(), "Parsed grid document");
    grid
}

/// Drop a trailing `// comment`. The last `//` on the line starts the comment.
fn strip_comment(line: &str) -> &str {
    match line.rfind("//") {
        Some(index) => &line[..index],
        None => line,
    }
}

fn parse_line(line: &str, grid: &mut Grid) {
    let info = &mut grid.info;

    if let Some(caps) = TITLE_RE.captures(line) {
        info.title = Some(caps[1].trim().to_owned());
    } else if let Some(caps) = SUBTITLE_RE.captures(line) {
        info.subtitle = Some(caps[1].trim().to_owned());
    } else if let Some(caps) = AUTHOR_RE.captures(line) {
        info.author = Some(caps[1].trim().to_owned());
    } else if let Some(caps) = COPYRIGHT_RE.captures(line) {
        info.copyright = Some(caps[1].trim().to_owned());
    } else if let Some(caps) = VSPACE_RE.captures(line) {
        let kind = caps[1].trim().to_lowercase();
        grid.blocks.push(Block::Vspace((!kind.is_empty()).then_some(kind)));
    } else if let Some(caps) = SECTION_LINE_RE.captures(line) {
        grid.blocks.push(Block::Section(parse_section(caps[1].trim())));
    } else if GRID_ROW_RE.is_match(line) {
        grid.blocks.push(Block::Row(parse_row(line)));
    } else if TAG_RE.is_match(line) {
        grid.blocks.push(Block::RawHtml(line.to_owned()));
    } else {
        tracing::debug!(line, "Unrecognized grid line");
        grid.blocks.push(Block::Unrecognized(line.to_owned()));
    }
}

/// Parse a section header line (without its leading `-`).
fn parse_section(text: &str) -> Vec<SectionItem> {
    let mut items = Vec::new();
    let mut comment: Vec<&str> = Vec::new();

    for atom in text.split_whitespace() {
        let name = SECTION_NAME_RE.captures(atom);
        let is_arrow = atom.starts_with("->");

        if !comment.is_empty() && (name.is_some() || is_arrow) {
            items.push(SectionItem::Comment(comment.join(" ")));
            comment.clear();
        }

        if let Some(caps) = name {
            items.push(SectionItem::Name(caps[1].to_owned()));
            if let Some(rep) = caps.get(2) {
                items.push(SectionItem::Repetitions(rep.as_str().to_owned()));
            }
        } else if is_arrow {
            items.push(SectionItem::Arrow);
        } else {
            comment.push(atom);
        }
    }

    if !comment.is_empty() {
        items.push(SectionItem::Comment(comment.join(" ")));
    }
    items
}

/// Split a grid row into measures and parse each one.
///
/// Every measure starts at a barline character. The closing barline of the
/// row is folded into the last measure.
fn parse_row(text: &str) -> Vec<BarBlock> {
    let mut measures: Vec<String> = MEASURE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect();

    if measures.len() >= 2
        && let Some(closing) = measures.pop()
        && let Some(last) = measures.last_mut()
    {
        last.push_str(&closing);
    }

    measures.iter().map(|m| parse_measure(m)).collect()
}

/// Split a measure into tokens, keeping `( ... )` case labels whole.
fn tokenize_measure(measure: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for case in CASE_RE.find_iter(measure) {
        tokens.extend(measure[last..case.start()].split_whitespace());
        tokens.push(case.as_str());
        last = case.end();
    }
    tokens.extend(measure[last..].split_whitespace());
    tokens
}

fn parse_measure(measure: &str) -> BarBlock {
    let mut block = BarBlock {
        size: BarSize::Normal,
        case: None,
        bar: Bar::new(),
    };

    for token in tokenize_measure(measure) {
        parse_token(token, &mut block);
    }
    block
}

fn parse_token(token: &str, block: &mut BarBlock) {
    let bar = &mut block.bar;

    if token == ":" {
        bar.push(BarItem::Repeat);
    } else if let Some(caps) = BARLINE_RE.captures(token) {
        if caps.get(1).is_some() {
            bar.push(BarItem::Repeat);
        }
        if let Some(kind) = caps[2].chars().next().and_then(BarlineKind::from_char) {
            bar.push(BarItem::Barline(kind));
        }
        if caps.get(3).is_some() {
            bar.push(BarItem::Repeat);
        }
    } else if let Some(caps) = TIME_RE.captures(token) {
        bar.push(BarItem::Time {
            divisions: caps[1].to_owned(),
            value: caps[2].to_owned(),
        });
    } else if let Some(case) = CASE_RE.find(token).filter(|m| m.start() == 0) {
        let inner = case.as_str();
        block.case = Some(inner[1..inner.len() - 1].to_owned());
    } else if let Some(caps) = PAUSE_RE.captures(token) {
        bar.push(BarItem::Pause(caps[1].to_owned()));
        block.size = BarSize::Short;
    } else if PENTAGRAM_RE.is_match(token) {
        bar.push(BarItem::Pentagram);
        bar.push_chord(Chord::Empty);
    } else if token.starts_with('-') {
        bar.push_chord(Chord::Empty);
    } else if token.starts_with('%') {
        bar.push_chord(Chord::Same);
    } else if let Some(caps) = SIZE_RE.captures(token) {
        block.size = if caps[1].eq_ignore_ascii_case("l") {
            BarSize::Long
        } else {
            BarSize::Short
        };
    } else {
        bar.push_chord(Chord::Named(token.to_owned()));
    }
}
