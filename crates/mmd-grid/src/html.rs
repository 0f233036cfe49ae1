//! HTML rendering for grid documents.
//!
//! Text from the source is emitted as-is: the format allows inline HTML, so
//! nothing is escaped except the server address injected into the script.

use crate::ast::{Bar, BarBlock, BarItem, Block, Chord, Grid, SectionItem};

/// Stylesheet inlined into every page.
const GRID_CSS: &str = include_str!("../assets/grid.css");

/// Browser-side change poller, inlined when a live server address is set.
const LIVE_RELOAD_JS: &str = include_str!("../assets/live-reload.js");

/// Options for [`Grid::to_html`].
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Base address of the live preview server. When set, the page polls
    /// `{address}/is_changed/` and reloads itself after a recompile.
    pub live_server_address: Option<String>,
}

impl RenderOptions {
    /// Options for a page served by a live preview server.
    #[must_use]
    pub fn live(address: impl Into<String>) -> Self {
        Self {
            live_server_address: Some(address.into()),
        }
    }
}

impl Grid {
    /// Render the document as a standalone HTML page.
    pub fn to_html(&self, options: &RenderOptions) -> String {
        let mut out = vec![
            "<!DOCTYPE html>".to_owned(),
            r#"<html lang="en" dir="ltr">"#.to_owned(),
            "<head>".to_owned(),
            r#"<meta charset="utf-8">"#.to_owned(),
        ];
        if let Some(title) = &self.info.title {
            out.push(format!("<title>{title}</title>"));
        }
        out.push(format!("<style>\n{GRID_CSS}</style>"));
        out.push("</head>".to_owned());
        out.push("<body>".to_owned());
        out.push(r#"<div class="page">"#.to_owned());

        out.push(r#"<div class="header">"#.to_owned());
        if let Some(title) = &self.info.title {
            out.push(format!("<h1>{title}</h1>"));
        }
        if let Some(subtitle) = &self.info.subtitle {
            out.push(format!("<h2>{subtitle}</h2>"));
        }
        if let Some(author) = &self.info.author {
            out.push(format!(r#"<p class="author">{author}</p>"#));
        }
        out.push("</div>".to_owned());

        out.extend(self.blocks.iter().map(render_block));

        if let Some(copyright) = &self.info.copyright {
            out.push(format!(r#"<div class="footer">&reg;{copyright}</div>"#));
        }
        out.push("</div>".to_owned());

        if let Some(address) = &options.live_server_address {
            out.push(live_reload_script(address));
        }

        out.push("</body>".to_owned());
        out.push("</html>".to_owned());
        out.join("\n")
    }
}

/// Inline script that sets `server_address` and starts the poller.
fn live_reload_script(address: &str) -> String {
    let address = address.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "<script type=\"text/javascript\">\nvar server_address = \"{address}\";\n{LIVE_RELOAD_JS}</script>"
    )
}

/// Wrap rendered children in a container, one indented child per line.
fn group(open: &str, close: &str, children: impl IntoIterator<Item = String>) -> String {
    let body: Vec<String> = children.into_iter().map(|c| format!("\t{c}")).collect();
    format!("{open}\n{}\n{close}", body.join("\n"))
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Vspace(Some(kind)) => format!(r#"<div class="vspace-{kind}"></div>"#),
        Block::Vspace(None) => r#"<div class="vspace"></div>"#.to_owned(),
        Block::RawHtml(html) => html.clone(),
        Block::Section(items) => group(
            r#"<section class="tune-section">"#,
            "</section>",
            items.iter().map(render_section_item),
        ),
        Block::Row(measures) => group(
            r#"<div class="grid-row">"#,
            "</div>",
            measures.iter().map(render_bar_block),
        ),
        Block::Unrecognized(line) => {
            format!(r#"<span class="error">SyntaxError: "{line}"</span>"#)
        }
    }
}

fn render_section_item(item: &SectionItem) -> String {
    match item {
        SectionItem::Name(name) => format!(r#"<p class="name">{name}</p>"#),
        SectionItem::Repetitions(n) => format!(r#"<p class="repeats">x{n}</p>"#),
        SectionItem::Arrow => r#"<p class="debug arrow">&rarr;</p>"#.to_owned(),
        SectionItem::Comment(text) => format!(r#"<span class="note">{text}</span>"#),
    }
}

fn render_bar_block(block: &BarBlock) -> String {
    let open = format!(r#"<div class="bar-block {}">"#, block.size.class());
    let case = block.case.as_deref().map(|text| {
        // Volta labels "1." and "2." open a new ending.
        let class = if text.starts_with(['1', '2']) {
            "case case-start"
        } else {
            "case"
        };
        format!(r#"<div class="{class}">{text}</div>"#)
    });
    group(&open, "</div>", case.into_iter().chain([render_bar(&block.bar)]))
}

fn render_bar(bar: &Bar) -> String {
    group(
        r#"<div class="bar">"#,
        "</div>",
        bar.items().iter().map(render_bar_item),
    )
}

fn render_bar_item(item: &BarItem) -> String {
    match item {
        BarItem::Barline(kind) => format!(r#"<div class="barline {}"></div>"#, kind.class()),
        BarItem::Repeat => r#"<div class="repeat">:</div>"#.to_owned(),
        BarItem::Time { divisions, value } => {
            format!(r#"<div class="time"><span>{divisions}</span><span>{value}</span></div>"#)
        }
        BarItem::Pause(count) => format!(
            r#"<div class="pause"><div class="pause-line"></div><div class="pause-number"> {count} </div><div class="pause-line"></div></div>"#
        ),
        BarItem::Pentagram => format!(
            r#"<div class="pentagram">{}</div>"#,
            r#"<div class="pentagram-line"></div>"#.repeat(5)
        ),
        BarItem::Chords(chords) => group(
            r#"<div class="chords">"#,
            "</div>",
            chords.iter().map(render_chord),
        ),
    }
}

fn render_chord(chord: &Chord) -> String {
    match chord {
        Chord::Named(name) => format!(r#"<div class="chord">{name}</div>"#),
        Chord::Empty => r#"<div class="chord"></div>"#.to_owned(),
        Chord::Same => r#"<div class="chord same-bar">%</div>"#.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_rendering() {
        let grid = parse("# Title\n## Sub\nauthor: Someone\ncopyright: 2020 Me\n");
        let html = grid.to_html(&RenderOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Title</title>"));
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h2>Sub</h2>"));
        assert!(html.contains(r#"<p class="author">Someone</p>"#));
        assert!(html.contains(r#"<div class="footer">&reg;2020 Me</div>"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_no_script_without_live_server() {
        let html = parse("| C |").to_html(&RenderOptions::default());
        assert!(!html.contains("<script"));
        assert!(!html.contains("is_changed"));
    }

    #[test]
    fn test_live_server_script_injected() {
        let html = parse("| C |").to_html(&RenderOptions::live("http://localhost:8000"));

        assert!(html.contains(r#"var server_address = "http://localhost:8000";"#));
        assert!(html.contains("/is_changed/"));
        let script = html.find("<script").unwrap();
        assert!(script < html.find("</body>").unwrap());
    }

    #[test]
    fn test_live_server_address_is_escaped() {
        let script = live_reload_script(r#"http://x/"quoted"\"#);
        assert!(script.contains(r#"var server_address = "http://x/\"quoted\"\\";"#));
    }

    #[test]
    fn test_chord_block_rendering() {
        let grid = parse("| C % - |");
        let Block::Row(measures) = &grid.blocks[0] else {
            panic!("expected a row");
        };

        assert_eq!(
            render_bar_block(&measures[0]),
            "<div class=\"bar-block \">\n\
             \t<div class=\"bar\">\n\
             \t<div class=\"barline \"></div>\n\
             \t<div class=\"chords\">\n\
             \t<div class=\"chord\">C</div>\n\
             \t<div class=\"chord same-bar\">%</div>\n\
             \t<div class=\"chord\"></div>\n\
             </div>\n\
             \t<div class=\"barline \"></div>\n\
             </div>\n\
             </div>"
        );
    }

    #[test]
    fn test_case_classes() {
        let grid = parse("| (1.) C | (coda) D |");
        let html = grid.to_html(&RenderOptions::default());

        assert!(html.contains(r#"<div class="case case-start">1.</div>"#));
        assert!(html.contains(r#"<div class="case">coda</div>"#));
    }

    #[test]
    fn test_section_and_error_rendering() {
        let grid = parse("- [Verse]x2 -> [Chorus]\nnonsense\n%vspace-small%");
        let html = grid.to_html(&RenderOptions::default());

        assert!(html.contains(r#"<section class="tune-section">"#));
        assert!(html.contains(r#"<p class="name">Verse</p>"#));
        assert!(html.contains(r#"<p class="repeats">x2</p>"#));
        assert!(html.contains(r#"<p class="debug arrow">&rarr;</p>"#));
        assert!(html.contains(r#"<span class="error">SyntaxError: "nonsense"</span>"#));
        assert!(html.contains(r#"<div class="vspace-small"></div>"#));
    }

    #[test]
    fn test_time_pause_and_pentagram_rendering() {
        let html = parse("3/4 | -2- | == |").to_html(&RenderOptions::default());

        assert!(html.contains(r#"<div class="time"><span>3</span><span>4</span></div>"#));
        assert!(html.contains(r#"<div class="bar-block short">"#));
        assert!(html.contains(r#"<div class="pause-number"> 2 </div>"#));
        assert_eq!(html.matches(r#"<div class="pentagram-line"></div>"#).count(), 5);
    }
}
