//! Non-interactive output: print the decorated text with ANSI styling.

use crate::config::Palette;
use crossterm::style::{Attribute, Color as CColor, ContentStyle};
use ratatui::style::{Color, Modifier, Style};
use std::io::{self, Write};
use std::process::ExitCode;
use vkinfo_core::{DecoratedText, DiagnosticProvider, Notice, SearchSession};

fn to_crossterm(color: Color) -> CColor {
    match color {
        Color::Reset => CColor::Reset,
        Color::Black => CColor::Black,
        Color::Red => CColor::DarkRed,
        Color::Green => CColor::DarkGreen,
        Color::Yellow => CColor::DarkYellow,
        Color::Blue => CColor::DarkBlue,
        Color::Magenta => CColor::DarkMagenta,
        Color::Cyan => CColor::DarkCyan,
        Color::Gray => CColor::Grey,
        Color::DarkGray => CColor::DarkGrey,
        Color::LightRed => CColor::Red,
        Color::LightGreen => CColor::Green,
        Color::LightYellow => CColor::Yellow,
        Color::LightBlue => CColor::Blue,
        Color::LightMagenta => CColor::Magenta,
        Color::LightCyan => CColor::Cyan,
        Color::White => CColor::White,
        Color::Rgb(r, g, b) => CColor::Rgb { r, g, b },
        Color::Indexed(i) => CColor::AnsiValue(i),
    }
}

fn content_style(style: Style) -> ContentStyle {
    let mut out = ContentStyle::new();
    out.foreground_color = style.fg.map(to_crossterm);
    out.background_color = style.bg.map(to_crossterm);
    if style.add_modifier.contains(Modifier::BOLD) {
        out.attributes.set(Attribute::Bold);
    }
    out
}

/// Write `decorated` to `out`, styling highlighted segments when `styled` is set.
pub fn write_decorated<W: Write>(
    out: &mut W,
    decorated: &DecoratedText,
    palette: &Palette,
    styled: bool,
) -> io::Result<()> {
    if !styled {
        return out.write_all(decorated.text().as_bytes());
    }

    for (i, line) in decorated.lines().iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        for run in &line.runs {
            if run.emphasis.is_marked() {
                let style = palette.style_for(run.emphasis.depth, run.emphasis.current);
                write!(out, "{}", content_style(style).apply(run.text.as_str()))?;
            } else {
                out.write_all(run.text.as_bytes())?;
            }
        }
    }
    Ok(())
}

/// Load the text, optionally search it, and print it.
///
/// Returns a failure exit code when a query was given and nothing matched.
pub fn run<P: DiagnosticProvider>(
    provider: P,
    palette: &Palette,
    query: Option<&str>,
    styled: bool,
) -> anyhow::Result<ExitCode> {
    let (mut session, notice) = SearchSession::open(provider);
    if let Some(failure @ Notice::ProviderFailed(_)) = &notice {
        eprintln!("{failure}");
    }

    let mut code = ExitCode::SUCCESS;
    if let Some(query) = query {
        match session.submit(query) {
            Some(notice @ Notice::NoMatch { .. }) => {
                eprintln!("{notice}");
                code = ExitCode::FAILURE;
            }
            Some(notice) => eprintln!("{notice}"),
            None => {}
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_decorated(&mut out, session.decorated(), palette, styled)?;
    out.flush()?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vkinfo_core::{render, search};

    const TEXT: &str = "Device Name: Adreno\nDevice ID: 1\n";

    fn decorated(query: &str) -> DecoratedText {
        render(TEXT, &search(TEXT, query))
    }

    #[test]
    fn test_unstyled_output_is_verbatim() {
        let mut out = Vec::new();
        write_decorated(&mut out, &decorated("device"), &Palette::default(), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), TEXT);
    }

    #[test]
    fn test_styled_output_marks_matches() {
        let mut out = Vec::new();
        write_decorated(&mut out, &decorated("adreno"), &Palette::default(), true).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("Adreno"));
        assert!(out.starts_with("Device Name: "));
        assert!(out.ends_with("Device ID: 1\n"));
    }

    #[test]
    fn test_styled_output_without_matches_is_plain() {
        let mut out = Vec::new();
        write_decorated(&mut out, &decorated("xyz"), &Palette::default(), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), TEXT);
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(to_crossterm(Color::Yellow), CColor::DarkYellow);
        assert_eq!(to_crossterm(Color::LightRed), CColor::Red);
        assert_eq!(
            to_crossterm(Color::Rgb(1, 2, 3)),
            CColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
