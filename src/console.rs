use bmpc_text::{TextColor, TextComponent};
use clap::ValueEnum;
use owo_colors::{OwoColorize, Style};

/// How reply lines are written to the terminal.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Colours as terminal escape codes
    #[default]
    Ansi,
    /// Text only
    Plain,
    /// Chat component JSON, as a server would send it
    Json,
}

fn ansi_style(component: &TextComponent) -> Style {
    let mut style = Style::new();
    let rgb = match &component.color {
        Some(TextColor::ColorCode(code)) => code.rgb(),
        Some(TextColor::Hex(hex)) => u32::from_str_radix(hex.trim_start_matches('#'), 16).ok(),
        None => None,
    };
    if let Some(rgb) = rgb {
        style = style.truecolor((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
    }
    if component.bold {
        style = style.bold();
    }
    if component.italic {
        style = style.italic();
    }
    if component.underlined {
        style = style.underline();
    }
    if component.strikethrough {
        style = style.strikethrough();
    }
    if component.obfuscated {
        style = style.dimmed();
    }
    style
}

fn push_ansi(components: &[TextComponent], out: &mut String) {
    for component in components {
        if component.is_text_only() {
            out.push_str(&component.text);
        } else if !component.text.is_empty() {
            out.push_str(&component.text.style(ansi_style(component)).to_string());
        }
        push_ansi(&component.extra, out);
    }
}

/// Turns a `§` coded chat line into terminal escape codes.
pub fn to_ansi(line: &str) -> String {
    let mut out = String::new();
    push_ansi(&TextComponent::from_legacy_text(line), &mut out);
    out
}

/// Wraps a `§` coded line in a single root component.
pub fn to_json(line: &str) -> String {
    let root = TextComponent {
        extra: TextComponent::from_legacy_text(line),
        ..Default::default()
    };
    root.encode_json()
}

pub fn print_lines(lines: &[String], format: OutputFormat) {
    for line in lines {
        let line = match format {
            OutputFormat::Ansi => to_ansi(line),
            OutputFormat::Plain => bmpc_text::to_plain_text(&TextComponent::from_legacy_text(line)),
            OutputFormat::Json => to_json(line),
        };
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(to_ansi("hello"), "hello");
        assert_eq!(to_ansi(""), "");
    }

    #[test]
    fn colored_text_is_escaped() {
        let ansi = to_ansi("§aVisible");
        assert!(ansi.contains("Visible"));
        assert!(ansi.starts_with('\u{1b}'));
        assert!(!ansi.contains('§'));
    }

    #[test]
    fn json_nests_the_line_under_a_root() {
        assert_eq!(
            to_json("§6Hi"),
            r#"{"text":"","extra":[{"text":"Hi","color":"gold"}]}"#
        );
    }
}
