//! A MiniMessage-style tag dialect: `<red>text</red>`, `<bold>`, `<#ff00aa>`,
//! `<color:gold>`, `<reset>`, `<newline>`. Tags that are not understood are
//! kept as literal text.

use crate::{ColorCode, Style, TextColor, TextComponent};

enum Tag {
    Color(TextColor),
    Decoration(ColorCode),
    Reset,
    Newline,
}

fn parse_color(name: &str) -> Option<TextColor> {
    if name.starts_with('#') {
        return TextColor::parse_hex(name);
    }
    ColorCode::from_name(name).map(TextColor::ColorCode)
}

fn decoration(name: &str) -> Option<ColorCode> {
    Some(match name {
        "bold" | "b" => ColorCode::Bold,
        "italic" | "i" | "em" => ColorCode::Italic,
        "underlined" | "u" => ColorCode::Underline,
        "strikethrough" | "st" => ColorCode::Strikethrough,
        "obfuscated" | "obf" => ColorCode::Obfuscated,
        _ => return None,
    })
}

/// Returns the tag and the name a closing tag may use to end it.
fn parse_tag(name: &str) -> Option<(Tag, &'static str)> {
    if let Some(code) = decoration(name) {
        let kind = match code {
            ColorCode::Bold => "bold",
            ColorCode::Italic => "italic",
            ColorCode::Underline => "underlined",
            ColorCode::Strikethrough => "strikethrough",
            _ => "obfuscated",
        };
        return Some((Tag::Decoration(code), kind));
    }
    match name {
        "reset" => return Some((Tag::Reset, "reset")),
        "newline" | "br" => return Some((Tag::Newline, "newline")),
        _ => {}
    }
    let color_name = ["color:", "colour:", "c:"]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name);
    parse_color(color_name).map(|color| (Tag::Color(color), "color"))
}

struct Open {
    /// Name as written, e.g. `b` or `#ff0000`
    name: String,
    kind: &'static str,
    style: Style,
}

struct Parser {
    components: Vec<TextComponent>,
    stack: Vec<Open>,
    text: String,
}

impl Parser {
    fn style(&self) -> Style {
        self.stack
            .last()
            .map(|open| open.style.clone())
            .unwrap_or_default()
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.components.push(self.style().component(text));
        }
    }

    fn open(&mut self, name: &str, tag: Tag, kind: &'static str) {
        self.flush();
        let mut style = self.style();
        match tag {
            Tag::Color(color) => style.color = Some(color),
            Tag::Decoration(code) => {
                style.decorate(code);
            }
            Tag::Reset => {
                self.stack.clear();
                return;
            }
            Tag::Newline => {
                self.text.push('\n');
                return;
            }
        }
        self.stack.push(Open {
            name: name.to_string(),
            kind,
            style,
        });
    }

    /// Pops back to the innermost tag matching `name`. Closing tags without
    /// an open counterpart are dropped.
    fn close(&mut self, name: &str) {
        let kind = if name.is_empty() {
            None
        } else {
            parse_tag(name).map(|(_, kind)| kind)
        };
        let position = self.stack.iter().rposition(|open| {
            name.is_empty() || open.name == name || Some(open.kind) == kind
        });
        if let Some(position) = position {
            self.flush();
            self.stack.truncate(position);
        }
    }
}

pub fn parse_markup(input: &str) -> Vec<TextComponent> {
    let mut parser = Parser {
        components: Vec::new(),
        stack: Vec::new(),
        text: String::new(),
    };

    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];

        if c == '\\' {
            if let Some(escaped) = rest.strip_prefix('<') {
                parser.text.push('<');
                rest = escaped;
                continue;
            }
        }

        if c == '<' {
            if let Some(end) = rest.find('>') {
                let name = rest[..end].to_ascii_lowercase();
                // Tag names are never padded, `a < b > c` stays text
                let is_tag = !name.is_empty() && !name.contains(char::is_whitespace);
                if is_tag {
                    if let Some(closing) = name.strip_prefix('/') {
                        if closing.is_empty() || parse_tag(closing).is_some() {
                            parser.close(closing);
                            rest = &rest[end + 1..];
                            continue;
                        }
                    } else if let Some((tag, kind)) = parse_tag(&name) {
                        parser.open(&name, tag, kind);
                        rest = &rest[end + 1..];
                        continue;
                    }
                }
            }
        }

        parser.text.push(c);
    }
    parser.flush();
    parser.components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_legacy_string, to_plain_text};

    #[test]
    fn nested_tags() {
        let components = parse_markup("<green>Now <bold>visible</bold> on the map</green>!");
        assert_eq!(components.len(), 4);
        assert_eq!(components[1].text, "visible");
        assert!(components[1].bold);
        assert_eq!(
            components[1].color,
            Some(TextColor::ColorCode(ColorCode::Green))
        );
        assert!(!components[2].bold);
        assert_eq!(components[3].color, None);
    }

    #[test]
    fn aliases_close_by_kind() {
        let components = parse_markup("<b>a</bold>b");
        assert!(components[0].bold);
        assert!(!components[1].bold);
    }

    #[test]
    fn hex_and_color_prefix() {
        let components = parse_markup("<#FF0000>a<color:gold>b");
        assert_eq!(components[0].color, TextColor::parse_hex("#ff0000"));
        assert_eq!(
            components[1].color,
            Some(TextColor::ColorCode(ColorCode::Gold))
        );
    }

    #[test]
    fn unknown_tags_are_literal() {
        let components = parse_markup("<player> is <not a tag");
        assert_eq!(to_plain_text(&components), "<player> is <not a tag");
    }

    #[test]
    fn padded_tags_are_literal() {
        let components = parse_markup("1 < b > 2 </ b>");
        assert_eq!(to_plain_text(&components), "1 < b > 2 </ b>");
        assert!(components.iter().all(|component| !component.bold));
    }

    #[test]
    fn escaped_tag() {
        let components = parse_markup(r"\<red>text");
        assert_eq!(to_plain_text(&components), "<red>text");
        assert_eq!(components[0].color, None);
    }

    #[test]
    fn reset_clears_everything() {
        let components = parse_markup("<red><bold>a<reset>b");
        assert_eq!(components[1].style(), Style::default());
    }

    #[test]
    fn newline_tag() {
        assert_eq!(to_plain_text(&parse_markup("a<br>b")), "a\nb");
    }

    #[test]
    fn renders_as_legacy() {
        let components = parse_markup("<gold>BlueMap <gray>Player Control");
        assert_eq!(to_legacy_string(&components), "§6BlueMap §7Player Control");
    }
}
