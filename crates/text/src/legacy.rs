use crate::{is_valid_hex, ClickEvent, ColorCode, Style, TextColor, TextComponent, SECTION_SIGN};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://)?[a-zA-Z0-9\-]+(\.[a-zA-Z0-9\-]+)*\.[a-zA-Z]{2,}(/[a-zA-Z0-9.\-_#?+=&%/]*)?")
        .expect("url pattern is valid")
});

fn is_code_prefix(c: char) -> bool {
    c == '&' || c == SECTION_SIGN
}

/// Reads `rrggbb` after a `#`. Returns `None` without consuming anything if
/// the next six characters are not hex digits.
fn take_hex(rest: &str) -> Option<TextColor> {
    let digits = rest.get(..6)?;
    if !digits.chars().all(is_valid_hex) {
        return None;
    }
    TextColor::parse_hex(&format!("#{}", digits))
}

struct Builder {
    components: Vec<TextComponent>,
    style: Style,
    text: String,
}

impl Builder {
    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.components.push(self.style.component(text));
        }
    }

    /// A colour ends every decoration before it, like reset does.
    fn set_color(&mut self, color: Option<TextColor>) {
        self.flush();
        self.style = Style {
            color,
            ..Default::default()
        };
    }
}

pub(crate) fn parse_legacy(message: &str) -> Vec<TextComponent> {
    let mut builder = Builder {
        components: Vec::new(),
        style: Style::default(),
        text: String::new(),
    };

    let mut rest = message;
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];

        if is_code_prefix(c) {
            if let Some(hex) = rest.strip_prefix('#').and_then(take_hex) {
                builder.set_color(Some(hex));
                rest = &rest[7..];
                continue;
            }
            if let Some(code) = rest.chars().next().and_then(ColorCode::parse) {
                rest = &rest[1..];
                match code {
                    ColorCode::Reset => builder.set_color(None),
                    code if code.is_formatting() => {
                        builder.flush();
                        builder.style.decorate(code);
                    }
                    code => builder.set_color(Some(TextColor::ColorCode(code))),
                }
                continue;
            }
        } else if c == '#' {
            if let Some(hex) = take_hex(rest) {
                builder.set_color(Some(hex));
                rest = &rest[6..];
                continue;
            }
        }
        builder.text.push(c);
    }
    builder.flush();

    link_urls(builder.components)
}

/// Splits every component around URLs and gives the URL pieces an
/// `open_url` click event.
fn link_urls(components: Vec<TextComponent>) -> Vec<TextComponent> {
    let mut linked = Vec::with_capacity(components.len());
    for component in components {
        let text = &component.text;
        let mut last = 0;

        for found in URL_REGEX.find_iter(text) {
            if last != found.start() {
                let mut piece = component.clone();
                piece.text = text[last..found.start()].to_string();
                linked.push(piece);
            }
            let mut piece = component.clone();
            piece.text = found.as_str().to_string();
            piece.click_event = Some(ClickEvent::open_url(found.as_str()));
            linked.push(piece);
            last = found.end();
        }

        if last == 0 {
            linked.push(component);
        } else if last < text.len() {
            let mut piece = component.clone();
            piece.text = text[last..].to_string();
            linked.push(piece);
        }
    }
    linked
}

#[derive(Default, PartialEq, Eq, Clone, Copy)]
struct LegacyStyle {
    color: Option<ColorCode>,
    decorations: [bool; 5],
}

const DECORATION_CODES: [ColorCode; 5] = [
    ColorCode::Obfuscated,
    ColorCode::Bold,
    ColorCode::Strikethrough,
    ColorCode::Underline,
    ColorCode::Italic,
];

impl LegacyStyle {
    fn of(style: &Style) -> Self {
        LegacyStyle {
            color: style.color.as_ref().map(TextColor::downsample),
            decorations: [
                style.obfuscated,
                style.bold,
                style.strikethrough,
                style.underlined,
                style.italic,
            ],
        }
    }

    fn is_plain(&self) -> bool {
        *self == LegacyStyle::default()
    }

    fn push_decorations(&self, out: &mut String, skip: &[bool; 5]) {
        for (i, code) in DECORATION_CODES.iter().enumerate() {
            if self.decorations[i] && !skip[i] {
                out.push(SECTION_SIGN);
                out.push(code.code());
            }
        }
    }
}

fn flatten(components: &[TextComponent], parent: &Style, out: &mut Vec<(Style, String)>) {
    for component in components {
        let mut style = component.style();
        if style.color.is_none() {
            style.color = parent.color.clone();
        }
        style.bold |= parent.bold;
        style.italic |= parent.italic;
        style.underlined |= parent.underlined;
        style.strikethrough |= parent.strikethrough;
        style.obfuscated |= parent.obfuscated;

        out.push((style.clone(), component.text.clone()));
        flatten(&component.extra, &style, out);
    }
}

/// Serializes components to a `§` coded string. Hex colours are reduced to
/// the nearest of the 16 chat colours.
pub fn to_legacy_string(components: &[TextComponent]) -> String {
    let mut runs = Vec::new();
    flatten(components, &Style::default(), &mut runs);

    let mut out = String::new();
    let mut current = LegacyStyle::default();
    for (style, text) in runs {
        if text.is_empty() {
            continue;
        }
        let next = LegacyStyle::of(&style);
        if next != current {
            let only_added = next.color == current.color
                && (0..5).all(|i| next.decorations[i] || !current.decorations[i]);
            if only_added {
                next.push_decorations(&mut out, &current.decorations);
            } else {
                match next.color {
                    Some(color) => {
                        out.push(SECTION_SIGN);
                        out.push(color.code());
                    }
                    None if !current.is_plain() => {
                        out.push(SECTION_SIGN);
                        out.push(ColorCode::Reset.code());
                    }
                    None => {}
                }
                next.push_decorations(&mut out, &[false; 5]);
            }
            current = next;
        }
        out.push_str(&text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_plain_text;

    #[test]
    fn color_resets_decorations() {
        let components = parse_legacy("&l&cHi");
        assert_eq!(components.len(), 1);
        assert!(!components[0].bold);
        assert_eq!(
            components[0].color,
            Some(TextColor::ColorCode(ColorCode::Red))
        );
    }

    #[test]
    fn decoration_after_color_is_kept() {
        let components = parse_legacy("§c§lHi");
        assert!(components[0].bold);
        assert_eq!(
            components[0].color,
            Some(TextColor::ColorCode(ColorCode::Red))
        );
    }

    #[test]
    fn unknown_codes_stay_literal() {
        let components = parse_legacy("50&z off & on");
        assert_eq!(to_plain_text(&components), "50&z off & on");
    }

    #[test]
    fn hex_forms() {
        let components = parse_legacy("&#ff0000a#00ff00b");
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].color, TextColor::parse_hex("#ff0000"));
        assert_eq!(components[1].color, TextColor::parse_hex("#00ff00"));
    }

    #[test]
    fn urls_become_clickable() {
        let components = parse_legacy("&7See https://bluemap.bluecolored.de/wiki now");
        assert_eq!(components.len(), 3);
        assert_eq!(components[1].text, "https://bluemap.bluecolored.de/wiki");
        assert!(components[1].click_event.is_some());
        assert_eq!(components[2].text, " now");
    }

    #[test]
    fn serializes_back_to_section_codes() {
        let components = parse_legacy("&aVisible &l!");
        assert_eq!(to_legacy_string(&components), "§aVisible §l!");
    }

    #[test]
    fn dropping_a_decoration_resets() {
        let mut bold = Style::default();
        bold.bold = true;
        let components = vec![bold.component("Hi"), TextComponent::from(" there")];
        assert_eq!(to_legacy_string(&components), "§lHi§r there");
    }

    #[test]
    fn plain_text_has_no_codes() {
        assert_eq!(to_legacy_string(&parse_legacy("no codes")), "no codes");
    }
}
