mod legacy;
mod markup;

pub use legacy::to_legacy_string;
pub use markup::parse_markup;

use serde::Serialize;

/// Character that introduces a formatting code in serialized legacy text.
pub const SECTION_SIGN: char = '§';

fn is_valid_hex(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

const NAMED_COLORS: [ColorCode; 16] = [
    ColorCode::Black,
    ColorCode::DarkBlue,
    ColorCode::DarkGreen,
    ColorCode::DarkAqua,
    ColorCode::DarkRed,
    ColorCode::DarkPurple,
    ColorCode::Gold,
    ColorCode::Gray,
    ColorCode::DarkGray,
    ColorCode::Blue,
    ColorCode::Green,
    ColorCode::Aqua,
    ColorCode::Red,
    ColorCode::LightPurple,
    ColorCode::Yellow,
    ColorCode::White,
];

impl ColorCode {
    /// Parses the character following a `&` or `§`. Upper case is accepted.
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code.to_ascii_lowercase() {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            ColorCode::Black => '0',
            ColorCode::DarkBlue => '1',
            ColorCode::DarkGreen => '2',
            ColorCode::DarkAqua => '3',
            ColorCode::DarkRed => '4',
            ColorCode::DarkPurple => '5',
            ColorCode::Gold => '6',
            ColorCode::Gray => '7',
            ColorCode::DarkGray => '8',
            ColorCode::Blue => '9',
            ColorCode::Green => 'a',
            ColorCode::Aqua => 'b',
            ColorCode::Red => 'c',
            ColorCode::LightPurple => 'd',
            ColorCode::Yellow => 'e',
            ColorCode::White => 'f',
            ColorCode::Obfuscated => 'k',
            ColorCode::Bold => 'l',
            ColorCode::Strikethrough => 'm',
            ColorCode::Underline => 'n',
            ColorCode::Italic => 'o',
            ColorCode::Reset => 'r',
        }
    }

    /// Looks up a colour by its chat name, e.g. `dark_blue`. Only the 16
    /// colours are accepted, decorations have their own tags.
    pub fn from_name(name: &str) -> Option<ColorCode> {
        Some(match name {
            "black" => ColorCode::Black,
            "dark_blue" => ColorCode::DarkBlue,
            "dark_green" => ColorCode::DarkGreen,
            "dark_aqua" => ColorCode::DarkAqua,
            "dark_red" => ColorCode::DarkRed,
            "dark_purple" => ColorCode::DarkPurple,
            "gold" => ColorCode::Gold,
            "gray" | "grey" => ColorCode::Gray,
            "dark_gray" | "dark_grey" => ColorCode::DarkGray,
            "blue" => ColorCode::Blue,
            "green" => ColorCode::Green,
            "aqua" => ColorCode::Aqua,
            "red" => ColorCode::Red,
            "light_purple" => ColorCode::LightPurple,
            "yellow" => ColorCode::Yellow,
            "white" => ColorCode::White,
            _ => return None,
        })
    }

    pub fn rgb(self) -> Option<u32> {
        Some(match self {
            ColorCode::Black => 0x000000,
            ColorCode::DarkBlue => 0x0000AA,
            ColorCode::DarkGreen => 0x00AA00,
            ColorCode::DarkAqua => 0x00AAAA,
            ColorCode::DarkRed => 0xAA0000,
            ColorCode::DarkPurple => 0xAA00AA,
            ColorCode::Gold => 0xFFAA00,
            ColorCode::Gray => 0xAAAAAA,
            ColorCode::DarkGray => 0x555555,
            ColorCode::Blue => 0x5555FF,
            ColorCode::Green => 0x55FF55,
            ColorCode::Aqua => 0x55FFFF,
            ColorCode::Red => 0xFF5555,
            ColorCode::LightPurple => 0xFF55FF,
            ColorCode::Yellow => 0xFFFF55,
            ColorCode::White => 0xFFFFFF,
            _ => return None,
        })
    }

    /// Picks the named colour closest to `rgb` by squared distance.
    pub fn nearest(rgb: u32) -> ColorCode {
        let channels = |c: u32| ((c >> 16) as i32 & 0xFF, (c >> 8) as i32 & 0xFF, c as i32 & 0xFF);
        let (r, g, b) = channels(rgb);
        NAMED_COLORS
            .iter()
            .copied()
            .min_by_key(|color| {
                let (cr, cg, cb) = channels(color.rgb().unwrap_or_default());
                (r - cr).pow(2) + (g - cg).pow(2) + (b - cb).pow(2)
            })
            .unwrap_or(ColorCode::White)
    }

    pub fn is_formatting(self) -> bool {
        use ColorCode::*;
        matches!(
            self,
            Obfuscated | Bold | Strikethrough | Underline | Italic | Reset
        )
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TextColor {
    Hex(String),
    ColorCode(ColorCode),
}

impl TextColor {
    /// Accepts `#rrggbb`.
    pub fn parse_hex(hex: &str) -> Option<TextColor> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(is_valid_hex) {
            return None;
        }
        Some(TextColor::Hex(format!("#{}", digits.to_ascii_lowercase())))
    }

    /// The named colour used when only 16 colours can be shown.
    pub fn downsample(&self) -> ColorCode {
        match self {
            TextColor::ColorCode(code) => *code,
            TextColor::Hex(hex) => {
                let rgb = u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0xFFFFFF);
                ColorCode::nearest(rgb)
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ClickEventType {
    OpenUrl,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    action: ClickEventType,
    value: String,
}

impl ClickEvent {
    pub fn open_url(url: impl Into<String>) -> Self {
        Self {
            action: ClickEventType::OpenUrl,
            value: url.into(),
        }
    }
}

/// This is only used for `TextComponent` serialize
#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(field: &bool) -> bool {
    !*field
}

/// The formatting state shared by the legacy and markup parsers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Style {
    pub color: Option<TextColor>,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

impl Style {
    /// Turns on a decoration. Returns false for colours and reset.
    pub fn decorate(&mut self, code: ColorCode) -> bool {
        match code {
            ColorCode::Bold => self.bold = true,
            ColorCode::Italic => self.italic = true,
            ColorCode::Underline => self.underlined = true,
            ColorCode::Strikethrough => self.strikethrough = true,
            ColorCode::Obfuscated => self.obfuscated = true,
            _ => return false,
        }
        true
    }

    pub fn component(&self, text: impl Into<String>) -> TextComponent {
        TextComponent {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            underlined: self.underlined,
            strikethrough: self.strikethrough,
            obfuscated: self.obfuscated,
            color: self.color.clone(),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub obfuscated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<TextColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "clickEvent")]
    pub click_event: Option<ClickEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    /// Parses `&`/`§` colour codes, `#rrggbb` hex colours and links.
    pub fn from_legacy_text(message: &str) -> Vec<TextComponent> {
        legacy::parse_legacy(message)
    }

    pub fn style(&self) -> Style {
        Style {
            color: self.color.clone(),
            bold: self.bold,
            italic: self.italic,
            underlined: self.underlined,
            strikethrough: self.strikethrough,
            obfuscated: self.obfuscated,
        }
    }

    pub fn encode_json(&self) -> String {
        // Only strings, bools and nested components: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn is_text_only(&self) -> bool {
        self.style() == Style::default() && self.click_event.is_none()
    }
}

/// Concatenates the text of `components` and their children, dropping all
/// formatting.
pub fn to_plain_text(components: &[TextComponent]) -> String {
    let mut out = String::new();
    for component in components {
        out.push_str(&component.text);
        out.push_str(&to_plain_text(&component.extra));
    }
    out
}

impl<S> From<S> for TextComponent
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        TextComponent {
            text: value.into(),
            ..Default::default()
        }
    }
}
