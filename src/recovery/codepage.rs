//! IBM EBCDIC single-byte codepages.
//!
//! Every byte maps to exactly one character, so decoding never fails;
//! whether the result is text is decided by [`looks_readable`].

use serde::Serialize;

/// Mainframe codepages tried by the text fallback, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Codepage {
    /// US/Canada
    Cp037,
    /// International Latin-1
    Cp500,
    /// Greek
    Cp875,
    /// Turkish Latin-5
    Cp1026,
    /// US/Canada with euro sign
    Cp1140,
}

impl Codepage {
    pub const ALL: [Codepage; 5] = [
        Codepage::Cp037,
        Codepage::Cp500,
        Codepage::Cp875,
        Codepage::Cp1026,
        Codepage::Cp1140,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Codepage::Cp037 => "cp037",
            Codepage::Cp500 => "cp500",
            Codepage::Cp875 => "cp875",
            Codepage::Cp1026 => "cp1026",
            Codepage::Cp1140 => "cp1140",
        }
    }

    /// Name recorded in the report when this codepage recovered an entry
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Codepage::Cp037 => "text-cp037",
            Codepage::Cp500 => "text-cp500",
            Codepage::Cp875 => "text-cp875",
            Codepage::Cp1026 => "text-cp1026",
            Codepage::Cp1140 => "text-cp1140",
        }
    }

    /// Look a codepage up by name, with or without the `cp` prefix
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let digits = name.strip_prefix("cp").unwrap_or(&name);
        Self::ALL
            .into_iter()
            .find(|cp| &cp.name()[2..] == digits)
    }

    fn table(&self) -> &'static [char; 256] {
        match self {
            Codepage::Cp037 => &CP037,
            Codepage::Cp500 => &CP500,
            Codepage::Cp875 => &CP875,
            Codepage::Cp1026 => &CP1026,
            Codepage::Cp1140 => &CP1140,
        }
    }
}

impl std::fmt::Display for Codepage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode `bytes` under `codepage`.
pub fn decode(bytes: &[u8], codepage: Codepage) -> String {
    let table = codepage.table();
    bytes.iter().map(|&b| table[b as usize]).collect()
}

/// True when some line, trimmed, is longer than 5 characters and holds a
/// letter.
///
/// Any byte string decodes under a single-byte codepage; this is what
/// separates text from decoded noise. Only LF splits lines; EBCDIC NEL
/// (0x15) stays inside the line it appears in.
pub fn looks_readable(text: &str) -> bool {
    text.split('\n')
        .map(str::trim)
        .any(|line| line.chars().count() > 5 && line.chars().any(char::is_alphabetic))
}

#[rustfmt::skip]
static CP037: [char; 256] = [
    '\u{00}', '\u{01}', '\u{02}', '\u{03}', '\u{9c}', '\u{09}', '\u{86}', '\u{7f}',  // 00
    '\u{97}', '\u{8d}', '\u{8e}', '\u{0b}', '\u{0c}', '\u{0d}', '\u{0e}', '\u{0f}',  // 08
    '\u{10}', '\u{11}', '\u{12}', '\u{13}', '\u{9d}', '\u{85}', '\u{08}', '\u{87}',  // 10
    '\u{18}', '\u{19}', '\u{92}', '\u{8f}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{1f}',  // 18
    '\u{80}', '\u{81}', '\u{82}', '\u{83}', '\u{84}', '\u{0a}', '\u{17}', '\u{1b}',  // 20
    '\u{88}', '\u{89}', '\u{8a}', '\u{8b}', '\u{8c}', '\u{05}', '\u{06}', '\u{07}',  // 28
    '\u{90}', '\u{91}', '\u{16}', '\u{93}', '\u{94}', '\u{95}', '\u{96}', '\u{04}',  // 30
    '\u{98}', '\u{99}', '\u{9a}', '\u{9b}', '\u{14}', '\u{15}', '\u{9e}', '\u{1a}',  // 38
    ' ', '\u{a0}', 'â', 'ä', 'à', 'á', 'ã', 'å',  // 40
    'ç', 'ñ', '¢', '.', '<', '(', '+', '|',  // 48
    '&', 'é', 'ê', 'ë', 'è', 'í', 'î', 'ï',  // 50
    'ì', 'ß', '!', '$', '*', ')', ';', '¬',  // 58
    '-', '/', 'Â', 'Ä', 'À', 'Á', 'Ã', 'Å',  // 60
    'Ç', 'Ñ', '¦', ',', '%', '_', '>', '?',  // 68
    'ø', 'É', 'Ê', 'Ë', 'È', 'Í', 'Î', 'Ï',  // 70
    'Ì', '`', ':', '#', '@', '\'', '=', '"',  // 78
    'Ø', 'a', 'b', 'c', 'd', 'e', 'f', 'g',  // 80
    'h', 'i', '«', '»', 'ð', 'ý', 'þ', '±',  // 88
    '°', 'j', 'k', 'l', 'm', 'n', 'o', 'p',  // 90
    'q', 'r', 'ª', 'º', 'æ', '¸', 'Æ', '¤',  // 98
    'µ', '~', 's', 't', 'u', 'v', 'w', 'x',  // a0
    'y', 'z', '¡', '¿', 'Ð', 'Ý', 'Þ', '®',  // a8
    '^', '£', '¥', '·', '©', '§', '¶', '¼',  // b0
    '½', '¾', '[', ']', '¯', '¨', '´', '×',  // b8
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G',  // c0
    'H', 'I', '\u{ad}', 'ô', 'ö', 'ò', 'ó', 'õ',  // c8
    '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P',  // d0
    'Q', 'R', '¹', 'û', 'ü', 'ù', 'ú', 'ÿ',  // d8
    '\\', '÷', 'S', 'T', 'U', 'V', 'W', 'X',  // e0
    'Y', 'Z', '²', 'Ô', 'Ö', 'Ò', 'Ó', 'Õ',  // e8
    '0', '1', '2', '3', '4', '5', '6', '7',  // f0
    '8', '9', '³', 'Û', 'Ü', 'Ù', 'Ú', '\u{9f}',  // f8
];

#[rustfmt::skip]
static CP500: [char; 256] = [
    '\u{00}', '\u{01}', '\u{02}', '\u{03}', '\u{9c}', '\u{09}', '\u{86}', '\u{7f}',  // 00
    '\u{97}', '\u{8d}', '\u{8e}', '\u{0b}', '\u{0c}', '\u{0d}', '\u{0e}', '\u{0f}',  // 08
    '\u{10}', '\u{11}', '\u{12}', '\u{13}', '\u{9d}', '\u{85}', '\u{08}', '\u{87}',  // 10
    '\u{18}', '\u{19}', '\u{92}', '\u{8f}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{1f}',  // 18
    '\u{80}', '\u{81}', '\u{82}', '\u{83}', '\u{84}', '\u{0a}', '\u{17}', '\u{1b}',  // 20
    '\u{88}', '\u{89}', '\u{8a}', '\u{8b}', '\u{8c}', '\u{05}', '\u{06}', '\u{07}',  // 28
    '\u{90}', '\u{91}', '\u{16}', '\u{93}', '\u{94}', '\u{95}', '\u{96}', '\u{04}',  // 30
    '\u{98}', '\u{99}', '\u{9a}', '\u{9b}', '\u{14}', '\u{15}', '\u{9e}', '\u{1a}',  // 38
    ' ', '\u{a0}', 'â', 'ä', 'à', 'á', 'ã', 'å',  // 40
    'ç', 'ñ', '[', '.', '<', '(', '+', '!',  // 48
    '&', 'é', 'ê', 'ë', 'è', 'í', 'î', 'ï',  // 50
    'ì', 'ß', ']', '$', '*', ')', ';', '^',  // 58
    '-', '/', 'Â', 'Ä', 'À', 'Á', 'Ã', 'Å',  // 60
    'Ç', 'Ñ', '¦', ',', '%', '_', '>', '?',  // 68
    'ø', 'É', 'Ê', 'Ë', 'È', 'Í', 'Î', 'Ï',  // 70
    'Ì', '`', ':', '#', '@', '\'', '=', '"',  // 78
    'Ø', 'a', 'b', 'c', 'd', 'e', 'f', 'g',  // 80
    'h', 'i', '«', '»', 'ð', 'ý', 'þ', '±',  // 88
    '°', 'j', 'k', 'l', 'm', 'n', 'o', 'p',  // 90
    'q', 'r', 'ª', 'º', 'æ', '¸', 'Æ', '¤',  // 98
    'µ', '~', 's', 't', 'u', 'v', 'w', 'x',  // a0
    'y', 'z', '¡', '¿', 'Ð', 'Ý', 'Þ', '®',  // a8
    '¢', '£', '¥', '·', '©', '§', '¶', '¼',  // b0
    '½', '¾', '¬', '|', '¯', '¨', '´', '×',  // b8
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G',  // c0
    'H', 'I', '\u{ad}', 'ô', 'ö', 'ò', 'ó', 'õ',  // c8
    '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P',  // d0
    'Q', 'R', '¹', 'û', 'ü', 'ù', 'ú', 'ÿ',  // d8
    '\\', '÷', 'S', 'T', 'U', 'V', 'W', 'X',  // e0
    'Y', 'Z', '²', 'Ô', 'Ö', 'Ò', 'Ó', 'Õ',  // e8
    '0', '1', '2', '3', '4', '5', '6', '7',  // f0
    '8', '9', '³', 'Û', 'Ü', 'Ù', 'Ú', '\u{9f}',  // f8
];

#[rustfmt::skip]
static CP875: [char; 256] = [
    '\u{00}', '\u{01}', '\u{02}', '\u{03}', '\u{9c}', '\u{09}', '\u{86}', '\u{7f}',  // 00
    '\u{97}', '\u{8d}', '\u{8e}', '\u{0b}', '\u{0c}', '\u{0d}', '\u{0e}', '\u{0f}',  // 08
    '\u{10}', '\u{11}', '\u{12}', '\u{13}', '\u{9d}', '\u{85}', '\u{08}', '\u{87}',  // 10
    '\u{18}', '\u{19}', '\u{92}', '\u{8f}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{1f}',  // 18
    '\u{80}', '\u{81}', '\u{82}', '\u{83}', '\u{84}', '\u{0a}', '\u{17}', '\u{1b}',  // 20
    '\u{88}', '\u{89}', '\u{8a}', '\u{8b}', '\u{8c}', '\u{05}', '\u{06}', '\u{07}',  // 28
    '\u{90}', '\u{91}', '\u{16}', '\u{93}', '\u{94}', '\u{95}', '\u{96}', '\u{04}',  // 30
    '\u{98}', '\u{99}', '\u{9a}', '\u{9b}', '\u{14}', '\u{15}', '\u{9e}', '\u{1a}',  // 38
    ' ', 'Α', 'Β', 'Γ', 'Δ', 'Ε', 'Ζ', 'Η',  // 40
    'Θ', 'Ι', '[', '.', '<', '(', '+', '!',  // 48
    '&', 'Κ', 'Λ', 'Μ', 'Ν', 'Ξ', 'Ο', 'Π',  // 50
    'Ρ', 'Σ', ']', '$', '*', ')', ';', '^',  // 58
    '-', '/', 'Τ', 'Υ', 'Φ', 'Χ', 'Ψ', 'Ω',  // 60
    'Ϊ', 'Ϋ', '|', ',', '%', '_', '>', '?',  // 68
    '¨', 'Ά', 'Έ', 'Ή', '\u{a0}', 'Ί', 'Ό', 'Ύ',  // 70
    'Ώ', '`', ':', '#', '@', '\'', '=', '"',  // 78
    '΅', 'a', 'b', 'c', 'd', 'e', 'f', 'g',  // 80
    'h', 'i', 'α', 'β', 'γ', 'δ', 'ε', 'ζ',  // 88
    '°', 'j', 'k', 'l', 'm', 'n', 'o', 'p',  // 90
    'q', 'r', 'η', 'θ', 'ι', 'κ', 'λ', 'μ',  // 98
    '´', '~', 's', 't', 'u', 'v', 'w', 'x',  // a0
    'y', 'z', 'ν', 'ξ', 'ο', 'π', 'ρ', 'σ',  // a8
    '£', 'ά', 'έ', 'ή', 'ϊ', 'ί', 'ό', 'ύ',  // b0
    'ϋ', 'ώ', 'ς', 'τ', 'υ', 'φ', 'χ', 'ψ',  // b8
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G',  // c0
    'H', 'I', '\u{ad}', 'ω', 'ΐ', 'ΰ', '‘', '―',  // c8
    '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P',  // d0
    'Q', 'R', '±', '½', '\u{1a}', '·', '’', '¦',  // d8
    '\\', '\u{1a}', 'S', 'T', 'U', 'V', 'W', 'X',  // e0
    'Y', 'Z', '²', '§', '\u{1a}', '\u{1a}', '«', '¬',  // e8
    '0', '1', '2', '3', '4', '5', '6', '7',  // f0
    '8', '9', '³', '©', '\u{1a}', '\u{1a}', '»', '\u{9f}',  // f8
];

#[rustfmt::skip]
static CP1026: [char; 256] = [
    '\u{00}', '\u{01}', '\u{02}', '\u{03}', '\u{9c}', '\u{09}', '\u{86}', '\u{7f}',  // 00
    '\u{97}', '\u{8d}', '\u{8e}', '\u{0b}', '\u{0c}', '\u{0d}', '\u{0e}', '\u{0f}',  // 08
    '\u{10}', '\u{11}', '\u{12}', '\u{13}', '\u{9d}', '\u{85}', '\u{08}', '\u{87}',  // 10
    '\u{18}', '\u{19}', '\u{92}', '\u{8f}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{1f}',  // 18
    '\u{80}', '\u{81}', '\u{82}', '\u{83}', '\u{84}', '\u{0a}', '\u{17}', '\u{1b}',  // 20
    '\u{88}', '\u{89}', '\u{8a}', '\u{8b}', '\u{8c}', '\u{05}', '\u{06}', '\u{07}',  // 28
    '\u{90}', '\u{91}', '\u{16}', '\u{93}', '\u{94}', '\u{95}', '\u{96}', '\u{04}',  // 30
    '\u{98}', '\u{99}', '\u{9a}', '\u{9b}', '\u{14}', '\u{15}', '\u{9e}', '\u{1a}',  // 38
    ' ', '\u{a0}', 'â', 'ä', 'à', 'á', 'ã', 'å',  // 40
    '{', 'ñ', 'Ç', '.', '<', '(', '+', '!',  // 48
    '&', 'é', 'ê', 'ë', 'è', 'í', 'î', 'ï',  // 50
    'ì', 'ß', 'Ğ', 'İ', '*', ')', ';', '^',  // 58
    '-', '/', 'Â', 'Ä', 'À', 'Á', 'Ã', 'Å',  // 60
    '[', 'Ñ', 'ş', ',', '%', '_', '>', '?',  // 68
    'ø', 'É', 'Ê', 'Ë', 'È', 'Í', 'Î', 'Ï',  // 70
    'Ì', 'ı', ':', 'Ö', 'Ş', '\'', '=', 'Ü',  // 78
    'Ø', 'a', 'b', 'c', 'd', 'e', 'f', 'g',  // 80
    'h', 'i', '«', '»', '}', '`', '¦', '±',  // 88
    '°', 'j', 'k', 'l', 'm', 'n', 'o', 'p',  // 90
    'q', 'r', 'ª', 'º', 'æ', '¸', 'Æ', '¤',  // 98
    'µ', 'ö', 's', 't', 'u', 'v', 'w', 'x',  // a0
    'y', 'z', '¡', '¿', ']', '$', '@', '®',  // a8
    '¢', '£', '¥', '·', '©', '§', '¶', '¼',  // b0
    '½', '¾', '¬', '|', '¯', '¨', '´', '×',  // b8
    'ç', 'A', 'B', 'C', 'D', 'E', 'F', 'G',  // c0
    'H', 'I', '\u{ad}', 'ô', '~', 'ò', 'ó', 'õ',  // c8
    'ğ', 'J', 'K', 'L', 'M', 'N', 'O', 'P',  // d0
    'Q', 'R', '¹', 'û', '\\', 'ù', 'ú', 'ÿ',  // d8
    'ü', '÷', 'S', 'T', 'U', 'V', 'W', 'X',  // e0
    'Y', 'Z', '²', 'Ô', '#', 'Ò', 'Ó', 'Õ',  // e8
    '0', '1', '2', '3', '4', '5', '6', '7',  // f0
    '8', '9', '³', 'Û', '"', 'Ù', 'Ú', '\u{9f}',  // f8
];

#[rustfmt::skip]
static CP1140: [char; 256] = [
    '\u{00}', '\u{01}', '\u{02}', '\u{03}', '\u{9c}', '\u{09}', '\u{86}', '\u{7f}',  // 00
    '\u{97}', '\u{8d}', '\u{8e}', '\u{0b}', '\u{0c}', '\u{0d}', '\u{0e}', '\u{0f}',  // 08
    '\u{10}', '\u{11}', '\u{12}', '\u{13}', '\u{9d}', '\u{85}', '\u{08}', '\u{87}',  // 10
    '\u{18}', '\u{19}', '\u{92}', '\u{8f}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{1f}',  // 18
    '\u{80}', '\u{81}', '\u{82}', '\u{83}', '\u{84}', '\u{0a}', '\u{17}', '\u{1b}',  // 20
    '\u{88}', '\u{89}', '\u{8a}', '\u{8b}', '\u{8c}', '\u{05}', '\u{06}', '\u{07}',  // 28
    '\u{90}', '\u{91}', '\u{16}', '\u{93}', '\u{94}', '\u{95}', '\u{96}', '\u{04}',  // 30
    '\u{98}', '\u{99}', '\u{9a}', '\u{9b}', '\u{14}', '\u{15}', '\u{9e}', '\u{1a}',  // 38
    ' ', '\u{a0}', 'â', 'ä', 'à', 'á', 'ã', 'å',  // 40
    'ç', 'ñ', '¢', '.', '<', '(', '+', '|',  // 48
    '&', 'é', 'ê', 'ë', 'è', 'í', 'î', 'ï',  // 50
    'ì', 'ß', '!', '$', '*', ')', ';', '¬',  // 58
    '-', '/', 'Â', 'Ä', 'À', 'Á', 'Ã', 'Å',  // 60
    'Ç', 'Ñ', '¦', ',', '%', '_', '>', '?',  // 68
    'ø', 'É', 'Ê', 'Ë', 'È', 'Í', 'Î', 'Ï',  // 70
    'Ì', '`', ':', '#', '@', '\'', '=', '"',  // 78
    'Ø', 'a', 'b', 'c', 'd', 'e', 'f', 'g',  // 80
    'h', 'i', '«', '»', 'ð', 'ý', 'þ', '±',  // 88
    '°', 'j', 'k', 'l', 'm', 'n', 'o', 'p',  // 90
    'q', 'r', 'ª', 'º', 'æ', '¸', 'Æ', '€',  // 98
    'µ', '~', 's', 't', 'u', 'v', 'w', 'x',  // a0
    'y', 'z', '¡', '¿', 'Ð', 'Ý', 'Þ', '®',  // a8
    '^', '£', '¥', '·', '©', '§', '¶', '¼',  // b0
    '½', '¾', '[', ']', '¯', '¨', '´', '×',  // b8
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G',  // c0
    'H', 'I', '\u{ad}', 'ô', 'ö', 'ò', 'ó', 'õ',  // c8
    '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P',  // d0
    'Q', 'R', '¹', 'û', 'ü', 'ù', 'ú', 'ÿ',  // d8
    '\\', '÷', 'S', 'T', 'U', 'V', 'W', 'X',  // e0
    'Y', 'Z', '²', 'Ô', 'Ö', 'Ò', 'Ó', 'Õ',  // e8
    '0', '1', '2', '3', '4', '5', '6', '7',  // f0
    '8', '9', '³', 'Û', 'Ü', 'Ù', 'Ú', '\u{9f}',  // f8
];
