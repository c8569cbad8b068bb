//! Built-in glyph alphabets.
//!
//! Every alphabet is single-cell: each glyph occupies exactly one terminal
//! column. The katakana set uses the half-width forms block for that reason.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selector for the built-in glyph alphabets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetId {
    /// Half-width katakana, the classic rain glyphs.
    Katakana,
    /// Zeroes and ones.
    Binary,
    /// Decimal digits.
    Numbers,
    /// Elder Futhark runes.
    Runes,
    /// Printable ASCII.
    Ascii,
    /// Symbol-heavy source-code punctuation.
    Code,
}

impl CharsetId {
    /// Every built-in alphabet, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Katakana,
        Self::Binary,
        Self::Numbers,
        Self::Runes,
        Self::Ascii,
        Self::Code,
    ];

    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Katakana => "katakana",
            Self::Binary => "binary",
            Self::Numbers => "numbers",
            Self::Runes => "runes",
            Self::Ascii => "ascii",
            Self::Code => "code",
        }
    }

    /// Human-readable name.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Katakana => "Katakana",
            Self::Binary => "Binary",
            Self::Numbers => "Numbers",
            Self::Runes => "Elder Futhark Runes",
            Self::Ascii => "ASCII",
            Self::Code => "Code Snippets",
        }
    }

    /// The alphabet's glyphs.
    pub const fn alphabet(self) -> &'static str {
        match self {
            Self::Katakana => {
                "ｦｧｨｩｪｫｬｭｮｯｰｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝ"
            }
            Self::Binary => "01",
            Self::Numbers => "0123456789",
            Self::Runes => "ᚠᚢᚦᚨᚱᚲᚷᚹᚺᚾᛁᛃᛇᛈᛉᛊᛏᛒᛖᛗᛚᛜᛟᛞ",
            Self::Ascii => {
                "!\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~"
            }
            Self::Code => "<>(){}[].,;'\"=/+-%*&|!?^~",
        }
    }
}

impl FromStr for CharsetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "katakana" => Ok(Self::Katakana),
            "binary" => Ok(Self::Binary),
            "numbers" => Ok(Self::Numbers),
            "runes" => Ok(Self::Runes),
            "ascii" => Ok(Self::Ascii),
            "code" => Ok(Self::Code),
            other => Err(format!("unknown charset: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthChar;

    #[test]
    fn test_alphabets_non_empty() {
        for id in CharsetId::ALL {
            assert!(!id.alphabet().is_empty(), "{} is empty", id.as_str());
        }
    }

    #[test]
    fn test_every_glyph_is_single_cell() {
        for id in CharsetId::ALL {
            for ch in id.alphabet().chars() {
                assert_eq!(
                    ch.width(),
                    Some(1),
                    "{:?} in {} is not single-cell",
                    ch,
                    id.as_str()
                );
                assert!(!ch.is_whitespace());
            }
        }
    }

    #[test]
    fn test_from_str_round_trip() {
        for id in CharsetId::ALL {
            assert_eq!(id.as_str().parse::<CharsetId>(), Ok(id));
        }
        assert!("klingon".parse::<CharsetId>().is_err());
    }
}
