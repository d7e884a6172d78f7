//! Word and block style types shared by layout and the page format.

use crate::error::CodecError;

/// Backend font identifier.
pub type FontId = i32;

/// One byte of per-word style flags.
///
/// The low two bits select the face; [`FontStyle::UNDERLINE`] is an
/// independent decoration bit. Unknown bits are preserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontStyle(pub u8);

impl FontStyle {
    pub const REGULAR: Self = Self(0);
    pub const BOLD: Self = Self(1);
    pub const ITALIC: Self = Self(2);
    pub const BOLD_ITALIC: Self = Self(3);
    pub const UNDERLINE: Self = Self(4);

    const FACE_MASK: u8 = 0x03;

    /// Raw on-disk byte.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Face selection without decoration bits.
    pub const fn face(self) -> Self {
        Self(self.0 & Self::FACE_MASK)
    }

    pub const fn is_bold(self) -> bool {
        self.0 & Self::BOLD.0 != 0
    }

    pub const fn is_italic(self) -> bool {
        self.0 & Self::ITALIC.0 != 0
    }

    pub const fn is_underlined(self) -> bool {
        self.0 & Self::UNDERLINE.0 != 0
    }

    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl core::ops::BitOr for FontStyle {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

/// Horizontal alignment of a text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Alignment {
    #[default]
    Justified = 0,
    Left = 1,
    Center = 2,
    Right = 3,
}

impl Alignment {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether paragraphs in this alignment receive an automatic first-line indent.
    pub const fn takes_paragraph_indent(self) -> bool {
        matches!(self, Self::Justified | Self::Left)
    }
}

impl TryFrom<u8> for Alignment {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Justified),
            1 => Ok(Self::Left),
            2 => Ok(Self::Center),
            3 => Ok(Self::Right),
            other => Err(CodecError::InvalidAlignment(other)),
        }
    }
}

/// Alignment and box metadata a line inherits from its source block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockStyle {
    pub alignment: Alignment,
    /// Alignment came from the document rather than the reader default.
    pub text_align_defined: bool,
    pub margin_top: i16,
    pub margin_bottom: i16,
    pub margin_left: i16,
    pub margin_right: i16,
    pub padding_top: i16,
    pub padding_bottom: i16,
    pub padding_left: i16,
    pub padding_right: i16,
    pub text_indent: i16,
    pub text_indent_defined: bool,
}

impl BlockStyle {
    /// Block style with only an alignment set.
    pub fn aligned(alignment: Alignment) -> Self {
        Self {
            alignment,
            ..Self::default()
        }
    }

    /// Horizontal inset of the content box from the block's left edge.
    pub fn left_inset(&self) -> i32 {
        self.margin_left as i32 + self.padding_left as i32
    }

    /// Horizontal space taken by margins and padding on both sides.
    pub fn horizontal_inset(&self) -> i32 {
        self.left_inset() + self.margin_right as i32 + self.padding_right as i32
    }
}
