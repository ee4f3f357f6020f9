use std::fmt;

use serde::{Deserialize, Serialize};

/// Column data kind as tagged in field metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Char,
    LongChar,
    Number,
    SignedNumber,
    Date,
    Time,
    DateTime,
    ImgOrAttach,
    ImageRef,
    NotSet,
    /// A tag this crate has no name for; kept so it can be written back unchanged.
    Unknown(i16),
}

impl FieldType {
    pub fn from_i16(tag: i16) -> Self {
        match tag {
            0 => FieldType::Char,
            1 => FieldType::LongChar,
            2 => FieldType::Number,
            3 => FieldType::SignedNumber,
            4 => FieldType::Date,
            5 => FieldType::Time,
            6 => FieldType::DateTime,
            8 => FieldType::ImgOrAttach,
            9 => FieldType::ImageRef,
            255 => FieldType::NotSet,
            other => FieldType::Unknown(other),
        }
    }

    pub fn as_i16(&self) -> i16 {
        match self {
            FieldType::Char => 0,
            FieldType::LongChar => 1,
            FieldType::Number => 2,
            FieldType::SignedNumber => 3,
            FieldType::Date => 4,
            FieldType::Time => 5,
            FieldType::DateTime => 6,
            FieldType::ImgOrAttach => 8,
            FieldType::ImageRef => 9,
            FieldType::NotSet => 255,
            FieldType::Unknown(tag) => *tag,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Char => write!(f, "CHAR"),
            FieldType::LongChar => write!(f, "LONG_CHAR"),
            FieldType::Number => write!(f, "NUMBER"),
            FieldType::SignedNumber => write!(f, "SIGNED_NUMBER"),
            FieldType::Date => write!(f, "DATE"),
            FieldType::Time => write!(f, "TIME"),
            FieldType::DateTime => write!(f, "DATETIME"),
            FieldType::ImgOrAttach => write!(f, "IMG_OR_ATTACH"),
            FieldType::ImageRef => write!(f, "IMAGE_REF"),
            FieldType::NotSet => write!(f, "NOT_SET"),
            FieldType::Unknown(tag) => write!(f, "UNKNOWN({})", tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldFormat {
    UpperOrDefault,
    Name,
    PhoneNorthAmerica,
    ZipNorthAmerica,
    Ssn,
    MixedCase,
    RawBinary,
    NumbersOnly,
    Sin,
    PhoneIntl,
    ZipIntl,
    TimeSeconds,
    TimeMilli,
    Custom,
    Unknown(i16),
}

impl FieldFormat {
    pub fn from_i16(tag: i16) -> Self {
        match tag {
            0 => FieldFormat::UpperOrDefault,
            1 => FieldFormat::Name,
            2 => FieldFormat::PhoneNorthAmerica,
            3 => FieldFormat::ZipNorthAmerica,
            4 => FieldFormat::Ssn,
            6 => FieldFormat::MixedCase,
            7 => FieldFormat::RawBinary,
            8 => FieldFormat::NumbersOnly,
            9 => FieldFormat::Sin,
            10 => FieldFormat::PhoneIntl,
            11 => FieldFormat::ZipIntl,
            12 => FieldFormat::TimeSeconds,
            13 => FieldFormat::TimeMilli,
            14 => FieldFormat::Custom,
            other => FieldFormat::Unknown(other),
        }
    }

    pub fn as_i16(&self) -> i16 {
        match self {
            FieldFormat::UpperOrDefault => 0,
            FieldFormat::Name => 1,
            FieldFormat::PhoneNorthAmerica => 2,
            FieldFormat::ZipNorthAmerica => 3,
            FieldFormat::Ssn => 4,
            FieldFormat::MixedCase => 6,
            FieldFormat::RawBinary => 7,
            FieldFormat::NumbersOnly => 8,
            FieldFormat::Sin => 9,
            FieldFormat::PhoneIntl => 10,
            FieldFormat::ZipIntl => 11,
            FieldFormat::TimeSeconds => 12,
            FieldFormat::TimeMilli => 13,
            FieldFormat::Custom => 14,
            FieldFormat::Unknown(tag) => *tag,
        }
    }
}

/// Default GUI control used when editing the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuiControl {
    EditBox,
    Dropdown,
    Checkbox,
    RadioButton,
    Default,
    Unknown(i32),
}

impl GuiControl {
    pub fn from_i32(tag: i32) -> Self {
        match tag {
            4 => GuiControl::EditBox,
            5 => GuiControl::Dropdown,
            7 => GuiControl::Checkbox,
            8 => GuiControl::RadioButton,
            99 => GuiControl::Default,
            other => GuiControl::Unknown(other),
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            GuiControl::EditBox => 4,
            GuiControl::Dropdown => 5,
            GuiControl::Checkbox => 7,
            GuiControl::RadioButton => 8,
            GuiControl::Default => 99,
            GuiControl::Unknown(tag) => *tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    Key,
    Alt,
    User,
    Unknown(i16),
}

impl IndexType {
    pub fn from_i16(tag: i16) -> Self {
        match tag {
            1 => IndexType::Key,
            3 => IndexType::Alt,
            4 => IndexType::User,
            other => IndexType::Unknown(other),
        }
    }

    pub fn as_i16(&self) -> i16 {
        match self {
            IndexType::Key => 1,
            IndexType::Alt => 3,
            IndexType::User => 4,
            IndexType::Unknown(tag) => *tag,
        }
    }
}

/// Field edit/usage bitmask. Undefined bits are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UseEditFlags(pub u32);

impl UseEditFlags {
    pub const KEY: u32 = 1;
    pub const DUP_ORDER_KEY: u32 = 1 << 1;
    pub const SYS_MAINT: u32 = 1 << 2;
    pub const AUD_FLD_ADD: u32 = 1 << 3;
    pub const ALT_SRCH_KEY: u32 = 1 << 4;
    pub const LIST_BOX_ITEM: u32 = 1 << 5;
    pub const DESCEND_KEY: u32 = 1 << 6;
    pub const AUD_FLD_CHG: u32 = 1 << 7;
    pub const REQUIRED: u32 = 1 << 8;
    pub const XLAT_EDIT: u32 = 1 << 9;
    pub const AUD_FLD_DEL: u32 = 1 << 10;
    pub const SRCH_KEY: u32 = 1 << 11;
    pub const REASONABLE_DATE_EDIT: u32 = 1 << 12;
    pub const YES_NO_EDIT: u32 = 1 << 13;
    pub const PROMPT_EDIT: u32 = 1 << 14;
    pub const AUTO_UPDATE: u32 = 1 << 15;
    pub const FROM_SRCH_FLD: u32 = 1 << 18;
    pub const THRU_SRCH_FLD: u32 = 1 << 19;
    pub const ONE_ZERO_EDIT: u32 = 1 << 20;
    pub const DISABLE_ADV_SRCH_OPT: u32 = 1 << 21;
    pub const DFLT_SRCH_FIELD: u32 = 1 << 24;
    pub const SRCH_EVENT_FOR_PROMPT: u32 = 1 << 27;
    pub const SRCH_EDIT: u32 = 1 << 29;
    pub const ENABLE_AUTO_CMPLT_SRCH_RECORD: u32 = 1 << 30;
    pub const PERSIST_IN_MENU: u32 = 1 << 31;

    pub fn contains(&self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    pub fn is_key(&self) -> bool {
        self.contains(Self::KEY)
    }

    pub fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }
}
