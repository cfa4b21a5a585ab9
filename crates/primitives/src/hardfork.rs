//! The hardfork timeline.

use core::str::FromStr;

/// Named points on the EVM feature-progression timeline, in activation order.
///
/// The discriminant encodes the order, so gating an opcode or a gas schedule
/// is a single integer comparison via [`Hardfork::is_enabled_in`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hardfork {
    /// Frontier (block 0).
    Frontier = 0,
    /// Homestead, EIP-2 create semantics.
    Homestead,
    /// Tangerine Whistle, EIP-150 gas repricing.
    Tangerine,
    /// Spurious Dragon, EIP-161 state clearing and EIP-160 EXP repricing.
    SpuriousDragon,
    /// Byzantium: REVERT, RETURNDATA*, STATICCALL.
    Byzantium,
    /// Constantinople/Petersburg: shifts, CREATE2, EXTCODEHASH.
    Constantinople,
    /// Istanbul: CHAINID, SELFBALANCE, EIP-2200 net metering.
    Istanbul,
    /// Berlin: EIP-2929 warm/cold access, typed access-list transactions.
    Berlin,
    /// London: BASEFEE, EIP-3529 refund reduction, EIP-3541.
    London,
    /// Paris/Merge: PREVRANDAO replaces DIFFICULTY.
    Merge,
    /// Shanghai: PUSH0, warm coinbase, initcode metering.
    Shanghai,
    /// Cancun: transient storage, MCOPY, blobs, EIP-6780 SELFDESTRUCT.
    Cancun,
    /// Prague: EIP-7702 delegation designators.
    Prague,
    /// Tracks the newest supported fork.
    #[default]
    Latest = u8::MAX,
}

impl Hardfork {
    /// Returns the hardfork for a raw discriminant, if it names one.
    pub const fn try_from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Frontier,
            1 => Self::Homestead,
            2 => Self::Tangerine,
            3 => Self::SpuriousDragon,
            4 => Self::Byzantium,
            5 => Self::Constantinople,
            6 => Self::Istanbul,
            7 => Self::Berlin,
            8 => Self::London,
            9 => Self::Merge,
            10 => Self::Shanghai,
            11 => Self::Cancun,
            12 => Self::Prague,
            u8::MAX => Self::Latest,
            _ => return None,
        })
    }

    /// Returns `true` if `fork` is active in `self`.
    #[inline]
    pub const fn is_enabled_in(self, fork: Self) -> bool {
        self as u8 >= fork as u8
    }

    /// Canonical display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontier => name::FRONTIER,
            Self::Homestead => name::HOMESTEAD,
            Self::Tangerine => name::TANGERINE,
            Self::SpuriousDragon => name::SPURIOUS_DRAGON,
            Self::Byzantium => name::BYZANTIUM,
            Self::Constantinople => name::CONSTANTINOPLE,
            Self::Istanbul => name::ISTANBUL,
            Self::Berlin => name::BERLIN,
            Self::London => name::LONDON,
            Self::Merge => name::MERGE,
            Self::Shanghai => name::SHANGHAI,
            Self::Cancun => name::CANCUN,
            Self::Prague => name::PRAGUE,
            Self::Latest => name::LATEST,
        }
    }
}

/// String identifiers for hardforks.
pub mod name {
    pub const FRONTIER: &str = "Frontier";
    pub const HOMESTEAD: &str = "Homestead";
    pub const TANGERINE: &str = "Tangerine";
    pub const SPURIOUS_DRAGON: &str = "SpuriousDragon";
    pub const BYZANTIUM: &str = "Byzantium";
    pub const CONSTANTINOPLE: &str = "Constantinople";
    pub const ISTANBUL: &str = "Istanbul";
    pub const BERLIN: &str = "Berlin";
    pub const LONDON: &str = "London";
    pub const MERGE: &str = "Merge";
    pub const SHANGHAI: &str = "Shanghai";
    pub const CANCUN: &str = "Cancun";
    pub const PRAGUE: &str = "Prague";
    pub const LATEST: &str = "Latest";
}

/// Error returned when parsing an unknown hardfork name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownHardfork;

impl FromStr for Hardfork {
    type Err = UnknownHardfork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            name::FRONTIER => Ok(Self::Frontier),
            name::HOMESTEAD => Ok(Self::Homestead),
            name::TANGERINE => Ok(Self::Tangerine),
            name::SPURIOUS_DRAGON => Ok(Self::SpuriousDragon),
            name::BYZANTIUM => Ok(Self::Byzantium),
            name::CONSTANTINOPLE => Ok(Self::Constantinople),
            name::ISTANBUL => Ok(Self::Istanbul),
            name::BERLIN => Ok(Self::Berlin),
            name::LONDON => Ok(Self::London),
            name::MERGE => Ok(Self::Merge),
            name::SHANGHAI => Ok(Self::Shanghai),
            name::CANCUN => Ok(Self::Cancun),
            name::PRAGUE => Ok(Self::Prague),
            name::LATEST => Ok(Self::Latest),
            _ => Err(UnknownHardfork),
        }
    }
}

impl core::fmt::Display for Hardfork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
