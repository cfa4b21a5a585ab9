//! Opcode definitions: byte constants, canonical mnemonics and per-opcode
//! metadata (stack arity, immediate width, base gas, terminator flag).

use core::fmt;

/// A valid EVM opcode.
///
/// Construction goes through [`OpCode::new`], which only accepts bytes
/// present in [`OPCODE_INFO`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct OpCode(u8);

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OpCode {
    /// Wraps a byte if it names a defined opcode.
    #[inline]
    pub const fn new(opcode: u8) -> Option<Self> {
        match OPCODE_INFO[opcode as usize] {
            Some(_) => Some(Self(opcode)),
            None => None,
        }
    }

    /// Parses a canonical mnemonic, the inverse of [`OpCode::as_str`].
    pub fn parse(name: &str) -> Option<Self> {
        NAME_TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, op)| Self(*op))
    }

    /// Canonical mnemonic of this opcode.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.info().name
    }

    /// Mnemonic for a raw byte, `"UNKNOWN"` if the byte is undefined.
    #[inline]
    pub const fn name_by_op(opcode: u8) -> &'static str {
        match Self::new(opcode) {
            Some(op) => op.as_str(),
            None => "UNKNOWN",
        }
    }

    /// Metadata of this opcode.
    #[inline]
    pub const fn info(self) -> OpCodeInfo {
        match OPCODE_INFO[self.0 as usize] {
            Some(info) => info,
            None => panic!("undefined opcode"),
        }
    }

    /// Number of stack words popped.
    #[inline]
    pub const fn inputs(self) -> u8 {
        self.info().inputs
    }

    /// Number of stack words pushed.
    #[inline]
    pub const fn outputs(self) -> u8 {
        self.info().outputs
    }

    /// Immediate width in bytes following the opcode (`n` for `PUSHn`).
    #[inline]
    pub const fn immediate_size(self) -> u8 {
        self.info().immediate_size
    }

    /// Whether this opcode unconditionally ends execution of the frame.
    #[inline]
    pub const fn is_terminating(self) -> bool {
        self.info().terminating
    }

    /// Whether this is one of `PUSH1..=PUSH32`.
    #[inline]
    pub const fn is_push(self) -> bool {
        self.0 >= PUSH1 && self.0 <= PUSH32
    }

    /// Whether this opcode is `JUMPDEST`.
    #[inline]
    pub const fn is_jumpdest(self) -> bool {
        self.0 == JUMPDEST
    }

    /// Returns the raw byte.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the raw byte widened to `usize` for table indexing.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl PartialEq<u8> for OpCode {
    fn eq(&self, other: &u8) -> bool {
        self.0 == *other
    }
}

/// Static metadata of one opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpCodeInfo {
    /// Canonical mnemonic.
    pub name: &'static str,
    /// Stack words popped.
    pub inputs: u8,
    /// Stack words pushed.
    pub outputs: u8,
    /// Immediate bytes following the opcode.
    pub immediate_size: u8,
    /// Hardfork-independent base gas. Opcodes whose cost is entirely
    /// access- or size-dependent carry `0` here and are priced by their
    /// handler.
    pub base_gas: u16,
    /// Unconditionally ends the frame (STOP, RETURN, REVERT, INVALID,
    /// SELFDESTRUCT).
    pub terminating: bool,
}

impl OpCodeInfo {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            inputs: 0,
            outputs: 0,
            immediate_size: 0,
            base_gas: 0,
            terminating: false,
        }
    }
}

const fn stack_io(mut info: OpCodeInfo, inputs: u8, outputs: u8) -> OpCodeInfo {
    info.inputs = inputs;
    info.outputs = outputs;
    info
}

const fn immediate(mut info: OpCodeInfo, size: u8) -> OpCodeInfo {
    info.immediate_size = size;
    info
}

const fn gas(mut info: OpCodeInfo, base: u16) -> OpCodeInfo {
    info.base_gas = base;
    info
}

const fn terminating(mut info: OpCodeInfo) -> OpCodeInfo {
    info.terminating = true;
    info
}

/// Defines byte constants, [`OpCode`] associated constants, the
/// [`OPCODE_INFO`] metadata table and the mnemonic lookup table.
macro_rules! opcodes {
    ($($val:literal => $name:ident => $($modifier:ident $(( $($arg:expr),* ))?),*;)*) => {
        $(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name), "\") opcode.")]
            pub const $name: u8 = $val;
        )*
        impl OpCode {$(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name), "\") opcode.")]
            pub const $name: Self = Self($val);
        )*}

        /// Maps each opcode byte to its metadata, `None` for undefined bytes.
        pub static OPCODE_INFO: [Option<OpCodeInfo>; 256] = {
            let mut table = [None; 256];
            $(
                let info = OpCodeInfo::new(stringify!($name));
                $(let info = $modifier(info $(, $($arg),*)?);)*
                table[$val] = Some(info);
            )*
            table
        };

        static NAME_TABLE: &[(&str, u8)] = &[$((stringify!($name), $val),)*];
    };
}

opcodes! {
    0x00 => STOP => stack_io(0, 0), terminating;
    0x01 => ADD => stack_io(2, 1), gas(3);
    0x02 => MUL => stack_io(2, 1), gas(5);
    0x03 => SUB => stack_io(2, 1), gas(3);
    0x04 => DIV => stack_io(2, 1), gas(5);
    0x05 => SDIV => stack_io(2, 1), gas(5);
    0x06 => MOD => stack_io(2, 1), gas(5);
    0x07 => SMOD => stack_io(2, 1), gas(5);
    0x08 => ADDMOD => stack_io(3, 1), gas(8);
    0x09 => MULMOD => stack_io(3, 1), gas(8);
    0x0A => EXP => stack_io(2, 1), gas(10);
    0x0B => SIGNEXTEND => stack_io(2, 1), gas(5);
    0x10 => LT => stack_io(2, 1), gas(3);
    0x11 => GT => stack_io(2, 1), gas(3);
    0x12 => SLT => stack_io(2, 1), gas(3);
    0x13 => SGT => stack_io(2, 1), gas(3);
    0x14 => EQ => stack_io(2, 1), gas(3);
    0x15 => ISZERO => stack_io(1, 1), gas(3);
    0x16 => AND => stack_io(2, 1), gas(3);
    0x17 => OR => stack_io(2, 1), gas(3);
    0x18 => XOR => stack_io(2, 1), gas(3);
    0x19 => NOT => stack_io(1, 1), gas(3);
    0x1A => BYTE => stack_io(2, 1), gas(3);
    0x1B => SHL => stack_io(2, 1), gas(3);
    0x1C => SHR => stack_io(2, 1), gas(3);
    0x1D => SAR => stack_io(2, 1), gas(3);
    0x20 => KECCAK256 => stack_io(2, 1), gas(30);
    0x30 => ADDRESS => stack_io(0, 1), gas(2);
    0x31 => BALANCE => stack_io(1, 1);
    0x32 => ORIGIN => stack_io(0, 1), gas(2);
    0x33 => CALLER => stack_io(0, 1), gas(2);
    0x34 => CALLVALUE => stack_io(0, 1), gas(2);
    0x35 => CALLDATALOAD => stack_io(1, 1), gas(3);
    0x36 => CALLDATASIZE => stack_io(0, 1), gas(2);
    0x37 => CALLDATACOPY => stack_io(3, 0), gas(3);
    0x38 => CODESIZE => stack_io(0, 1), gas(2);
    0x39 => CODECOPY => stack_io(3, 0), gas(3);
    0x3A => GASPRICE => stack_io(0, 1), gas(2);
    0x3B => EXTCODESIZE => stack_io(1, 1);
    0x3C => EXTCODECOPY => stack_io(4, 0);
    0x3D => RETURNDATASIZE => stack_io(0, 1), gas(2);
    0x3E => RETURNDATACOPY => stack_io(3, 0), gas(3);
    0x3F => EXTCODEHASH => stack_io(1, 1);
    0x40 => BLOCKHASH => stack_io(1, 1), gas(20);
    0x41 => COINBASE => stack_io(0, 1), gas(2);
    0x42 => TIMESTAMP => stack_io(0, 1), gas(2);
    0x43 => NUMBER => stack_io(0, 1), gas(2);
    0x44 => PREVRANDAO => stack_io(0, 1), gas(2);
    0x45 => GASLIMIT => stack_io(0, 1), gas(2);
    0x46 => CHAINID => stack_io(0, 1), gas(2);
    0x47 => SELFBALANCE => stack_io(0, 1), gas(5);
    0x48 => BASEFEE => stack_io(0, 1), gas(2);
    0x49 => BLOBHASH => stack_io(1, 1), gas(3);
    0x4A => BLOBBASEFEE => stack_io(0, 1), gas(2);
    0x50 => POP => stack_io(1, 0), gas(2);
    0x51 => MLOAD => stack_io(1, 1), gas(3);
    0x52 => MSTORE => stack_io(2, 0), gas(3);
    0x53 => MSTORE8 => stack_io(2, 0), gas(3);
    0x54 => SLOAD => stack_io(1, 1);
    0x55 => SSTORE => stack_io(2, 0);
    0x56 => JUMP => stack_io(1, 0), gas(8);
    0x57 => JUMPI => stack_io(2, 0), gas(10);
    0x58 => PC => stack_io(0, 1), gas(2);
    0x59 => MSIZE => stack_io(0, 1), gas(2);
    0x5A => GAS => stack_io(0, 1), gas(2);
    0x5B => JUMPDEST => stack_io(0, 0), gas(1);
    0x5C => TLOAD => stack_io(1, 1), gas(100);
    0x5D => TSTORE => stack_io(2, 0), gas(100);
    0x5E => MCOPY => stack_io(3, 0), gas(3);
    0x5F => PUSH0 => stack_io(0, 1), gas(2);
    0x60 => PUSH1 => stack_io(0, 1), gas(3), immediate(1);
    0x61 => PUSH2 => stack_io(0, 1), gas(3), immediate(2);
    0x62 => PUSH3 => stack_io(0, 1), gas(3), immediate(3);
    0x63 => PUSH4 => stack_io(0, 1), gas(3), immediate(4);
    0x64 => PUSH5 => stack_io(0, 1), gas(3), immediate(5);
    0x65 => PUSH6 => stack_io(0, 1), gas(3), immediate(6);
    0x66 => PUSH7 => stack_io(0, 1), gas(3), immediate(7);
    0x67 => PUSH8 => stack_io(0, 1), gas(3), immediate(8);
    0x68 => PUSH9 => stack_io(0, 1), gas(3), immediate(9);
    0x69 => PUSH10 => stack_io(0, 1), gas(3), immediate(10);
    0x6A => PUSH11 => stack_io(0, 1), gas(3), immediate(11);
    0x6B => PUSH12 => stack_io(0, 1), gas(3), immediate(12);
    0x6C => PUSH13 => stack_io(0, 1), gas(3), immediate(13);
    0x6D => PUSH14 => stack_io(0, 1), gas(3), immediate(14);
    0x6E => PUSH15 => stack_io(0, 1), gas(3), immediate(15);
    0x6F => PUSH16 => stack_io(0, 1), gas(3), immediate(16);
    0x70 => PUSH17 => stack_io(0, 1), gas(3), immediate(17);
    0x71 => PUSH18 => stack_io(0, 1), gas(3), immediate(18);
    0x72 => PUSH19 => stack_io(0, 1), gas(3), immediate(19);
    0x73 => PUSH20 => stack_io(0, 1), gas(3), immediate(20);
    0x74 => PUSH21 => stack_io(0, 1), gas(3), immediate(21);
    0x75 => PUSH22 => stack_io(0, 1), gas(3), immediate(22);
    0x76 => PUSH23 => stack_io(0, 1), gas(3), immediate(23);
    0x77 => PUSH24 => stack_io(0, 1), gas(3), immediate(24);
    0x78 => PUSH25 => stack_io(0, 1), gas(3), immediate(25);
    0x79 => PUSH26 => stack_io(0, 1), gas(3), immediate(26);
    0x7A => PUSH27 => stack_io(0, 1), gas(3), immediate(27);
    0x7B => PUSH28 => stack_io(0, 1), gas(3), immediate(28);
    0x7C => PUSH29 => stack_io(0, 1), gas(3), immediate(29);
    0x7D => PUSH30 => stack_io(0, 1), gas(3), immediate(30);
    0x7E => PUSH31 => stack_io(0, 1), gas(3), immediate(31);
    0x7F => PUSH32 => stack_io(0, 1), gas(3), immediate(32);
    0x80 => DUP1 => stack_io(1, 2), gas(3);
    0x81 => DUP2 => stack_io(2, 3), gas(3);
    0x82 => DUP3 => stack_io(3, 4), gas(3);
    0x83 => DUP4 => stack_io(4, 5), gas(3);
    0x84 => DUP5 => stack_io(5, 6), gas(3);
    0x85 => DUP6 => stack_io(6, 7), gas(3);
    0x86 => DUP7 => stack_io(7, 8), gas(3);
    0x87 => DUP8 => stack_io(8, 9), gas(3);
    0x88 => DUP9 => stack_io(9, 10), gas(3);
    0x89 => DUP10 => stack_io(10, 11), gas(3);
    0x8A => DUP11 => stack_io(11, 12), gas(3);
    0x8B => DUP12 => stack_io(12, 13), gas(3);
    0x8C => DUP13 => stack_io(13, 14), gas(3);
    0x8D => DUP14 => stack_io(14, 15), gas(3);
    0x8E => DUP15 => stack_io(15, 16), gas(3);
    0x8F => DUP16 => stack_io(16, 17), gas(3);
    0x90 => SWAP1 => stack_io(2, 2), gas(3);
    0x91 => SWAP2 => stack_io(3, 3), gas(3);
    0x92 => SWAP3 => stack_io(4, 4), gas(3);
    0x93 => SWAP4 => stack_io(5, 5), gas(3);
    0x94 => SWAP5 => stack_io(6, 6), gas(3);
    0x95 => SWAP6 => stack_io(7, 7), gas(3);
    0x96 => SWAP7 => stack_io(8, 8), gas(3);
    0x97 => SWAP8 => stack_io(9, 9), gas(3);
    0x98 => SWAP9 => stack_io(10, 10), gas(3);
    0x99 => SWAP10 => stack_io(11, 11), gas(3);
    0x9A => SWAP11 => stack_io(12, 12), gas(3);
    0x9B => SWAP12 => stack_io(13, 13), gas(3);
    0x9C => SWAP13 => stack_io(14, 14), gas(3);
    0x9D => SWAP14 => stack_io(15, 15), gas(3);
    0x9E => SWAP15 => stack_io(16, 16), gas(3);
    0x9F => SWAP16 => stack_io(17, 17), gas(3);
    0xA0 => LOG0 => stack_io(2, 0), gas(375);
    0xA1 => LOG1 => stack_io(3, 0), gas(750);
    0xA2 => LOG2 => stack_io(4, 0), gas(1125);
    0xA3 => LOG3 => stack_io(5, 0), gas(1500);
    0xA4 => LOG4 => stack_io(6, 0), gas(1875);
    0xF0 => CREATE => stack_io(3, 1), gas(32000);
    0xF1 => CALL => stack_io(7, 1);
    0xF2 => CALLCODE => stack_io(7, 1);
    0xF3 => RETURN => stack_io(2, 0), terminating;
    0xF4 => DELEGATECALL => stack_io(6, 1);
    0xF5 => CREATE2 => stack_io(4, 1), gas(32000);
    0xFA => STATICCALL => stack_io(6, 1);
    0xFD => REVERT => stack_io(2, 0), terminating;
    0xFE => INVALID => stack_io(0, 0), terminating;
    0xFF => SELFDESTRUCT => stack_io(1, 0), terminating;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_mnemonics() {
        assert_eq!(OpCode::name_by_op(0x00), "STOP");
        assert_eq!(OpCode::name_by_op(0x01), "ADD");
        assert_eq!(OpCode::name_by_op(0x5F), "PUSH0");
        assert_eq!(OpCode::name_by_op(0x60), "PUSH1");
        assert_eq!(OpCode::name_by_op(0x7F), "PUSH32");
        assert_eq!(OpCode::name_by_op(0x80), "DUP1");
        assert_eq!(OpCode::name_by_op(0x9F), "SWAP16");
        assert_eq!(OpCode::name_by_op(0xA4), "LOG4");
        assert_eq!(OpCode::name_by_op(0xF4), "DELEGATECALL");
        assert_eq!(OpCode::name_by_op(0xFA), "STATICCALL");
        assert_eq!(OpCode::name_by_op(0xFE), "INVALID");
        assert_eq!(OpCode::name_by_op(0x5C), "TLOAD");
        assert_eq!(OpCode::name_by_op(0x5E), "MCOPY");
        assert_eq!(OpCode::name_by_op(0x49), "BLOBHASH");
        assert_eq!(OpCode::name_by_op(0x0C), "UNKNOWN");
    }

    #[test]
    fn parse_is_inverse_of_as_str() {
        for (i, info) in OPCODE_INFO.iter().enumerate() {
            let Some(info) = info else { continue };
            let parsed = OpCode::parse(info.name).unwrap();
            assert_eq!(parsed.get() as usize, i);
        }
        assert_eq!(OpCode::parse("NOPE"), None);
    }

    #[test]
    fn push_immediates() {
        for n in 1u8..=32 {
            let op = OpCode::new(PUSH1 + n - 1).unwrap();
            assert!(op.is_push());
            assert_eq!(op.immediate_size(), n);
        }
        assert!(!OpCode::PUSH0.is_push());
        assert_eq!(OpCode::PUSH0.immediate_size(), 0);
    }

    #[test]
    fn terminators() {
        for op in [
            OpCode::STOP,
            OpCode::RETURN,
            OpCode::REVERT,
            OpCode::INVALID,
            OpCode::SELFDESTRUCT,
        ] {
            assert!(op.is_terminating());
        }
        assert!(!OpCode::JUMP.is_terminating());
        assert!(!OpCode::JUMPI.is_terminating());
    }
}
