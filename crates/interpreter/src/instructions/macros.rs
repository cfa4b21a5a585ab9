//! Shared shapes of the instruction handlers.

/// Charges gas, halting the frame with `OutOfGas` when it cannot pay.
#[macro_export]
macro_rules! gas {
    ($interpreter:expr, $gas:expr) => {
        $crate::gas!($interpreter, $gas, ())
    };
    ($interpreter:expr, $gas:expr, $ret:expr) => {
        if !$interpreter.gas.record_cost($gas) {
            $interpreter.halt_oog();
            return $ret;
        }
    };
}

/// Charges a fallible (overflow-checked) gas amount.
#[macro_export]
macro_rules! gas_or_fail {
    ($interpreter:expr, $gas:expr) => {
        match $gas {
            Some(cost) => $crate::gas!($interpreter, cost),
            None => {
                $interpreter.halt_oog();
                return;
            }
        }
    };
}

/// Pops `N` named words off the stack, halting on underflow.
#[macro_export]
macro_rules! popn {
    ([ $($x:ident),* ], $interpreter:expr $(, $ret:expr)?) => {
        let Some([$($x),*]) = $interpreter.stack.popn() else {
            $interpreter.halt_underflow();
            return $($ret)?;
        };
    };
}

/// Pops `N` named words and binds the new top in place.
#[macro_export]
macro_rules! popn_top {
    ([ $($x:ident),* ], $top:ident, $interpreter:expr $(, $ret:expr)?) => {
        let Some(([$($x),*], $top)) = $interpreter.stack.popn_top() else {
            $interpreter.halt_underflow();
            return $($ret)?;
        };
    };
}

/// Pushes a word, halting on overflow.
#[macro_export]
macro_rules! push {
    ($interpreter:expr, $value:expr) => {
        if !$interpreter.stack.push($value) {
            $interpreter.halt_overflow();
            return;
        }
    };
}

/// Charges and performs memory expansion for `[offset, offset + len)`.
#[macro_export]
macro_rules! resize_memory {
    ($interpreter:expr, $offset:expr, $len:expr) => {
        $crate::resize_memory!($interpreter, $offset, $len, ())
    };
    ($interpreter:expr, $offset:expr, $len:expr, $ret:expr) => {
        if let Err(result) = $crate::interpreter::resize_memory(
            &mut $interpreter.gas,
            &mut $interpreter.memory,
            $offset,
            $len,
        ) {
            $interpreter.halt(result);
            return $ret;
        }
    };
}

/// Fails state-mutating opcodes inside a static call.
#[macro_export]
macro_rules! require_non_staticcall {
    ($interpreter:expr) => {
        if $interpreter.is_static {
            $interpreter.halt($crate::InstructionResult::WriteProtection);
            return;
        }
    };
}

/// Fails the instruction when the given hardfork is not active.
#[macro_export]
macro_rules! check {
    ($interpreter:expr, $min:expr) => {
        if !$interpreter.spec.is_enabled_in($min) {
            $interpreter.halt($crate::InstructionResult::InvalidOpcode);
            return;
        }
    };
}

/// Converts a word to `usize`, halting when it does not fit.
#[macro_export]
macro_rules! as_usize_or_fail {
    ($interpreter:expr, $word:expr) => {
        $crate::as_usize_or_fail!($interpreter, $word, $crate::InstructionResult::MemoryOverflow)
    };
    ($interpreter:expr, $word:expr, $reason:expr) => {{
        let limbs = $word.as_limbs();
        if limbs[1] != 0 || limbs[2] != 0 || limbs[3] != 0 || limbs[0] > usize::MAX as u64 {
            $interpreter.halt($reason);
            return;
        }
        limbs[0] as usize
    }};
}

/// Converts a word to `u64`, saturating at the maximum.
#[macro_export]
macro_rules! as_u64_saturated {
    ($word:expr) => {{
        let limbs = $word.as_limbs();
        if limbs[1] == 0 && limbs[2] == 0 && limbs[3] == 0 {
            limbs[0]
        } else {
            u64::MAX
        }
    }};
}
