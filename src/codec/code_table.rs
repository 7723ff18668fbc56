//! The RFC 3284 default instruction code table (section 5.6).

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InstKind {
    Noop,
    Add,
    Run,
    Copy,
}

/// One half of a code table entry. A `size` of 0 means the size follows the
/// opcode in the instruction section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Inst {
    pub kind: InstKind,
    pub size: u8,
    pub mode: u8,
}

impl Inst {
    const NOOP: Self = Self {
        kind: InstKind::Noop,
        size: 0,
        mode: 0,
    };

    const fn add(size: u8) -> Self {
        Self {
            kind: InstKind::Add,
            size,
            mode: 0,
        }
    }

    const fn copy(size: u8, mode: u8) -> Self {
        Self {
            kind: InstKind::Copy,
            size,
            mode,
        }
    }
}

pub(crate) type CodeTable = [(Inst, Inst); 256];

/// Number of COPY modes with the default cache (self, here, 4 near, 3 same).
pub(crate) const COPY_MODES: u8 = 9;

pub(crate) fn default_code_table() -> &'static CodeTable {
    static TABLE: OnceLock<CodeTable> = OnceLock::new();
    TABLE.get_or_init(build_default)
}

fn build_default() -> CodeTable {
    let mut table = [(Inst::NOOP, Inst::NOOP); 256];
    let mut index = 0usize;
    let mut push = |first: Inst, second: Inst| {
        table[index] = (first, second);
        index += 1;
    };

    push(
        Inst {
            kind: InstKind::Run,
            size: 0,
            mode: 0,
        },
        Inst::NOOP,
    );

    push(Inst::add(0), Inst::NOOP);
    for size in 1..=17 {
        push(Inst::add(size), Inst::NOOP);
    }

    for mode in 0..COPY_MODES {
        push(Inst::copy(0, mode), Inst::NOOP);
        for size in 4..=18 {
            push(Inst::copy(size, mode), Inst::NOOP);
        }
    }

    for mode in 0..6 {
        for add_size in 1..=4 {
            for copy_size in 4..=6 {
                push(Inst::add(add_size), Inst::copy(copy_size, mode));
            }
        }
    }

    for mode in 6..COPY_MODES {
        for add_size in 1..=4 {
            push(Inst::add(add_size), Inst::copy(4, mode));
        }
    }

    for mode in 0..COPY_MODES {
        push(Inst::copy(4, mode), Inst::add(1));
    }

    debug_assert_eq!(index, 256);
    table
}

/// Opcode for a lone ADD whose size follows the opcode.
pub(crate) const OPCODE_ADD_EXPLICIT: u8 = 1;

/// Opcode for a lone ADD of `size` bytes encoded in the table, if one exists.
pub(crate) fn add_opcode(size: usize) -> Option<u8> {
    (1..=17).contains(&size).then(|| (size + 1) as u8)
}

/// Opcode for a lone COPY in `mode`, and whether the size must follow it.
pub(crate) fn copy_opcode(size: usize, mode: u8) -> (u8, bool) {
    let base = 19 + u16::from(mode) * 16;
    if (4..=18).contains(&size) {
        ((base + size as u16 - 3) as u8, false)
    } else {
        (base as u8, true)
    }
}
