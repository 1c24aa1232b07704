use serde::{Deserialize, Serialize};

/// 2-bit instruction class, bits 3-4 of the packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrClass {
    /// Arithmetic-logic unit
    Alu = 0b00,
    /// Load-store unit
    Lsu = 0b01,
    /// Branches and jumps
    Bnj = 0b10,
    /// System
    Sys = 0b11,
}

#[derive(Debug, Clone, Copy)]
pub struct OpDesc {
    pub base: &'static str,
    pub opcode: u8,
    pub class: InstrClass,
}

/// The fixed mnemonic vocabulary. Unary ALU ops share the low binary ids.
pub const TABLE: &[OpDesc] = &[
    // ALU binary
    OpDesc { base: "add", opcode: 0x0, class: InstrClass::Alu },
    OpDesc { base: "sub", opcode: 0x1, class: InstrClass::Alu },
    OpDesc { base: "rsub", opcode: 0x2, class: InstrClass::Alu },
    OpDesc { base: "mul", opcode: 0x3, class: InstrClass::Alu },
    OpDesc { base: "div", opcode: 0x4, class: InstrClass::Alu },
    OpDesc { base: "rdiv", opcode: 0x5, class: InstrClass::Alu },
    OpDesc { base: "mod", opcode: 0x6, class: InstrClass::Alu },
    OpDesc { base: "and", opcode: 0x7, class: InstrClass::Alu },
    OpDesc { base: "or", opcode: 0x8, class: InstrClass::Alu },
    OpDesc { base: "xor", opcode: 0x9, class: InstrClass::Alu },
    OpDesc { base: "sl", opcode: 0xa, class: InstrClass::Alu },
    OpDesc { base: "sr", opcode: 0xb, class: InstrClass::Alu },
    OpDesc { base: "cmp", opcode: 0xc, class: InstrClass::Alu },
    OpDesc { base: "test", opcode: 0xd, class: InstrClass::Alu },
    OpDesc { base: "addsp", opcode: 0xe0, class: InstrClass::Alu },
    OpDesc { base: "subsp", opcode: 0xe1, class: InstrClass::Alu },
    // ALU unary
    OpDesc { base: "not", opcode: 0x0, class: InstrClass::Alu },
    OpDesc { base: "i", opcode: 0x1, class: InstrClass::Alu },
    OpDesc { base: "d", opcode: 0x2, class: InstrClass::Alu },
    OpDesc { base: "abs", opcode: 0x3, class: InstrClass::Alu },
    // LSU
    OpDesc { base: "l", opcode: 0x0, class: InstrClass::Lsu },
    OpDesc { base: "s", opcode: 0x1, class: InstrClass::Lsu },
    OpDesc { base: "lr", opcode: 0x2, class: InstrClass::Lsu },
    OpDesc { base: "lsp", opcode: 0xe0, class: InstrClass::Lsu },
    OpDesc { base: "push", opcode: 0xd0, class: InstrClass::Lsu },
    OpDesc { base: "pop", opcode: 0xd1, class: InstrClass::Lsu },
    // BNJ
    OpDesc { base: "b", opcode: 0x0, class: InstrClass::Bnj },
    OpDesc { base: "j", opcode: 0x1, class: InstrClass::Bnj },
    OpDesc { base: "call", opcode: 0xfe, class: InstrClass::Bnj },
    // SYS
    OpDesc { base: "halt", opcode: 0xfe, class: InstrClass::Sys },
    OpDesc { base: "ret", opcode: 0xff, class: InstrClass::Sys },
];

pub fn lookup(base: &str) -> Option<&'static OpDesc> {
    TABLE.iter().find(|desc| desc.base == base)
}
