use std::io::{self, Write};

use crate::instruction::{EncodingClass, Instruction, OperandKind, OperandSize};
use crate::isa::{self, InstrClass};
use crate::stream::Stream;

/// Bit-packs instructions and writes them to the output sink.
///
/// The sink is chosen once at construction; emission is sequential and
/// fire-and-forget beyond the sink's own guarantees.
pub struct Emitter<W: Write> {
    out: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Drains the instruction stream, writing the low `length` bytes of
    /// each packed word least-significant-first, then flushes the sink.
    pub fn assemble(&mut self, mut instructions: Stream<Instruction>) -> io::Result<()> {
        while let Some(instruction) = instructions.get() {
            let length = instruction_length(instruction.encoding_class, instruction.mnemonic.size);
            let word = encode(&instruction);
            self.out.write_all(&word.to_le_bytes()[..length])?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Byte length of an encoded instruction, from (encoding class, operand
/// size). This table and the bit layout in [`encode`] must agree exactly:
/// bits past the computed length are silently discarded on write.
pub fn instruction_length(ec: EncodingClass, size: OperandSize) -> usize {
    use EncodingClass::*;
    use OperandSize::*;
    match ec {
        TripleReg => 5,
        DoubleRegConst => match size {
            Byte => 5,
            Word => 6,
            Double | Quad => 8,
        },
        DoubleReg => 4,
        RegConst => match size {
            Byte => 4,
            Word => 5,
            Double | Quad => 7,
        },
        SingleReg => 3,
        SingleConst => match size {
            Byte => 4,
            Word => 5,
            Double | Quad => 7,
        },
        NoOperand => 2,
        // never produced by operand classification
        DoubleConst => 0,
    }
}

/// Packs one instruction into its 64-bit wire word.
///
/// Layout (bit 0 = least significant):
///   0-2   condition code
///   3-7   instruction class (bits 3-4) OR'd with the encoding-class tag
///         shifted left 3 (shape bits land at 5-7)
///   8-15  opcode id byte
///   16    sign flag        } only when the instruction has operands
///   17-18 size code        }
///   19+   operand fields: 5 bits per register in stream order; a constant
///         takes all remaining high bits and does not advance the cursor
pub fn encode(instruction: &Instruction) -> u64 {
    let (opcode, class) = isa::lookup(&instruction.mnemonic.id)
        .map(|desc| (desc.opcode, desc.class))
        .unwrap_or((0, InstrClass::Alu));

    let mut word = instruction.mnemonic.cond as u64
        | ((instruction.encoding_class as u64) << 3)
        | ((class as u64) << 3)
        | ((opcode as u64) << 8);

    if instruction.encoding_class != EncodingClass::NoOperand {
        word |= (instruction.mnemonic.sign as u64) << 16;
        word |= (instruction.mnemonic.size as u64) << 17;
    }

    let mut cursor = 19u32;
    for operand in &instruction.operands {
        match operand.kind {
            OperandKind::Register { number, .. } => {
                if cursor < u64::BITS {
                    word |= (number as u64) << cursor;
                }
                cursor += 5;
            }
            OperandKind::Constant { value } => {
                if cursor < u64::BITS {
                    word |= value << cursor;
                }
            }
        }
    }
    word
}
