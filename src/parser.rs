use std::cmp::Reverse;

use tracing::{debug, warn};

use crate::instruction::{
    Condition, EncodingClass, Instruction, Mnemonic, Operand, OperandSign, OperandSize,
    RegisterType,
};
use crate::isa;
use crate::lexer::{Token, TokenKind};
use crate::stream::Stream;

const SIZE_SUFFIXES: &[(&str, OperandSize)] = &[
    ("hw", OperandSize::Byte),
    ("dw", OperandSize::Double),
    ("qw", OperandSize::Quad),
    ("b", OperandSize::Byte),
    ("w", OperandSize::Word),
    ("d", OperandSize::Double),
    ("q", OperandSize::Quad),
];

const COND_SUFFIXES: &[(&str, Condition)] = &[
    ("nv", Condition::Never),
    ("nz", Condition::NotZero),
    ("nc", Condition::NotCarry),
    ("z", Condition::Zero),
    ("c", Condition::Carry),
    ("n", Condition::Negative),
    ("p", Condition::Positive),
];

const SIGN_SUFFIXES: &[(&str, OperandSign)] = &[("s", OperandSign::Signed)];

/// Consumes the full token queue and builds the instruction stream.
///
/// Top-level tokens that are not instruction mnemonics are skipped; each
/// mnemonic collects its trailing operand tokens up to and including the
/// next semicolon.
pub fn parse(mut tokens: Stream<Token>) -> Stream<Instruction> {
    let mut out = Stream::new();
    while let Some(t) = tokens.get() {
        if t.kind == TokenKind::Instruction {
            let mnemonic = parse_mnemonic(&t.text);
            let operands = parse_operands(&mut tokens);
            let encoding_class = classify(&operands);
            out.put(Instruction {
                mnemonic,
                encoding_class,
                operands,
            });
        }
    }
    debug!(instructions = out.len(), "token stream parsed");
    out
}

/// Decodes `base (sizeSuffix)? (condSuffix)? (signSuffix)?`.
///
/// Candidate bases are tried longest-first; the first base whose remainder
/// parses as exact suffixes wins. Text matching no base keeps all default
/// fields (word, unsigned, always) — fails open.
pub fn parse_mnemonic(text: &str) -> Mnemonic {
    let mut bases: Vec<&'static str> = isa::TABLE
        .iter()
        .map(|desc| desc.base)
        .filter(|base| text.starts_with(base))
        .collect();
    bases.sort_by_key(|base| Reverse(base.len()));

    for base in bases {
        if let Some((size, cond, sign)) = match_suffixes(&text[base.len()..]) {
            return Mnemonic {
                id: base.to_string(),
                size,
                sign,
                cond,
            };
        }
    }

    warn!(mnemonic = %text, "unrecognized mnemonic, keeping default fields");
    Mnemonic {
        id: text.to_string(),
        ..Mnemonic::default()
    }
}

/// All ways to strip one suffix from `rest`, in declared order, with the
/// absent-suffix default last.
fn suffix_options<'a, T: Copy>(
    rest: &'a str,
    table: &[(&'static str, T)],
    default: T,
) -> Vec<(&'a str, T)> {
    let mut options: Vec<(&'a str, T)> = table
        .iter()
        .filter_map(|&(suffix, value)| rest.strip_prefix(suffix).map(|r| (r, value)))
        .collect();
    options.push((rest, default));
    options
}

fn match_suffixes(rest: &str) -> Option<(OperandSize, Condition, OperandSign)> {
    for (rest, size) in suffix_options(rest, SIZE_SUFFIXES, OperandSize::Word) {
        for (rest, cond) in suffix_options(rest, COND_SUFFIXES, Condition::Always) {
            for (rest, sign) in suffix_options(rest, SIGN_SUFFIXES, OperandSign::Unsigned) {
                if rest.is_empty() {
                    return Some((size, cond, sign));
                }
            }
        }
    }
    None
}

/// Collects operands until (and including) the next semicolon. Tokens are
/// classified by the first character of their text; anything that fits
/// neither operand form is skipped without aborting.
fn parse_operands(tokens: &mut Stream<Token>) -> Vec<Operand> {
    let mut operands = Vec::new();
    let mut position = 0usize;

    while let Some(t) = tokens.get() {
        if t.kind == TokenKind::Semicolon {
            break;
        }
        let Some(first) = t.text.chars().next() else {
            continue;
        };

        if first.is_ascii_digit() || first == '+' || first == '-' {
            match constant_value(&t.text) {
                Some(value) => {
                    operands.push(Operand::constant(value, position));
                    position += 1;
                }
                None => warn!(operand = %t.text, "unparseable constant operand, skipping"),
            }
        } else if first.is_ascii_alphabetic() {
            match register_operand(&t.text) {
                Some((reg_type, number)) => {
                    operands.push(Operand::register(reg_type, number, position));
                    position += 1;
                }
                None => warn!(operand = %t.text, "unparseable register operand, skipping"),
            }
        }
    }
    operands
}

// Optional sign, then 0x-prefixed hex or decimal. '-' wraps through
// two's complement.
fn constant_value(text: &str) -> Option<u64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u64>().ok()?,
    };
    Some(if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    })
}

// Leading alphabetic run is the type tag, trailing digit run the number.
fn register_operand(text: &str) -> Option<(RegisterType, u32)> {
    let digits_at = text.find(|c: char| c.is_ascii_digit())?;
    let (tag, digits) = text.split_at(digits_at);
    let number = digits.parse::<u32>().ok()?;
    let reg_type = match tag {
        "r" | "gpr" => RegisterType::Gpr,
        "f" | "fpr" => RegisterType::Fpr,
        _ => {
            warn!(tag = %tag, "unknown register type, treating as general-purpose");
            RegisterType::Gpr
        }
    };
    Some((reg_type, number))
}

/// Encoding-class selection: a pure function of operand count and whether
/// any operand is a constant. More than three operands saturates to the
/// three-operand rows.
fn classify(operands: &[Operand]) -> EncodingClass {
    let has_const = operands.iter().any(Operand::is_constant);
    match (operands.len(), has_const) {
        (0, _) => EncodingClass::NoOperand,
        (1, false) => EncodingClass::SingleReg,
        (1, true) => EncodingClass::SingleConst,
        (2, false) => EncodingClass::DoubleReg,
        (2, true) => EncodingClass::RegConst,
        (3, false) => EncodingClass::TripleReg,
        (3, true) => EncodingClass::DoubleRegConst,
        (n, false) => {
            warn!(operands = n, "more than three operands, encoding as triple-register");
            EncodingClass::TripleReg
        }
        (n, true) => {
            warn!(operands = n, "more than three operands, encoding as double-register-plus-const");
            EncodingClass::DoubleRegConst
        }
    }
}
