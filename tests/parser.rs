use pretty_assertions::assert_eq;

use risc64_as::instruction::{
    Condition, EncodingClass, Instruction, OperandKind, OperandSign, OperandSize, RegisterType,
};
use risc64_as::lexer::Lexer;
use risc64_as::parser;

fn parse(source: &str) -> Vec<Instruction> {
    parser::parse(Lexer::new(source).lex().unwrap())
        .into_iter()
        .collect()
}

fn parse_one(source: &str) -> Instruction {
    let mut instructions = parse(source);
    assert_eq!(instructions.len(), 1, "expected one instruction");
    instructions.pop().unwrap()
}

#[test]
fn bare_mnemonics_get_default_fields() {
    for base in [
        "add", "sub", "rsub", "mul", "div", "rdiv", "mod", "and", "or", "xor", "sl", "sr", "cmp",
        "test", "addsp", "subsp", "not", "i", "d", "abs", "l", "s", "lr", "lsp", "push", "pop",
        "b", "j", "call", "halt", "ret",
    ] {
        let i = parse_one(&format!("{base};"));
        assert_eq!(i.mnemonic.id, base);
        assert_eq!(i.mnemonic.size, OperandSize::Word);
        assert_eq!(i.mnemonic.sign, OperandSign::Unsigned);
        assert_eq!(i.mnemonic.cond, Condition::Always);
    }
}

#[test]
fn size_condition_and_sign_suffixes() {
    let i = parse_one("addd %r0, #1;");
    assert_eq!(i.mnemonic.id, "add");
    assert_eq!(i.mnemonic.size, OperandSize::Double);

    let i = parse_one("bnz #0;");
    assert_eq!(i.mnemonic.id, "b");
    assert_eq!(i.mnemonic.cond, Condition::NotZero);

    let i = parse_one("cmpqws %r0, %r1;");
    assert_eq!(i.mnemonic.id, "cmp");
    assert_eq!(i.mnemonic.size, OperandSize::Quad);
    assert_eq!(i.mnemonic.sign, OperandSign::Signed);

    let i = parse_one("lhwnc %r0, #0;");
    assert_eq!(i.mnemonic.id, "l");
    assert_eq!(i.mnemonic.size, OperandSize::Byte);
    assert_eq!(i.mnemonic.cond, Condition::NotCarry);
}

#[test]
fn encoding_class_follows_arity_and_constness() {
    assert_eq!(parse_one("halt;").encoding_class, EncodingClass::NoOperand);
    assert_eq!(
        parse_one("push %r0;").encoding_class,
        EncodingClass::SingleReg
    );
    assert_eq!(parse_one("b #4;").encoding_class, EncodingClass::SingleConst);
    assert_eq!(
        parse_one("cmp %r0, %r1;").encoding_class,
        EncodingClass::DoubleReg
    );
    assert_eq!(
        parse_one("add %r0, #1;").encoding_class,
        EncodingClass::RegConst
    );
    assert_eq!(
        parse_one("add %r0, %r1, %r2;").encoding_class,
        EncodingClass::TripleReg
    );
    assert_eq!(
        parse_one("add %r0, %r1, #1;").encoding_class,
        EncodingClass::DoubleRegConst
    );
}

#[test]
fn any_constant_counts_not_just_a_trailing_one() {
    // the classifier checks for constant presence, not position
    let i = parse_one("add %r0, #1, %r1;");
    assert_eq!(i.encoding_class, EncodingClass::DoubleRegConst);
    assert!(i.operands[1].is_constant());
}

#[test]
fn operand_positions_count_recognized_operands() {
    let i = parse_one("add %r3, %f1, #0x20;");
    assert_eq!(i.operands.len(), 3);
    let positions: Vec<usize> = i.operands.iter().map(|o| o.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert_eq!(
        i.operands[0].kind,
        OperandKind::Register {
            reg_type: RegisterType::Gpr,
            number: 3
        }
    );
    assert_eq!(
        i.operands[1].kind,
        OperandKind::Register {
            reg_type: RegisterType::Fpr,
            number: 1
        }
    );
    assert_eq!(i.operands[2].kind, OperandKind::Constant { value: 0x20 });
}

#[test]
fn register_tags_map_to_register_types() {
    let i = parse_one("cmp %gpr4, %fpr9;");
    assert_eq!(
        i.operands[0].kind,
        OperandKind::Register {
            reg_type: RegisterType::Gpr,
            number: 4
        }
    );
    assert_eq!(
        i.operands[1].kind,
        OperandKind::Register {
            reg_type: RegisterType::Fpr,
            number: 9
        }
    );
}

#[test]
fn unknown_register_tag_falls_back_to_gpr() {
    let i = parse_one("push %x7;");
    assert_eq!(
        i.operands[0].kind,
        OperandKind::Register {
            reg_type: RegisterType::Gpr,
            number: 7
        }
    );
}

#[test]
fn negative_constants_wrap() {
    let i = parse_one("addsp #-2;");
    assert_eq!(
        i.operands[0].kind,
        OperandKind::Constant {
            value: 2u64.wrapping_neg()
        }
    );
}

#[test]
fn empty_number_token_is_skipped() {
    let i = parse_one("halt #;");
    assert_eq!(i.operands.len(), 0);
    assert_eq!(i.encoding_class, EncodingClass::NoOperand);
}

#[test]
fn unknown_mnemonic_fails_open() {
    let i = parse_one("frobnicate %r0, %r1;");
    assert_eq!(i.mnemonic.id, "frobnicate");
    assert_eq!(i.mnemonic.size, OperandSize::Word);
    assert_eq!(i.mnemonic.cond, Condition::Always);
    assert_eq!(i.encoding_class, EncodingClass::DoubleReg);
}

#[test]
fn tokens_outside_a_statement_are_skipped() {
    assert!(parse("%r0, %r1;").is_empty());
    assert!(parse("#5;").is_empty());
    assert!(parse(";;;").is_empty());
}

#[test]
fn missing_final_semicolon_still_builds_the_instruction() {
    let i = parse_one("add %r1, #5");
    assert_eq!(i.operands.len(), 2);
    assert_eq!(i.encoding_class, EncodingClass::RegConst);
}

#[test]
fn instruction_ir_round_trips_through_json() {
    let i = parse_one("addqs %r0, %r1, #0xff;");
    let json = serde_json::to_string(&i).unwrap();
    let back: Instruction = serde_json::from_str(&json).unwrap();
    assert_eq!(i, back);
}
