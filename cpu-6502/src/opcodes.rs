use crate::cpu::Cpu;
use crate::memory::Memory;

/// The 13 addressing modes of the 6502. Each fixes the instruction's total
/// length: 1 byte (Implied/Accumulator), 2 bytes (Immediate/zero-page
/// variants/indirect-indexed/Relative), 3 bytes (Absolute variants/Indirect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl Mode {
    /// Instruction length in bytes, including the opcode byte.
    pub fn instruction_len(self) -> u16 {
        match self {
            Mode::Implied | Mode::Accumulator => 1,
            Mode::Immediate
            | Mode::ZeroPage
            | Mode::ZeroPageX
            | Mode::ZeroPageY
            | Mode::IndirectX
            | Mode::IndirectY
            | Mode::Relative => 2,
            Mode::Absolute | Mode::AbsoluteX | Mode::AbsoluteY | Mode::Indirect => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // Load/Store
    LDA, STA, LDX, STX, LDY, STY,
    // Transfer
    TAX, TXA, TAY, TYA, TSX, TXS,
    // Stack
    PHA, PLA, PHP, PLP,
    // Logical
    AND, ORA, EOR, BIT,
    // Arithmetic
    ADC, SBC,
    // Compare
    CMP, CPX, CPY,
    // Increment/Decrement
    INC, INX, INY, DEC, DEX, DEY,
    // Shift/Rotate
    ASL, LSR, ROL, ROR,
    // Jump/Branch
    JMP, JSR, RTS, BCC, BCS, BEQ, BMI, BNE, BPL, BVC, BVS,
    // Status flags
    CLC, SEC, CLI, SEI, CLD, SED, CLV,
    // NOP/Interrupt
    NOP, BRK, RTI,
}

pub fn match_instruction(mnemonic: &str) -> Option<Instruction> {
    use Instruction::*;
    Some(match mnemonic.to_ascii_lowercase().as_str() {
        "lda" => LDA, "sta" => STA, "ldx" => LDX, "stx" => STX, "ldy" => LDY, "sty" => STY,
        "tax" => TAX, "txa" => TXA, "tay" => TAY, "tya" => TYA, "tsx" => TSX, "txs" => TXS,
        "pha" => PHA, "pla" => PLA, "php" => PHP, "plp" => PLP,
        "and" => AND, "ora" => ORA, "eor" => EOR, "bit" => BIT,
        "adc" => ADC, "sbc" => SBC,
        "cmp" => CMP, "cpx" => CPX, "cpy" => CPY,
        "inc" => INC, "inx" => INX, "iny" => INY, "dec" => DEC, "dex" => DEX, "dey" => DEY,
        "asl" => ASL, "lsr" => LSR, "rol" => ROL, "ror" => ROR,
        "jmp" => JMP, "jsr" => JSR, "rts" => RTS,
        "bcc" => BCC, "bcs" => BCS, "beq" => BEQ, "bmi" => BMI, "bne" => BNE, "bpl" => BPL,
        "bvc" => BVC, "bvs" => BVS,
        "clc" => CLC, "sec" => SEC, "cli" => CLI, "sei" => SEI, "cld" => CLD, "sed" => SED,
        "clv" => CLV,
        "nop" => NOP, "brk" => BRK, "rti" => RTI,
        _ => return None,
    })
}

pub fn is_branch(instruction: Instruction) -> bool {
    use Instruction::*;
    matches!(instruction, BCC | BCS | BEQ | BMI | BNE | BPL | BVC | BVS)
}

/// One entry per opcode byte: mnemonic, addressing mode, base cycle cost,
/// and the handler to dispatch to. Page-crossing and branch-taken penalties
/// are not listed here; each handler charges them itself (via
/// `Cpu::get_operand`/`get_operand_address`'s `page_cross_cycle` argument, or
/// directly for branches) since whether a crossing is chargeable depends on
/// the operation, not just the addressing mode. `known = false` marks a byte
/// with no documented 6502 instruction.
#[derive(Clone, Copy)]
pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub mode: Mode,
    pub cycles: u8,
    pub handler: fn(&mut Cpu, &mut Memory, Mode),
    pub known: bool,
}

const fn unknown_entry() -> OpcodeEntry {
    OpcodeEntry {
        mnemonic: "???",
        mode: Mode::Implied,
        cycles: 0,
        handler: crate::cpu::unknown,
        known: false,
    }
}

macro_rules! op {
    ($mnemonic:expr, $mode:expr, $cycles:expr, $handler:expr) => {
        OpcodeEntry {
            mnemonic: $mnemonic,
            mode: $mode,
            cycles: $cycles,
            handler: $handler,
            known: true,
        }
    };
}

/// Reproduces the 6502's documented opcode map. Undocumented opcodes are out
/// of scope (see `Instruction`): their slots are `unknown_entry()` and are
/// fatal if ever dispatched.
pub static OPCODES: [OpcodeEntry; 256] = {
    use crate::cpu::*;
    use Mode::*;

    let mut table = [unknown_entry(); 256];

    table[0x00] = op!("brk", Implied, 7, brk);
    table[0x01] = op!("ora", IndirectX, 6, ora);
    table[0x05] = op!("ora", ZeroPage, 3, ora);
    table[0x06] = op!("asl", ZeroPage, 5, asl);
    table[0x08] = op!("php", Implied, 3, php);
    table[0x09] = op!("ora", Immediate, 2, ora);
    table[0x0a] = op!("asl", Accumulator, 2, asl);
    table[0x0d] = op!("ora", Absolute, 4, ora);
    table[0x0e] = op!("asl", Absolute, 6, asl);
    table[0x10] = op!("bpl", Relative, 2, bpl);
    table[0x11] = op!("ora", IndirectY, 5, ora);
    table[0x15] = op!("ora", ZeroPageX, 4, ora);
    table[0x16] = op!("asl", ZeroPageX, 6, asl);
    table[0x18] = op!("clc", Implied, 2, clc);
    table[0x19] = op!("ora", AbsoluteY, 4, ora);
    table[0x1d] = op!("ora", AbsoluteX, 4, ora);
    table[0x1e] = op!("asl", AbsoluteX, 7, asl);
    table[0x20] = op!("jsr", Absolute, 6, jsr);
    table[0x21] = op!("and", IndirectX, 6, and);
    table[0x24] = op!("bit", ZeroPage, 3, bit);
    table[0x25] = op!("and", ZeroPage, 3, and);
    table[0x26] = op!("rol", ZeroPage, 5, rol);
    table[0x28] = op!("plp", Implied, 4, plp);
    table[0x29] = op!("and", Immediate, 2, and);
    table[0x2a] = op!("rol", Accumulator, 2, rol);
    table[0x2c] = op!("bit", Absolute, 4, bit);
    table[0x2d] = op!("and", Absolute, 4, and);
    table[0x2e] = op!("rol", Absolute, 6, rol);
    table[0x30] = op!("bmi", Relative, 2, bmi);
    table[0x31] = op!("and", IndirectY, 5, and);
    table[0x35] = op!("and", ZeroPageX, 4, and);
    table[0x36] = op!("rol", ZeroPageX, 6, rol);
    table[0x38] = op!("sec", Implied, 2, sec);
    table[0x39] = op!("and", AbsoluteY, 4, and);
    table[0x3d] = op!("and", AbsoluteX, 4, and);
    table[0x3e] = op!("rol", AbsoluteX, 7, rol);
    table[0x40] = op!("rti", Implied, 6, rti);
    table[0x41] = op!("eor", IndirectX, 6, eor);
    table[0x45] = op!("eor", ZeroPage, 3, eor);
    table[0x46] = op!("lsr", ZeroPage, 5, lsr);
    table[0x48] = op!("pha", Implied, 3, pha);
    table[0x49] = op!("eor", Immediate, 2, eor);
    table[0x4a] = op!("lsr", Accumulator, 2, lsr);
    table[0x4c] = op!("jmp", Absolute, 3, jmp);
    table[0x4d] = op!("eor", Absolute, 4, eor);
    table[0x4e] = op!("lsr", Absolute, 6, lsr);
    table[0x50] = op!("bvc", Relative, 2, bvc);
    table[0x51] = op!("eor", IndirectY, 5, eor);
    table[0x55] = op!("eor", ZeroPageX, 4, eor);
    table[0x56] = op!("lsr", ZeroPageX, 6, lsr);
    table[0x58] = op!("cli", Implied, 2, cli);
    table[0x59] = op!("eor", AbsoluteY, 4, eor);
    table[0x5d] = op!("eor", AbsoluteX, 4, eor);
    table[0x5e] = op!("lsr", AbsoluteX, 7, lsr);
    table[0x60] = op!("rts", Implied, 6, rts);
    table[0x61] = op!("adc", IndirectX, 6, adc);
    table[0x65] = op!("adc", ZeroPage, 3, adc);
    table[0x66] = op!("ror", ZeroPage, 5, ror);
    table[0x68] = op!("pla", Implied, 4, pla);
    table[0x69] = op!("adc", Immediate, 2, adc);
    table[0x6a] = op!("ror", Accumulator, 2, ror);
    table[0x6c] = op!("jmp", Indirect, 5, jmp);
    table[0x6d] = op!("adc", Absolute, 4, adc);
    table[0x6e] = op!("ror", Absolute, 6, ror);
    table[0x70] = op!("bvs", Relative, 2, bvs);
    table[0x71] = op!("adc", IndirectY, 5, adc);
    table[0x75] = op!("adc", ZeroPageX, 4, adc);
    table[0x76] = op!("ror", ZeroPageX, 6, ror);
    table[0x78] = op!("sei", Implied, 2, sei);
    table[0x79] = op!("adc", AbsoluteY, 4, adc);
    table[0x7d] = op!("adc", AbsoluteX, 4, adc);
    table[0x7e] = op!("ror", AbsoluteX, 7, ror);
    table[0x81] = op!("sta", IndirectX, 6, sta);
    table[0x84] = op!("sty", ZeroPage, 3, sty);
    table[0x85] = op!("sta", ZeroPage, 3, sta);
    table[0x86] = op!("stx", ZeroPage, 3, stx);
    table[0x88] = op!("dey", Implied, 2, dey);
    table[0x8a] = op!("txa", Implied, 2, txa);
    table[0x8c] = op!("sty", Absolute, 4, sty);
    table[0x8d] = op!("sta", Absolute, 4, sta);
    table[0x8e] = op!("stx", Absolute, 4, stx);
    table[0x90] = op!("bcc", Relative, 2, bcc);
    table[0x91] = op!("sta", IndirectY, 6, sta);
    table[0x94] = op!("sty", ZeroPageX, 4, sty);
    table[0x95] = op!("sta", ZeroPageX, 4, sta);
    table[0x96] = op!("stx", ZeroPageY, 4, stx);
    table[0x98] = op!("tya", Implied, 2, tya);
    table[0x99] = op!("sta", AbsoluteY, 5, sta);
    table[0x9a] = op!("txs", Implied, 2, txs);
    table[0x9d] = op!("sta", AbsoluteX, 5, sta);
    table[0xa0] = op!("ldy", Immediate, 2, ldy);
    table[0xa1] = op!("lda", IndirectX, 6, lda);
    table[0xa2] = op!("ldx", Immediate, 2, ldx);
    table[0xa4] = op!("ldy", ZeroPage, 3, ldy);
    table[0xa5] = op!("lda", ZeroPage, 3, lda);
    table[0xa6] = op!("ldx", ZeroPage, 3, ldx);
    table[0xa8] = op!("tay", Implied, 2, tay);
    table[0xa9] = op!("lda", Immediate, 2, lda);
    table[0xaa] = op!("tax", Implied, 2, tax);
    table[0xac] = op!("ldy", Absolute, 4, ldy);
    table[0xad] = op!("lda", Absolute, 4, lda);
    table[0xae] = op!("ldx", Absolute, 4, ldx);
    table[0xb0] = op!("bcs", Relative, 2, bcs);
    table[0xb1] = op!("lda", IndirectY, 5, lda);
    table[0xb4] = op!("ldy", ZeroPageX, 4, ldy);
    table[0xb5] = op!("lda", ZeroPageX, 4, lda);
    table[0xb6] = op!("ldx", ZeroPageY, 4, ldx);
    table[0xb8] = op!("clv", Implied, 2, clv);
    table[0xb9] = op!("lda", AbsoluteY, 4, lda);
    table[0xba] = op!("tsx", Implied, 2, tsx);
    table[0xbc] = op!("ldy", AbsoluteX, 4, ldy);
    table[0xbd] = op!("lda", AbsoluteX, 4, lda);
    table[0xbe] = op!("ldx", AbsoluteY, 4, ldx);
    table[0xc0] = op!("cpy", Immediate, 2, cpy);
    table[0xc1] = op!("cmp", IndirectX, 6, cmp);
    table[0xc4] = op!("cpy", ZeroPage, 3, cpy);
    table[0xc5] = op!("cmp", ZeroPage, 3, cmp);
    table[0xc6] = op!("dec", ZeroPage, 5, dec);
    table[0xc8] = op!("iny", Implied, 2, iny);
    table[0xc9] = op!("cmp", Immediate, 2, cmp);
    table[0xca] = op!("dex", Implied, 2, dex);
    table[0xcc] = op!("cpy", Absolute, 4, cpy);
    table[0xcd] = op!("cmp", Absolute, 4, cmp);
    table[0xce] = op!("dec", Absolute, 6, dec);
    table[0xd0] = op!("bne", Relative, 2, bne);
    table[0xd1] = op!("cmp", IndirectY, 5, cmp);
    table[0xd5] = op!("cmp", ZeroPageX, 4, cmp);
    table[0xd6] = op!("dec", ZeroPageX, 6, dec);
    table[0xd8] = op!("cld", Implied, 2, cld);
    table[0xd9] = op!("cmp", AbsoluteY, 4, cmp);
    table[0xdd] = op!("cmp", AbsoluteX, 4, cmp);
    table[0xde] = op!("dec", AbsoluteX, 7, dec);
    table[0xe0] = op!("cpx", Immediate, 2, cpx);
    table[0xe1] = op!("sbc", IndirectX, 6, sbc);
    table[0xe4] = op!("cpx", ZeroPage, 3, cpx);
    table[0xe5] = op!("sbc", ZeroPage, 3, sbc);
    table[0xe6] = op!("inc", ZeroPage, 5, inc);
    table[0xe8] = op!("inx", Implied, 2, inx);
    table[0xe9] = op!("sbc", Immediate, 2, sbc);
    table[0xea] = op!("nop", Implied, 2, nop);
    table[0xec] = op!("cpx", Absolute, 4, cpx);
    table[0xed] = op!("sbc", Absolute, 4, sbc);
    table[0xee] = op!("inc", Absolute, 6, inc);
    table[0xf0] = op!("beq", Relative, 2, beq);
    table[0xf1] = op!("sbc", IndirectY, 5, sbc);
    table[0xf5] = op!("sbc", ZeroPageX, 4, sbc);
    table[0xf6] = op!("inc", ZeroPageX, 6, inc);
    table[0xf8] = op!("sed", Implied, 2, sed);
    table[0xf9] = op!("sbc", AbsoluteY, 4, sbc);
    table[0xfd] = op!("sbc", AbsoluteX, 4, sbc);
    table[0xfe] = op!("inc", AbsoluteX, 7, inc);

    table
};

/// Bidirectional lookup for the encoder: `(mnemonic, mode) -> opcode byte`.
pub fn instruction_mode_to_opcode(instruction: Instruction, mode: Mode) -> Result<u8, String> {
    for (byte, entry) in OPCODES.iter().enumerate() {
        if !entry.known {
            continue;
        }
        if match_instruction(entry.mnemonic) == Some(instruction) && entry.mode == mode {
            return Ok(byte as u8);
        }
    }
    Err(format!(
        "no opcode for {:?} in addressing mode {:?}",
        instruction, mode
    ))
}
