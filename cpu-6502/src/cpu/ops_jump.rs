//! Control-flow, status-flag, and interrupt instructions.
//!
//! `rts` is this interpreter's top-level halt: there is no caller below the
//! first `jsr`, so returning from it ends `Cpu::execute` with `completed =
//! true` rather than pulling a return address into the void.

use super::{Cpu, StatusFlag};
use crate::constants::InterruptVectors;
use crate::memory::Memory;
use crate::opcodes::Mode;

pub(crate) fn jmp(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    cpu.pc = cpu.get_operand_address(mem, mode, 0);
}

// JSR pushes the address of the last byte of the JSR instruction (PC - 1 at
// the point this handler runs, since PC has already been advanced past the
// two operand bytes), high byte first.
pub(crate) fn jsr(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    let target = cpu.get_operand_address(mem, mode, 0);
    let return_address = cpu.pc.wrapping_sub(1);
    cpu.push_u16(mem, return_address);
    cpu.pc = target;
}

pub(crate) fn rts(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let return_address = cpu.pull_u16(mem);
    cpu.pc = return_address.wrapping_add(1);
    cpu.halted = true;
}

// BRK is a two-byte instruction even though its operand is unused: the byte
// after the opcode is skipped, so RTI returns past it. Pushes PC+2, then P
// with B and U both set, then disables further IRQs and loads PC from the
// IRQ/BRK vector.
pub(crate) fn brk(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let return_address = cpu.pc.wrapping_add(1);
    cpu.push_u16(mem, return_address);
    let pushed = cpu.p | StatusFlag::Break as u8 | StatusFlag::Unused as u8;
    cpu.push_u8(mem, pushed);
    cpu.set_flag(StatusFlag::InterruptDisable, true);
    cpu.pc = mem.read_word(InterruptVectors::IrqBrkVector as u16);
}

pub(crate) fn rti(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let pulled = cpu.pull_u8(mem);
    let preserved = cpu.p & (StatusFlag::Break as u8 | StatusFlag::Unused as u8);
    cpu.p = (pulled & !(StatusFlag::Break as u8 | StatusFlag::Unused as u8)) | preserved;
    cpu.pc = cpu.pull_u16(mem);
}

fn branch(cpu: &mut Cpu, mem: &mut Memory, taken: bool) {
    // The page-cross penalty compares the target against the branch
    // opcode's own page, not the page of the (already-advanced) PC that
    // follows the 2-byte instruction -- the latter hides crossings whose
    // target happens to land back in the page right after the instruction.
    let instruction_page = cpu.pc.wrapping_sub(1).to_le_bytes()[1];
    let target = cpu.get_operand_address(mem, Mode::Relative, 1);
    if taken {
        cpu.pending_extra_cycles += 1;
        let page_changed = instruction_page != target.to_le_bytes()[1];
        cpu.pc = target;
        if page_changed {
            cpu.pending_extra_cycles += 1;
        }
    }
}

pub(crate) fn bcc(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = !cpu.is_flag_set(StatusFlag::Carry);
    branch(cpu, mem, taken);
}

pub(crate) fn bcs(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = cpu.is_flag_set(StatusFlag::Carry);
    branch(cpu, mem, taken);
}

pub(crate) fn beq(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = cpu.is_flag_set(StatusFlag::Zero);
    branch(cpu, mem, taken);
}

pub(crate) fn bne(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = !cpu.is_flag_set(StatusFlag::Zero);
    branch(cpu, mem, taken);
}

pub(crate) fn bmi(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = cpu.is_flag_set(StatusFlag::Negative);
    branch(cpu, mem, taken);
}

pub(crate) fn bpl(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = !cpu.is_flag_set(StatusFlag::Negative);
    branch(cpu, mem, taken);
}

pub(crate) fn bvc(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = !cpu.is_flag_set(StatusFlag::Overflow);
    branch(cpu, mem, taken);
}

pub(crate) fn bvs(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let taken = cpu.is_flag_set(StatusFlag::Overflow);
    branch(cpu, mem, taken);
}

pub(crate) fn clc(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Carry, false);
}

pub(crate) fn sec(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Carry, true);
}

pub(crate) fn cli(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::InterruptDisable, false);
}

pub(crate) fn sei(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::InterruptDisable, true);
}

pub(crate) fn cld(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Decimal, false);
}

pub(crate) fn sed(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Decimal, true);
}

pub(crate) fn clv(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Overflow, false);
}

pub(crate) fn nop(_cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rts_halts_and_returns_past_the_call_site() {
        let mut mem = Memory::new();
        let mut cpu = Cpu::new();
        cpu.sp = 0xFD;
        mem.write(0x01FE, 0x00);
        mem.write(0x01FF, 0x80);
        rts(&mut cpu, &mut mem, Mode::Implied);
        assert_eq!(cpu.pc, 0x8001);
        assert!(cpu.halted);
    }

    #[test]
    fn jsr_pushes_the_return_address_minus_one() {
        let mut mem = Memory::new();
        mem.write(0x0200, 0x34);
        mem.write(0x0201, 0x12);
        let mut cpu = Cpu::new();
        cpu.pc = 0x0200;
        cpu.sp = 0xFF;
        jsr(&mut cpu, &mut mem, Mode::Absolute);
        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(mem.read(0x01FF), 0x02);
        assert_eq!(mem.read(0x01FE), 0x01);
    }

    #[test]
    fn branch_not_taken_adds_no_extra_cycles() {
        let mut mem = Memory::new();
        mem.write(0x10, 0x05);
        let mut cpu = Cpu::new();
        cpu.pc = 0x10;
        cpu.set_flag(StatusFlag::Carry, true);
        bcc(&mut cpu, &mut mem, Mode::Relative);
        assert_eq!(cpu.pending_extra_cycles, 0);
    }

    #[test]
    fn branch_taken_across_a_page_adds_two_cycles() {
        let mut mem = Memory::new();
        mem.write(0x00FE, 0x7F);
        let mut cpu = Cpu::new();
        cpu.pc = 0x00FE;
        cpu.set_flag(StatusFlag::Carry, false);
        bcc(&mut cpu, &mut mem, Mode::Relative);
        assert_eq!(cpu.pending_extra_cycles, 2);
        assert_eq!(cpu.pc, 0x017E);
    }
}
