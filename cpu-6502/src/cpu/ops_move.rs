//! Load, store, register-transfer, and stack-transfer instructions.

use super::{Cpu, StatusFlag};
use crate::memory::Memory;
use crate::opcodes::Mode;

pub(crate) fn lda(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    let (_, value) = cpu.get_operand(mem, mode, 1);
    cpu.a = value;
    cpu.update_zero_and_negative_flags(cpu.a);
}

pub(crate) fn ldx(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    let (_, value) = cpu.get_operand(mem, mode, 1);
    cpu.x = value;
    cpu.update_zero_and_negative_flags(cpu.x);
}

pub(crate) fn ldy(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    let (_, value) = cpu.get_operand(mem, mode, 1);
    cpu.y = value;
    cpu.update_zero_and_negative_flags(cpu.y);
}

pub(crate) fn sta(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    let address = cpu.get_operand_address(mem, mode, 0);
    mem.write(address, cpu.a);
}

pub(crate) fn stx(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    let address = cpu.get_operand_address(mem, mode, 0);
    mem.write(address, cpu.x);
}

pub(crate) fn sty(cpu: &mut Cpu, mem: &mut Memory, mode: Mode) {
    let address = cpu.get_operand_address(mem, mode, 0);
    mem.write(address, cpu.y);
}

pub(crate) fn tax(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.x = cpu.a;
    cpu.update_zero_and_negative_flags(cpu.x);
}

pub(crate) fn txa(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.a = cpu.x;
    cpu.update_zero_and_negative_flags(cpu.a);
}

pub(crate) fn tay(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.y = cpu.a;
    cpu.update_zero_and_negative_flags(cpu.y);
}

pub(crate) fn tya(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.a = cpu.y;
    cpu.update_zero_and_negative_flags(cpu.a);
}

pub(crate) fn tsx(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.x = cpu.sp;
    cpu.update_zero_and_negative_flags(cpu.x);
}

// TXS does not touch the flags: SP is not a value register.
pub(crate) fn txs(cpu: &mut Cpu, _mem: &mut Memory, _mode: Mode) {
    cpu.sp = cpu.x;
}

pub(crate) fn pha(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    cpu.push_u8(mem, cpu.a);
}

pub(crate) fn pla(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    cpu.a = cpu.pull_u8(mem);
    cpu.update_zero_and_negative_flags(cpu.a);
}

// PHP always pushes with both B and U set, regardless of their live state.
pub(crate) fn php(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let pushed = cpu.p | StatusFlag::Break as u8 | StatusFlag::Unused as u8;
    cpu.push_u8(mem, pushed);
}

// PLP restores every flag except B and U, which stay as they were.
pub(crate) fn plp(cpu: &mut Cpu, mem: &mut Memory, _mode: Mode) {
    let pulled = cpu.pull_u8(mem);
    let preserved = cpu.p & (StatusFlag::Break as u8 | StatusFlag::Unused as u8);
    cpu.p = (pulled & !(StatusFlag::Break as u8 | StatusFlag::Unused as u8)) | preserved;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lda_sets_zero_and_negative_flags() {
        let mut mem = Memory::new();
        mem.write(0x10, 0x00);
        let mut cpu = Cpu::new();
        cpu.pc = 0x10;
        cpu.a = 5;
        lda(&mut cpu, &mut mem, Mode::Immediate);
        assert_eq!(cpu.a, 0);
        assert!(cpu.is_flag_set(StatusFlag::Zero));
        assert!(!cpu.is_flag_set(StatusFlag::Negative));
    }

    #[test]
    fn php_forces_break_and_unused_bits() {
        let mut mem = Memory::new();
        let mut cpu = Cpu::new();
        cpu.sp = 0xFF;
        cpu.p = 0;
        php(&mut cpu, &mut mem, Mode::Implied);
        let pushed = mem.read(0x01FF);
        assert_eq!(pushed, StatusFlag::Break as u8 | StatusFlag::Unused as u8);
    }

    #[test]
    fn plp_ignores_break_and_unused_from_stack() {
        let mut mem = Memory::new();
        let mut cpu = Cpu::new();
        cpu.sp = 0xFE;
        mem.write(0x01FF, 0xFF);
        cpu.p = RESET_STATUS_FOR_TEST;
        plp(&mut cpu, &mut mem, Mode::Implied);
        assert_eq!(cpu.p & (StatusFlag::Break as u8 | StatusFlag::Unused as u8), RESET_STATUS_FOR_TEST);
    }

    const RESET_STATUS_FOR_TEST: u8 = 0b0010_0000;
}
