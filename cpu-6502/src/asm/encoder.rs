//! Walks resolved IR and emits bytes into a sparse address -> byte map, then
//! flattens that into a contiguous image with any gaps zero-filled.

use std::collections::BTreeMap;

use super::ir::{DirectiveValue, IrNode, Operand};
use crate::opcodes::{instruction_mode_to_opcode, match_instruction, Mode};

#[derive(Debug, Clone)]
pub struct EncodeError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

pub struct EncodedProgram {
    /// Sparse address -> byte map, exactly as written during the walk.
    pub memory_map: BTreeMap<u16, u8>,
    /// The contiguous image: `memory_map`'s min..=max address range, with
    /// unwritten addresses filled with `0x00`.
    pub image: Vec<u8>,
    pub start_address: u16,
}

pub fn encode(nodes: &[IrNode]) -> Result<EncodedProgram, Vec<EncodeError>> {
    let mut memory_map = BTreeMap::new();
    let mut cursor: u16 = 0;
    let mut errors = Vec::new();

    for node in nodes {
        match node {
            IrNode::Label(_) => {}
            IrNode::Directive(directive) => match directive.name.as_str() {
                "org" => {
                    if let DirectiveValue::Number(address) = directive.value {
                        cursor = address;
                    }
                }
                "byte" => {
                    if let DirectiveValue::Number(value) = directive.value {
                        memory_map.insert(cursor, value as u8);
                        cursor = cursor.wrapping_add(1);
                    }
                }
                "word" => {
                    if let DirectiveValue::Number(value) = directive.value {
                        let [low, high] = value.to_le_bytes();
                        memory_map.insert(cursor, low);
                        memory_map.insert(cursor.wrapping_add(1), high);
                        cursor = cursor.wrapping_add(2);
                    }
                }
                other => errors.push(EncodeError { line: directive.line, message: format!("unknown directive '{}'", other) }),
            },
            IrNode::Instruction(instruction) => {
                let instruction_address = cursor;
                let parsed = match_instruction(&instruction.mnemonic);
                let opcode = match parsed.and_then(|i| instruction_mode_to_opcode(i, instruction.mode).ok()) {
                    Some(opcode) => opcode,
                    None => {
                        errors.push(EncodeError {
                            line: instruction.line,
                            message: format!("no opcode for '{}' in the resolved addressing mode", instruction.mnemonic),
                        });
                        cursor = cursor.wrapping_add(instruction.mode.instruction_len());
                        continue;
                    }
                };
                memory_map.insert(cursor, opcode);
                cursor = cursor.wrapping_add(1);

                match write_operand_bytes(instruction, instruction_address, &mut memory_map, &mut cursor) {
                    Ok(()) => {}
                    Err(message) => errors.push(EncodeError { line: instruction.line, message }),
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(flatten(memory_map))
}

fn write_operand_bytes(
    instruction: &super::ir::InstructionNode,
    instruction_address: u16,
    memory_map: &mut BTreeMap<u16, u8>,
    cursor: &mut u16,
) -> Result<(), String> {
    let value = match &instruction.operand {
        Operand::Immediate(v) => *v,
        Operand::Address { value, .. } => *value,
        Operand::None => return Ok(()),
        Operand::Label { name, .. } => {
            return Err(format!("label '{}' was not resolved before encoding", name));
        }
    };

    match instruction.mode {
        Mode::Implied | Mode::Accumulator => {}
        Mode::Immediate | Mode::ZeroPage | Mode::ZeroPageX | Mode::ZeroPageY | Mode::IndirectX | Mode::IndirectY => {
            memory_map.insert(*cursor, (value & 0xFF) as u8);
            *cursor = cursor.wrapping_add(1);
        }
        Mode::Absolute | Mode::AbsoluteX | Mode::AbsoluteY | Mode::Indirect => {
            let [low, high] = value.to_le_bytes();
            memory_map.insert(*cursor, low);
            memory_map.insert(cursor.wrapping_add(1), high);
            *cursor = cursor.wrapping_add(2);
        }
        Mode::Relative => {
            let next_instruction = instruction_address.wrapping_add(2);
            let offset = value as i32 - next_instruction as i32;
            if !(-128..=127).contains(&offset) {
                return Err(format!("branch target ${:04X} is out of range", value));
            }
            memory_map.insert(*cursor, offset as i8 as u8);
            *cursor = cursor.wrapping_add(1);
        }
    }

    Ok(())
}

fn flatten(memory_map: BTreeMap<u16, u8>) -> EncodedProgram {
    let (start_address, end_address) = match (memory_map.keys().next(), memory_map.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => (0, 0),
    };

    let mut image = Vec::new();
    if !memory_map.is_empty() {
        for address in start_address..=end_address {
            image.push(*memory_map.get(&address).unwrap_or(&0x00));
        }
    }

    EncodedProgram { memory_map, image, start_address }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::asm::ir::{DirectiveNode, InstructionNode, LabelNode};

    fn directive(name: &str, value: DirectiveValue, line: usize) -> IrNode {
        IrNode::Directive(DirectiveNode { name: name.to_string(), value, line })
    }

    #[test]
    fn org_sets_the_start_address() {
        let nodes = vec![
            directive("org", DirectiveValue::Number(0x8000), 1),
            directive("byte", DirectiveValue::Number(0xAB), 2),
        ];
        let encoded = encode(&nodes).unwrap();
        assert_eq!(encoded.start_address, 0x8000);
        assert_eq!(encoded.image, vec![0xAB]);
    }

    #[test]
    fn gaps_between_org_blocks_are_zero_filled() {
        let nodes = vec![
            directive("org", DirectiveValue::Number(0x10), 1),
            directive("byte", DirectiveValue::Number(0x01), 2),
            directive("org", DirectiveValue::Number(0x13), 3),
            directive("byte", DirectiveValue::Number(0x02), 4),
        ];
        let encoded = encode(&nodes).unwrap();
        assert_eq!(encoded.image, vec![0x01, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn lda_immediate_encodes_two_bytes() {
        let nodes = vec![IrNode::Instruction(InstructionNode {
            mnemonic: "lda".to_string(),
            mode: Mode::Immediate,
            operand: Operand::Immediate(0x42),
            line: 1,
        })];
        let encoded = encode(&nodes).unwrap();
        assert_eq!(encoded.image, vec![0xA9, 0x42]);
    }

    #[test]
    fn absolute_operand_is_little_endian() {
        let nodes = vec![IrNode::Instruction(InstructionNode {
            mnemonic: "jmp".to_string(),
            mode: Mode::Absolute,
            operand: Operand::Address { value: 0x1234, mode: Mode::Absolute },
            line: 1,
        })];
        let encoded = encode(&nodes).unwrap();
        assert_eq!(encoded.image, vec![0x4C, 0x34, 0x12]);
    }

    #[test]
    fn labels_emit_no_bytes() {
        let nodes = vec![IrNode::Label(LabelNode { name: "here".to_string(), address: 0, line: 1 })];
        let encoded = encode(&nodes).unwrap();
        assert!(encoded.image.is_empty());
    }
}
