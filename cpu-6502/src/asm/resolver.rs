//! Pass 1 assigns every node an address and builds the symbol table; pass 2
//! resolves label operands against it and range-checks the result. Mirrors
//! the two-pass design of a classic assembler: nothing is encoded until both
//! passes succeed.

use std::collections::BTreeMap;

use super::ir::{DirectiveValue, InstructionNode, IrNode, Operand};
use crate::opcodes::Mode;

#[derive(Debug, Clone)]
pub struct ResolveError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

pub struct ResolvedProgram {
    pub nodes: Vec<IrNode>,
    pub symbols: BTreeMap<String, u16>,
}

/// Runs both passes. On success every `Operand::Label` in the returned nodes
/// has an address resolvable purely from the IR itself; callers (the
/// encoder) never need the symbol table again.
pub fn resolve(mut nodes: Vec<IrNode>) -> Result<ResolvedProgram, Vec<ResolveError>> {
    let mut errors = Vec::new();
    let symbols = assign_addresses(&mut nodes, &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }

    resolve_labels(&mut nodes, &symbols, &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ResolvedProgram { nodes, symbols })
}

/// Pass 1: walk the IR assigning a cursor address to every node. `.org` sets
/// the cursor; labels record it; instructions and `.byte`/`.word` advance it
/// by their encoded size. A label defined twice is an error.
fn assign_addresses(nodes: &mut [IrNode], errors: &mut Vec<ResolveError>) -> BTreeMap<String, u16> {
    let mut symbols = BTreeMap::new();
    let mut cursor: u16 = 0;

    for node in nodes.iter_mut() {
        match node {
            IrNode::Directive(directive) if directive.name == "org" => {
                if let DirectiveValue::Number(address) = directive.value {
                    cursor = address;
                }
            }
            IrNode::Label(label) => {
                if symbols.insert(label.name.clone(), cursor).is_some() {
                    errors.push(ResolveError {
                        line: label.line,
                        message: format!("label '{}' is defined more than once", label.name),
                    });
                }
                label.address = cursor;
            }
            _ => {}
        }
        cursor = cursor.wrapping_add(node.size());
    }

    symbols
}

/// Pass 2: turn every `Operand::Label` into an `Operand::Address`, validating
/// ranges along the way. Runs only after pass 1 succeeds, so every address
/// here is final.
fn resolve_labels(nodes: &mut [IrNode], symbols: &BTreeMap<String, u16>, errors: &mut Vec<ResolveError>) {
    let mut cursor: u16 = 0;

    for node in nodes.iter_mut() {
        let node_size = node.size();

        match node {
            IrNode::Directive(directive) => {
                if directive.name == "org" {
                    if let DirectiveValue::Number(address) = directive.value {
                        cursor = address;
                    }
                } else if directive.name == "word" {
                    if let DirectiveValue::Label(name) = &directive.value {
                        match symbols.get(name) {
                            Some(address) => directive.value = DirectiveValue::Number(*address),
                            None => errors.push(ResolveError {
                                line: directive.line,
                                message: format!("undefined label '{}'", name),
                            }),
                        }
                    }
                }
            }
            IrNode::Instruction(instruction) => {
                let instruction_address = cursor;
                if let Operand::Label { name, mode } = &instruction.operand {
                    match symbols.get(name) {
                        Some(address) => {
                            instruction.operand = Operand::Address { value: *address, mode: *mode };
                        }
                        None => {
                            errors.push(ResolveError {
                                line: instruction.line,
                                message: format!("undefined label '{}'", name),
                            });
                        }
                    }
                }
                if let Err(message) = validate_operand_range(instruction, instruction_address) {
                    errors.push(ResolveError { line: instruction.line, message });
                }
            }
            IrNode::Label(_) => {}
        }

        cursor = cursor.wrapping_add(node_size);
    }
}

fn validate_operand_range(instruction: &InstructionNode, instruction_address: u16) -> Result<(), String> {
    let value = match &instruction.operand {
        Operand::Immediate(v) => *v,
        Operand::Address { value, .. } => *value,
        Operand::Label { .. } | Operand::None => return Ok(()),
    };

    match instruction.mode {
        Mode::ZeroPage | Mode::ZeroPageX | Mode::ZeroPageY | Mode::IndirectX | Mode::IndirectY => {
            if value > 0xFF {
                return Err(format!("address ${:04X} out of range for zero-page addressing", value));
            }
        }
        Mode::Immediate => {
            if value > 0xFF {
                return Err(format!("immediate value ${:04X} out of range 0-255", value));
            }
        }
        Mode::Relative => {
            let next_instruction = instruction_address.wrapping_add(2);
            let offset = value as i32 - next_instruction as i32;
            if !(-128..=127).contains(&offset) {
                return Err(format!("branch target ${:04X} is out of range for a relative branch", value));
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::asm::ir::{DirectiveNode, InstructionNode, LabelNode};
    use crate::opcodes::Mode;

    fn instruction(mnemonic: &str, mode: Mode, operand: Operand, line: usize) -> IrNode {
        IrNode::Instruction(InstructionNode { mnemonic: mnemonic.to_string(), mode, operand, line })
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let nodes = vec![
            IrNode::Label(LabelNode { name: "a".to_string(), address: 0, line: 1 }),
            IrNode::Label(LabelNode { name: "a".to_string(), address: 0, line: 2 }),
        ];
        let errors = resolve(nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn undefined_label_is_rejected() {
        let nodes = vec![instruction("jmp", Mode::Absolute, Operand::Label { name: "nowhere".to_string(), mode: Mode::Absolute }, 1)];
        let errors = resolve(nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn forward_label_resolves_to_its_recorded_address() {
        let nodes = vec![
            instruction("jmp", Mode::Absolute, Operand::Label { name: "target".to_string(), mode: Mode::Absolute }, 1),
            IrNode::Label(LabelNode { name: "target".to_string(), address: 0, line: 2 }),
        ];
        let resolved = resolve(nodes).unwrap();
        match &resolved.nodes[0] {
            IrNode::Instruction(node) => assert_eq!(node.operand, Operand::Address { value: 3, mode: Mode::Absolute }),
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn out_of_range_zero_page_immediate_is_rejected() {
        let nodes = vec![instruction("lda", Mode::ZeroPage, Operand::Address { value: 0x100, mode: Mode::ZeroPage }, 1)];
        let errors = resolve(nodes).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn word_directive_referencing_a_label_is_resolved() {
        let nodes = vec![
            IrNode::Directive(DirectiveNode { name: "word".to_string(), value: DirectiveValue::Label("here".to_string()), line: 1 }),
            IrNode::Label(LabelNode { name: "here".to_string(), address: 0, line: 2 }),
        ];
        let resolved = resolve(nodes).unwrap();
        match &resolved.nodes[0] {
            IrNode::Directive(node) => assert!(matches!(node.value, DirectiveValue::Number(2))),
            _ => panic!("expected directive"),
        }
    }
}
