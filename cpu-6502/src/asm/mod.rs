//! Two-pass assembler pipeline: lex -> parse -> resolve -> encode. Each
//! stage's error type stays distinct (`ParseError`/`ResolveError`/
//! `EncodeError`), but `assemble` collapses whichever one fires first into a
//! single `Vec<String>` of `line N: message` diagnostics, matching the CLI's
//! error-reporting contract in spec.md §6.1/§7.

pub mod encoder;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod resolver;

use std::collections::BTreeMap;

use encoder::EncodedProgram;
use ir::IrNode;
use lexer::Lexer;
use parser::Parser;

pub struct AssembledProgram {
    pub nodes: Vec<IrNode>,
    pub symbols: BTreeMap<String, u16>,
    pub memory_map: BTreeMap<u16, u8>,
    pub image: Vec<u8>,
    pub start_address: u16,
}

impl AssembledProgram {
    pub fn end_address(&self) -> u16 {
        self.start_address
            .wrapping_add(self.image.len().saturating_sub(1) as u16)
    }
}

/// Runs the full pipeline over `source`. Each stage runs only if the
/// previous one produced no errors, mirroring §5's "an error in any pass
/// aborts subsequent passes for that file" rule. Every error line is
/// formatted `line N: message` per §6.1.
pub fn assemble(source: &str) -> Result<AssembledProgram, Vec<String>> {
    let tokens = Lexer::new(source).tokenize();
    let (nodes, parse_errors) = Parser::new(tokens).parse();
    if !parse_errors.is_empty() {
        return Err(parse_errors.iter().map(|e| e.to_string()).collect());
    }

    let resolved = resolver::resolve(nodes).map_err(|errors| {
        errors.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    })?;

    let EncodedProgram {
        memory_map,
        image,
        start_address,
    } = encoder::encode(&resolved.nodes).map_err(|errors| {
        errors.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    })?;

    Ok(AssembledProgram {
        nodes: resolved.nodes,
        symbols: resolved.symbols,
        memory_map,
        image,
        start_address,
    })
}

/// Renders the parsed/resolved IR, one line per node, for `asm-cli --ir`.
pub fn format_ir(nodes: &[IrNode]) -> String {
    let mut out = String::from("IR Nodes:\n---------\n");
    for node in nodes {
        out.push_str(&format!("line {}: {}\n", node.line(), describe_node(node)));
    }
    out
}

fn describe_node(node: &IrNode) -> String {
    match node {
        IrNode::Label(label) => format!("LABEL {} @ ${:04X}", label.name, label.address),
        IrNode::Directive(directive) => format!(".{} {:?}", directive.name, directive.value),
        IrNode::Instruction(instruction) => format!(
            "{} {:?} {:?}",
            instruction.mnemonic.to_ascii_uppercase(),
            instruction.mode,
            instruction.operand
        ),
    }
}

/// Renders the resolved symbol table for `asm-cli --symbols`.
pub fn format_symbol_table(symbols: &BTreeMap<String, u16>) -> String {
    let mut out = String::from("Symbol Table:\n-------------\n");
    for (name, address) in symbols {
        out.push_str(&format!("{} = ${:04X}\n", name, address));
    }
    out
}

/// Renders every non-empty memory cell for `asm-cli --memory`.
pub fn format_memory_map(memory_map: &BTreeMap<u16, u8>) -> String {
    let mut out = String::from("Memory Map:\n-----------\n");
    for (address, value) in memory_map {
        out.push_str(&format!("${:04X}: ${:02X}\n", address, value));
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn assembles_a_minimal_program_to_its_reference_bytes() {
        let assembled = assemble("LDA #$00\n").unwrap();
        assert_eq!(assembled.image, vec![0xA9, 0x00]);
    }

    #[test]
    fn jsr_rts_round_trip_resolves_the_forward_label() {
        let source = "\
            .org $FFFC\n\
            JSR sub\n\
            .org $4342\n\
            sub: LDA #$84\n\
            RTS\n\
        ";
        let assembled = assemble(source).unwrap();
        assert_eq!(*assembled.symbols.get("sub").unwrap(), 0x4342);
        assert_eq!(assembled.memory_map.get(&0xFFFC), Some(&0x20));
        assert_eq!(assembled.memory_map.get(&0xFFFD), Some(&0x42));
        assert_eq!(assembled.memory_map.get(&0xFFFE), Some(&0x43));
        assert_eq!(assembled.memory_map.get(&0x4342), Some(&0xA9));
    }

    #[test]
    fn undefined_label_surfaces_as_a_line_tagged_error() {
        let errors = assemble("JMP nowhere\n").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("line 1:"));
    }

    #[test]
    fn parse_errors_prevent_the_resolver_from_running() {
        let errors = assemble("JSR #$10\n").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("addressing mode"));
    }
}
