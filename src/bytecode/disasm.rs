use std::collections::HashSet;
use std::fmt::Write;

use crate::bytecode::op::{self, Opcode, Token};

/// Print disassembly of a token stream
pub fn print_tokens(tokens: &[Token]) {
    println!("════════════════════════════════════════");
    println!(" main");
    println!(" {} tokens", tokens.len());
    println!("════════════════════════════════════════");
    print!("{}", disassemble(tokens));
}

/// Label ids referenced by any jump.
fn collect_jump_targets(tokens: &[Token]) -> HashSet<Token> {
    let mut targets = HashSet::new();
    let mut ip = 0;

    while ip < tokens.len() {
        match Opcode::decode(tokens[ip]) {
            Some(op) if op.takes_parameter() => {
                if let (true, Some(&label)) = (op.is_jump(), tokens.get(ip + 1)) {
                    targets.insert(label);
                }
                ip += 2;
            }
            _ => ip += 1,
        }
    }

    targets
}

/// One line per instruction: address, target marker, mnemonic and operand.
/// Labels that some jump refers to are marked with `►`.
pub fn disassemble(tokens: &[Token]) -> String {
    let targets = collect_jump_targets(tokens);
    let mut out = String::new();
    let mut ip = 0;

    while ip < tokens.len() {
        let token = tokens[ip];
        let decoded = Opcode::decode(token);

        let marker = match (decoded, tokens.get(ip + 1)) {
            (Some(Opcode::Lbl), Some(label)) if targets.contains(label) => "► ",
            _ => "  ",
        };

        let _ = write!(out, "{:04} {}", ip, marker);

        match decoded {
            Some(op) if op.takes_parameter() => {
                match tokens.get(ip + 1) {
                    Some(param) => {
                        let _ = writeln!(out, "{:<4}{}", op.mnemonic(), param);
                    }
                    None => {
                        let _ = writeln!(out, "{:<4}<missing>", op.mnemonic());
                    }
                }
                ip += 2;
            }
            Some(op) => {
                let _ = writeln!(out, "{}", op.mnemonic());
                ip += 1;
            }
            None => {
                let _ = writeln!(out, "??? ; invalid code {}", op::name(token));
                ip += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::asm::assemble;

    #[test]
    fn test_disassemble_marks_jump_targets() {
        let tokens = assemble("lbl 1\nlbl 2\nblo -3\npr1\njmp 2\n23\ntrm").unwrap();
        let expected = "\
0000   lbl 1
0002 ► lbl 2
0004   blo -3
0006   pr1
0007   jmp 2
0009   ??? ; invalid code 23
0010   trm
";
        assert_eq!(disassemble(&tokens), expected);
    }

    #[test]
    fn test_disassemble_missing_parameter() {
        assert_eq!(disassemble(&[0x05]), "0000   blo <missing>\n");
    }
}
