//! Text assembler and bit-stream encoder: the inverse of the lexer.
//!
//! Assembly is one instruction per line, `mnemonic [operand]`. A bare number
//! in place of a mnemonic emits that raw 5-bit code. `;` starts a comment.

use thiserror::Error;

use crate::bytecode::op::{Opcode, Token};
use crate::frontend::lexer::{ONE, OPCODE_BITS, PARAMETER_BITS, SIGN_SEED, START_MARKER, ZERO};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    #[error("line {line}: unknown mnemonic '{name}'")]
    UnknownMnemonic { line: usize, name: String },

    #[error("line {line}: {op} expects a parameter")]
    MissingOperand { line: usize, op: &'static str },

    #[error("line {line}: unexpected operand '{text}'")]
    UnexpectedOperand { line: usize, text: String },

    #[error("line {line}: invalid operand '{text}'")]
    InvalidOperand { line: usize, text: String },

    #[error("token {index}: {value} does not fit in {bits} bits")]
    OutOfRange { index: usize, value: Token, bits: u32 },
}

pub fn assemble(text: &str) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let code = raw.split(';').next().unwrap_or_default();
        let mut words = code.split_whitespace();

        let Some(name) = words.next() else {
            continue;
        };
        let operand = words.next();
        if let Some(extra) = words.next() {
            return Err(AsmError::UnexpectedOperand {
                line,
                text: extra.to_string(),
            });
        }

        let (opcode, takes_parameter) = match Opcode::from_mnemonic(name) {
            Some(op) => (Token::from(op.code()), op.takes_parameter()),
            None => match name.parse::<u8>() {
                Ok(raw) if raw < 32 => (
                    Token::from(raw),
                    Opcode::from_code(raw).is_some_and(Opcode::takes_parameter),
                ),
                _ => {
                    return Err(AsmError::UnknownMnemonic {
                        line,
                        name: name.to_string(),
                    });
                }
            },
        };
        tokens.push(opcode);

        match (takes_parameter, operand) {
            (true, Some(text)) => {
                let value = text.parse::<Token>().map_err(|_| AsmError::InvalidOperand {
                    line,
                    text: text.to_string(),
                })?;
                tokens.push(value);
            }
            (true, None) => {
                return Err(AsmError::MissingOperand {
                    line,
                    op: Opcode::decode(opcode).map_or("?", Opcode::mnemonic),
                });
            }
            (false, Some(text)) => {
                return Err(AsmError::UnexpectedOperand {
                    line,
                    text: text.to_string(),
                });
            }
            (false, None) => {}
        }
    }

    Ok(tokens)
}

/// Writes `value` as `bits` units. Negative values lead with the sign seed.
fn encode_value(out: &mut String, index: usize, value: Token, bits: u32) -> Result<(), AsmError> {
    let out_of_range = AsmError::OutOfRange { index, value, bits };
    let low_bits = if value < 0 {
        if value < -(1 << (bits - 1)) {
            return Err(out_of_range);
        }
        out.push_str(SIGN_SEED);
        bits - 1
    } else {
        if value >= 1 << bits {
            return Err(out_of_range);
        }
        bits
    };

    for i in (0..low_bits).rev() {
        out.push_str(if (value >> i) & 1 == 1 { ONE } else { ZERO });
    }
    Ok(())
}

/// Produces awa source that the lexer decodes back into `tokens`.
///
/// The lexer stops reading once fewer than four characters remain, so a
/// non-empty stream ends with one extra zero unit. It never completes a
/// token and is dropped on decode.
pub fn encode(tokens: &[Token]) -> Result<String, AsmError> {
    let mut out = String::from(START_MARKER);
    let mut width = OPCODE_BITS;

    for (index, &token) in tokens.iter().enumerate() {
        encode_value(&mut out, index, token, width)?;
        width = if width == OPCODE_BITS
            && Opcode::decode(token).is_some_and(Opcode::takes_parameter)
        {
            PARAMETER_BITS
        } else {
            OPCODE_BITS
        };
    }

    if !tokens.is_empty() {
        out.push_str(ZERO);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::tokenize;
    use proptest::prelude::*;

    #[test]
    fn test_assemble_with_comments_and_blank_lines() {
        let src = "
            ; push then print
            blo 3   ; three
            PR1

            trm
        ";
        assert_eq!(assemble(src), Ok(vec![0x05, 3, 0x02, 0x1F]));
    }

    #[test]
    fn test_assemble_raw_code() {
        assert_eq!(assemble("23\n5 -1"), Ok(vec![23, 5, -1]));
    }

    #[test]
    fn test_assemble_errors() {
        assert_eq!(
            assemble("add"),
            Err(AsmError::UnknownMnemonic {
                line: 1,
                name: "add".to_string()
            })
        );
        assert_eq!(
            assemble("trm\nblo"),
            Err(AsmError::MissingOperand { line: 2, op: "blo" })
        );
        assert_eq!(
            assemble("pop 1"),
            Err(AsmError::UnexpectedOperand {
                line: 1,
                text: "1".to_string()
            })
        );
        assert_eq!(
            assemble("jmp x"),
            Err(AsmError::InvalidOperand {
                line: 1,
                text: "x".to_string()
            })
        );
    }

    #[test]
    fn test_encode_known_program() {
        assert_eq!(encode(&[]).unwrap(), "awa");
        assert_eq!(encode(&[0x1F]).unwrap(), "awawawawawawa awa");
        assert_eq!(
            encode(&[0x05, 3]).unwrap(),
            "awa awa awawa awawa awa awa awa awa awa awawawa awa"
        );
        assert_eq!(
            encode(&[0x05, -1]).unwrap(),
            "awa awa awawa awawa ~wawawawawawawawa awa"
        );
    }

    #[test]
    fn test_encode_keeps_final_one_bit_readable() {
        let source = encode(&[0x05, 1]).unwrap();
        assert_eq!(source, "awa awa awawa awawa awa awa awa awa awa awa awawa awa");
        assert_eq!(tokenize(&source), Ok(vec![0x05, 1]));
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert_eq!(
            encode(&[0x05, 256]),
            Err(AsmError::OutOfRange {
                index: 1,
                value: 256,
                bits: 8
            })
        );
        assert_eq!(
            encode(&[0x05, -129]),
            Err(AsmError::OutOfRange {
                index: 1,
                value: -129,
                bits: 8
            })
        );
        assert_eq!(
            encode(&[32]),
            Err(AsmError::OutOfRange {
                index: 0,
                value: 32,
                bits: 5
            })
        );
    }

    fn instruction() -> impl Strategy<Value = Vec<Token>> {
        (0..Opcode::ALL.len(), -128..=255i32).prop_map(|(i, param)| {
            let op = Opcode::ALL[i];
            if op.takes_parameter() {
                vec![op.code().into(), param]
            } else {
                vec![op.code().into()]
            }
        })
    }

    proptest! {
        #[test]
        fn encode_then_tokenize_roundtrips(program in prop::collection::vec(instruction(), 0..40)) {
            let tokens: Vec<Token> = program.into_iter().flatten().collect();
            let source = encode(&tokens).unwrap();
            prop_assert_eq!(tokenize(&source).unwrap(), tokens);
        }

        #[test]
        fn raw_codes_roundtrip(codes in prop::collection::vec(0..32i32, 0..40)) {
            // parameters must follow parameterized codes, so give each one
            let tokens: Vec<Token> = codes
                .into_iter()
                .flat_map(|c| match Opcode::decode(c) {
                    Some(op) if op.takes_parameter() => vec![c, -c],
                    _ => vec![c],
                })
                .collect();
            let source = encode(&tokens).unwrap();
            prop_assert_eq!(tokenize(&source).unwrap(), tokens);
        }
    }
}
