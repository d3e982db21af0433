use std::fmt::Write;

use crate::bytecode::op::{self, Opcode, Token};

pub struct TokenDumper {
    pub color: bool,
}

impl Default for TokenDumper {
    fn default() -> Self {
        Self { color: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Opcode,
    Param,
    Invalid,
}

impl TokenDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const RED: &'static str = "\x1b[31m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn dump(&self, tokens: &[Token]) {
        print!("{}", self.render(tokens));
    }

    pub fn render(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        let mut expect_param = false;

        for (i, &token) in tokens.iter().enumerate() {
            let kind = if expect_param {
                expect_param = false;
                Kind::Param
            } else {
                match Opcode::decode(token) {
                    Some(op) => {
                        expect_param = op.takes_parameter();
                        Kind::Opcode
                    }
                    None => Kind::Invalid,
                }
            };

            let (colr, reset) = if self.color {
                (Self::color(kind), Self::RESET)
            } else {
                ("", "")
            };

            let label = match kind {
                Kind::Opcode | Kind::Invalid => op::name(token),
                Kind::Param => String::new(),
            };

            let _ = writeln!(
                out,
                "[{:04}] {}{:<8} {:>5} {}{}",
                i,
                colr,
                Self::kind_name(kind),
                token,
                label,
                reset
            );
        }

        out
    }

    fn kind_name(kind: Kind) -> &'static str {
        match kind {
            Kind::Opcode => "OPCODE",
            Kind::Param => "PARAM",
            Kind::Invalid => "INVALID",
        }
    }

    fn color(kind: Kind) -> &'static str {
        match kind {
            Kind::Opcode => Self::YEL,
            Kind::Param => Self::CYN,
            Kind::Invalid => Self::RED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let out = TokenDumper::new().no_color().render(&[0x05, 16, 0x02, 25]);
        let lines: Vec<&str> = out.lines().map(str::trim_end).collect();
        assert_eq!(
            lines,
            vec![
                "[0000] OPCODE       5 blo",
                "[0001] PARAM       16",
                "[0002] OPCODE       2 pr1",
                "[0003] INVALID     25 25",
            ]
        );
    }

    #[test]
    fn test_render_colored() {
        let out = TokenDumper::new().render(&[0x1F]);
        assert!(out.starts_with("[0000] \x1b[33mOPCODE"));
        assert!(out.trim_end().ends_with("trm\x1b[0m"));
    }
}
