use std::collections::HashMap;

use tracing::{debug, trace};

use crate::bytecode::op::{self, Opcode, Token};
use crate::frontend::lexer;
use crate::lang::{Bubble, alphabet};
use crate::runtime::arith::{self, ArithOp};
use crate::runtime::io::{InputSource, OutputSink};
use crate::runtime::runtime_error::{ErrorKind, RuntimeError};
use crate::runtime::stack::{Abyss, Underflow};

/// Hard cap on executed operations per run.
pub const OPERATION_LIMIT: usize = 10_000;

/// Label id -> index of the label's parameter token.
pub type Labels = HashMap<Token, usize>;

/// Scans the token stream once and records every `lbl` definition. The
/// parameter of each parameterized opcode is skipped so it is never read as
/// an opcode. A label defined twice resolves to its last definition.
pub fn resolve_labels(tokens: &[Token]) -> Result<Labels, ErrorKind> {
    let mut labels = Labels::new();
    let mut i = 0;

    while i < tokens.len() {
        match Opcode::decode(tokens[i]) {
            Some(Opcode::Lbl) => {
                let id = tokens
                    .get(i + 1)
                    .ok_or(ErrorKind::MissingParameter { op: "lbl" })?;
                labels.insert(*id, i + 1);
                i += 2;
            }
            Some(op) if op.takes_parameter() => i += 2,
            _ => i += 1,
        }
    }

    Ok(labels)
}

pub struct Interpreter<I, O> {
    abyss: Abyss,
    input: I,
    output: O,
    call_stack: Vec<String>,
    steps: usize,
}

impl<I: InputSource, O: OutputSink> Interpreter<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self {
            abyss: Abyss::new(),
            input,
            output,
            call_stack: Vec::new(),
            steps: 0,
        }
    }

    pub fn abyss(&self) -> &Abyss {
        &self.abyss
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }

    /// Operations executed by the last run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn reset_execution_state(&mut self) {
        self.steps = 0;
        self.call_stack.clear();
    }

    fn error(&self, kind: ErrorKind) -> RuntimeError {
        RuntimeError::new(kind).with_trace(&self.call_stack)
    }

    /// Decodes and runs a program. Yields the top bubble left in the abyss,
    /// or `0` when it is empty.
    pub async fn run(&mut self, source: &str) -> Result<Bubble, RuntimeError> {
        let tokens = lexer::tokenize(source)
            .map_err(|e| RuntimeError::from(e).with_context("tokenize"))?;
        self.run_tokens(&tokens).await
    }

    pub async fn run_tokens(&mut self, tokens: &[Token]) -> Result<Bubble, RuntimeError> {
        self.reset_execution_state();
        self.call_stack.push("run".to_string());

        let result = self
            .execute(tokens)
            .await
            .map(|()| self.abyss.pop().unwrap_or_default());

        self.abyss.clear();

        match &result {
            Ok(value) => {
                self.call_stack.pop();
                debug!(steps = self.steps, result = %value, "run finished");
            }
            Err(e) => debug!(steps = self.steps, error = %e.kind, "run aborted"),
        }

        result
    }

    // Execution

    fn check_limits(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;

        if self.steps >= OPERATION_LIMIT {
            return Err(self.error(ErrorKind::LimitExceeded {
                limit: OPERATION_LIMIT,
            }));
        }

        Ok(())
    }

    async fn execute(&mut self, tokens: &[Token]) -> Result<(), RuntimeError> {
        self.call_stack.push("resolve labels".to_string());
        let labels = resolve_labels(tokens).map_err(|kind| self.error(kind))?;
        self.call_stack.pop();
        debug!(tokens = tokens.len(), labels = labels.len(), "labels resolved");

        let mut ip: usize = 0;

        while ip < tokens.len() {
            let op = Opcode::decode(tokens[ip]).ok_or_else(|| {
                self.error(ErrorKind::InvalidOpcode {
                    name: op::name(tokens[ip]),
                })
            })?;

            trace!(ip, op = %op, depth = self.abyss.len(), "step");
            self.call_stack.push(format!("{}@{}", op, ip));

            ip = self
                .exec_op(op, tokens, ip, &labels)
                .await
                .map_err(|kind| self.error(kind))?;

            ip += 1;
            self.check_limits()?;
            self.call_stack.pop();
        }

        Ok(())
    }

    /// Runs one instruction starting at `ip` and returns the index of the last
    /// token it consumed (its parameter, or a jump target).
    async fn exec_op(
        &mut self,
        op: Opcode,
        tokens: &[Token],
        mut ip: usize,
        labels: &Labels,
    ) -> Result<usize, ErrorKind> {
        let name = op.mnemonic();
        let underflow = |u: Underflow| ErrorKind::StackUnderflow {
            op: name,
            needed: u.needed,
            found: u.found,
        };

        let param = if op.takes_parameter() {
            ip += 1;
            *tokens
                .get(ip)
                .ok_or(ErrorKind::MissingParameter { op: name })?
        } else {
            0
        };

        let mut jump = false;

        match op {
            Opcode::Nop => {}

            // I/O
            Opcode::Prn => {
                let bubble = self.abyss.pop().map_err(underflow)?;
                let text = bubble.letters()?;
                self.output.write(&text)?;
            }
            Opcode::Pr1 => {
                let bubble = self.abyss.pop().map_err(underflow)?;
                self.output.write(&bubble.to_string())?;
            }
            Opcode::Red => {
                let bubble = match self.input.read_line().await? {
                    Some(line) if !line.is_empty() => Bubble::from_vec(
                        line.chars()
                            .map(|ch| alphabet::index_of(ch).map(Bubble::Scalar))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    _ => Bubble::default(),
                };
                self.abyss.push(bubble);
            }
            Opcode::R3d => {
                let line = self.input.read_line().await?.unwrap_or_default();
                let text = line.trim();
                let n = if text.is_empty() {
                    0
                } else {
                    text.parse::<i64>().map_err(|_| ErrorKind::NotNumeric {
                        text: text.to_string(),
                    })?
                };
                self.abyss.push(Bubble::Scalar(n));
            }

            // Stack operations
            Opcode::Blo => self.abyss.push(Bubble::Scalar(param.into())),
            Opcode::Sbm => self.abyss.submerge(depth(param)).map_err(underflow)?,
            Opcode::Pop => self.abyss.split().map_err(underflow)?,
            Opcode::Dpl => self.abyss.duplicate().map_err(underflow)?,
            Opcode::Srn => self.abyss.surround(depth(param)).map_err(underflow)?,
            Opcode::Mrg => self.abyss.merge().map_err(underflow)?,
            Opcode::Cnt => self.abyss.count().map_err(underflow)?,

            // Arithmetic
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                let (a, b) = self.abyss.pop_two().map_err(underflow)?;
                let arith_op = ArithOp::from_opcode(op).ok_or(ErrorKind::InvalidOpcode {
                    name: name.to_string(),
                })?;
                self.abyss.push(arith::apply(arith_op, &a, &b)?);
            }

            // Control flow
            Opcode::Lbl => {}
            Opcode::Jmp => jump = true,
            Opcode::Eql | Opcode::Lss | Opcode::Gr8 => {
                let (a, b) = self.abyss.peek_two().map_err(underflow)?;
                jump = match op {
                    Opcode::Eql => arith::equal(a, b),
                    Opcode::Lss => arith::less(a, b),
                    _ => arith::greater(a, b),
                };
            }
            Opcode::Eqz => jump = arith::zero(self.abyss.peek().map_err(underflow)?),
            Opcode::Trm => ip = tokens.len(),
        }

        if jump {
            match labels.get(&param) {
                Some(&target) => ip = target,
                None => trace!(label = param, "jump to undefined label ignored"),
            }
        }

        Ok(ip)
    }
}

/// Stack distances below zero count as zero.
fn depth(param: Token) -> usize {
    usize::try_from(param).unwrap_or(0)
}
