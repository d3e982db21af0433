// =============================================================================
// OPCODE - 5-bit instruction codes
// =============================================================================

/// A decoded instruction token. Opcode tokens are read modulo 32; the token
/// after a parameterized opcode is its raw 8-bit argument.
pub type Token = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0x00,

    // I/O
    Prn = 0x01,
    Pr1 = 0x02,
    Red = 0x03,
    R3d = 0x04,

    // stack ops
    Blo = 0x05,
    Sbm = 0x06,
    Pop = 0x07,
    Dpl = 0x08,
    Srn = 0x09,
    Mrg = 0x0A,

    // arithmetic
    Add = 0x0B,
    Sub = 0x0C,
    Mul = 0x0D,
    Div = 0x0E,
    Cnt = 0x0F,

    // ==========================================================================
    // Control flow - label based, resolved before execution
    // ==========================================================================
    Lbl = 0x10,
    Jmp = 0x11,
    /// Jump if the top two bubbles are equal.
    Eql = 0x12,
    /// Jump if the top bubble is less than the second.
    Lss = 0x13,
    /// Shares the `Lss` direction test.
    Gr8 = 0x14,
    /// Jump if the top bubble is the scalar 0.
    Eqz = 0x15,

    Trm = 0x1F,
}

impl Opcode {
    pub const ALL: [Opcode; 23] = [
        Opcode::Nop,
        Opcode::Prn,
        Opcode::Pr1,
        Opcode::Red,
        Opcode::R3d,
        Opcode::Blo,
        Opcode::Sbm,
        Opcode::Pop,
        Opcode::Dpl,
        Opcode::Srn,
        Opcode::Mrg,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Cnt,
        Opcode::Lbl,
        Opcode::Jmp,
        Opcode::Eql,
        Opcode::Lss,
        Opcode::Gr8,
        Opcode::Eqz,
        Opcode::Trm,
    ];

    /// Looks up the opcode for a raw token, reading it modulo 32.
    pub fn decode(token: Token) -> Option<Opcode> {
        Self::from_code(token.rem_euclid(32) as u8)
    }

    pub fn from_code(code: u8) -> Option<Opcode> {
        Self::ALL.iter().copied().find(|op| op.code() == code)
    }

    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        let name = name.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|op| op.mnemonic() == name)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether an 8-bit argument token follows this opcode.
    pub fn takes_parameter(self) -> bool {
        matches!(
            self,
            Opcode::Blo
                | Opcode::Sbm
                | Opcode::Srn
                | Opcode::Lbl
                | Opcode::Jmp
                | Opcode::Eql
                | Opcode::Lss
                | Opcode::Gr8
                | Opcode::Eqz
        )
    }

    pub fn is_jump(self) -> bool {
        matches!(
            self,
            Opcode::Jmp | Opcode::Eql | Opcode::Lss | Opcode::Gr8 | Opcode::Eqz
        )
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::Prn => "prn",
            Opcode::Pr1 => "pr1",
            Opcode::Red => "red",
            Opcode::R3d => "r3d",
            Opcode::Blo => "blo",
            Opcode::Sbm => "sbm",
            Opcode::Pop => "pop",
            Opcode::Dpl => "dpl",
            Opcode::Srn => "srn",
            Opcode::Mrg => "mrg",
            Opcode::Add => "4dd",
            Opcode::Sub => "sbt",
            Opcode::Mul => "mul",
            Opcode::Div => "dvd",
            Opcode::Cnt => "cnt",
            Opcode::Lbl => "lbl",
            Opcode::Jmp => "jmp",
            Opcode::Eql => "eql",
            Opcode::Lss => "lss",
            Opcode::Gr8 => "gr8",
            Opcode::Eqz => "eqz",
            Opcode::Trm => "trm",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Diagnostic name for a raw opcode token: the mnemonic when known, otherwise
/// the decimal code.
pub fn name(token: Token) -> String {
    match Opcode::decode(token) {
        Some(op) => op.mnemonic().to_string(),
        None => token.rem_euclid(32).to_string(),
    }
}
