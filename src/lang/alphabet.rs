//! AwaSCII: the 64-symbol alphabet used by `prn` and `red`.

use thiserror::Error;

pub const AWASCII: [char; 64] = [
    'A', 'W', 'a', 'w', 'J', 'E', 'L', 'Y', 'H', 'O', 'S', 'I', 'U', 'M', 'j', 'e', //
    'l', 'y', 'h', 'o', 's', 'i', 'u', 'm', 'P', 'C', 'N', 'T', 'p', 'c', 'n', 't', //
    'B', 'D', 'F', 'G', 'R', 'b', 'd', 'f', 'g', 'r', '0', '1', '2', '3', '4', '5', //
    '6', '7', '8', '9', ' ', '.', ',', '!', '\'', '(', ')', '~', '_', '/', ';', '\n',
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    #[error("alphabet index {0} out of range 0..{len}", len = AWASCII.len())]
    IndexOutOfRange(i64),

    #[error("character {0:?} is not in the alphabet")]
    InvalidCharacter(char),
}

pub fn letter(index: i64) -> Result<char, AlphabetError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| AWASCII.get(i).copied())
        .ok_or(AlphabetError::IndexOutOfRange(index))
}

pub fn index_of(ch: char) -> Result<i64, AlphabetError> {
    AWASCII
        .iter()
        .position(|&c| c == ch)
        .map(|i| i as i64)
        .ok_or(AlphabetError::InvalidCharacter(ch))
}
