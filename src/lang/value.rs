use serde::{Deserialize, Serialize};

use super::alphabet::{self, AlphabetError};

/// Runtime value in the awa language.
///
/// Bubbles are the only data that can exist in the abyss. A double bubble
/// always holds at least two elements; shorter sequences collapse to a
/// scalar through [`Bubble::from_vec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bubble {
    /// 64-bit signed integer.
    Scalar(i64),

    /// Ordered sequence of bubbles: `[ 1 2 3 ]`.
    Double(Vec<Bubble>),
}

impl Default for Bubble {
    fn default() -> Self {
        Bubble::Scalar(0)
    }
}

impl From<i64> for Bubble {
    fn from(n: i64) -> Self {
        Bubble::Scalar(n)
    }
}

impl Bubble {
    /// Builds a bubble from a sequence: empty becomes `0`, a single element
    /// is returned as-is.
    pub fn from_vec(mut items: Vec<Bubble>) -> Self {
        match items.len() {
            0 => Bubble::default(),
            1 => items.remove(0),
            _ => Bubble::Double(items),
        }
    }

    pub fn from_ints(values: impl IntoIterator<Item = i64>) -> Self {
        Self::from_vec(values.into_iter().map(Bubble::Scalar).collect())
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Bubble::Double(_))
    }

    /// Element count of a double; every scalar reports 0.
    pub fn size(&self) -> usize {
        match self {
            Bubble::Scalar(_) => 0,
            Bubble::Double(items) => items.len(),
        }
    }

    /// Copy of the logical value: the elements of a double, or the scalar
    /// itself as a one-element sequence.
    pub fn to_vec(&self) -> Vec<Bubble> {
        match self {
            Bubble::Scalar(_) => vec![self.clone()],
            Bubble::Double(items) => items.clone(),
        }
    }

    fn into_vec(self) -> Vec<Bubble> {
        match self {
            Bubble::Scalar(_) => vec![self],
            Bubble::Double(items) => items,
        }
    }

    /// Prepends `other`'s logical value to this bubble in place.
    pub fn merge(&mut self, other: Bubble) {
        let mut items = other.into_vec();
        items.extend(std::mem::take(self).into_vec());
        *self = Bubble::Double(items);
    }

    /// Releases the elements of a double. A scalar releases nothing.
    pub fn split(self) -> Vec<Bubble> {
        match self {
            Bubble::Scalar(_) => Vec::new(),
            Bubble::Double(items) => items,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Bubble::Scalar(0))
    }

    /// All integers in order, nested doubles flattened.
    pub fn flatten(&self) -> Vec<i64> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<i64>) {
        match self {
            Bubble::Scalar(n) => out.push(*n),
            Bubble::Double(items) => items.iter().for_each(|b| b.flatten_into(out)),
        }
    }

    /// Translates every integer through the alphabet.
    pub fn letters(&self) -> Result<String, AlphabetError> {
        self.flatten().into_iter().map(alphabet::letter).collect()
    }
}

impl std::fmt::Display for Bubble {
    /// Raw numeric form: a scalar prints as itself, a double as its
    /// flattened integers separated by spaces.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, n) in self.flatten().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}
