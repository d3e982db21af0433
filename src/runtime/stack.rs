use crate::lang::Bubble;

/// Not enough bubbles for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Underflow {
    pub needed: usize,
    pub found: usize,
}

/// The operand stack. The top is the end of the vector.
#[derive(Debug, Default)]
pub struct Abyss {
    bubbles: Vec<Bubble>,
}

impl Abyss {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn require(&self, needed: usize) -> Result<(), Underflow> {
        if self.bubbles.len() < needed {
            return Err(Underflow {
                needed,
                found: self.bubbles.len(),
            });
        }
        Ok(())
    }

    pub fn push(&mut self, bubble: Bubble) {
        self.bubbles.push(bubble);
    }

    pub fn pop(&mut self) -> Result<Bubble, Underflow> {
        self.bubbles.pop().ok_or(Underflow {
            needed: 1,
            found: 0,
        })
    }

    pub fn peek(&self) -> Result<&Bubble, Underflow> {
        self.bubbles.last().ok_or(Underflow {
            needed: 1,
            found: 0,
        })
    }

    /// Top and second bubble, without popping.
    pub fn peek_two(&self) -> Result<(&Bubble, &Bubble), Underflow> {
        self.require(2)?;
        let n = self.bubbles.len();
        Ok((&self.bubbles[n - 1], &self.bubbles[n - 2]))
    }

    /// Pops the top two bubbles, top first.
    pub fn pop_two(&mut self) -> Result<(Bubble, Bubble), Underflow> {
        self.require(2)?;
        let a = self.pop()?;
        let b = self.pop()?;
        Ok((a, b))
    }

    /// `( ... x -- ... )` with `x` reinserted `depth` places below the top.
    /// Depth 0, or a depth past the bottom, sinks it to the bottom.
    pub fn submerge(&mut self, depth: usize) -> Result<(), Underflow> {
        let top = self.pop()?;
        let index = match depth {
            0 => 0,
            d => self.bubbles.len().saturating_sub(d),
        };
        self.bubbles.insert(index, top);
        Ok(())
    }

    /// Pops the top bubble; a double releases its elements back onto the
    /// stack, last element on top.
    pub fn split(&mut self) -> Result<(), Underflow> {
        let top = self.pop()?;
        self.bubbles.extend(top.split());
        Ok(())
    }

    /// `( a -- a a' )`
    pub fn duplicate(&mut self) -> Result<(), Underflow> {
        let top = self.peek()?.clone();
        self.bubbles.push(top);
        Ok(())
    }

    /// Merges the top `count` bubbles into one, top first, each pop
    /// prepending its values. Doubles are spliced in, not nested.
    pub fn surround(&mut self, count: usize) -> Result<(), Underflow> {
        self.require(count)?;
        let mut acc = Bubble::Double(Vec::with_capacity(count));
        for _ in 0..count {
            acc.merge(self.pop()?);
        }
        self.bubbles.push(Bubble::from_vec(acc.split()));
        Ok(())
    }

    /// `( b a -- [b.. a..] )`
    pub fn merge(&mut self) -> Result<(), Underflow> {
        let (mut a, b) = self.pop_two()?;
        a.merge(b);
        self.bubbles.push(a);
        Ok(())
    }

    /// `( a -- a n )` where `n` is the size of `a`.
    pub fn count(&mut self) -> Result<(), Underflow> {
        let size = self.peek()?.size();
        self.bubbles.push(Bubble::Scalar(size as i64));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abyss(values: &[i64]) -> Abyss {
        let mut abyss = Abyss::new();
        for v in values {
            abyss.push(Bubble::Scalar(*v));
        }
        abyss
    }

    fn ints(abyss: &Abyss) -> Vec<Bubble> {
        abyss.bubbles().to_vec()
    }

    fn scalars(values: &[i64]) -> Vec<Bubble> {
        values.iter().map(|v| Bubble::Scalar(*v)).collect()
    }

    #[test]
    fn test_pop_empty() {
        let mut a = Abyss::new();
        assert_eq!(a.pop(), Err(Underflow { needed: 1, found: 0 }));
    }

    #[test]
    fn test_submerge_to_bottom() {
        let mut a = abyss(&[1, 2, 3]);
        a.submerge(0).unwrap();
        assert_eq!(ints(&a), scalars(&[3, 1, 2]));
    }

    #[test]
    fn test_submerge_by_depth() {
        let mut a = abyss(&[1, 2, 3, 4]);
        a.submerge(2).unwrap();
        assert_eq!(ints(&a), scalars(&[1, 4, 2, 3]));

        let mut a = abyss(&[1, 2, 3, 4]);
        a.submerge(1).unwrap();
        assert_eq!(ints(&a), scalars(&[1, 2, 4, 3]));
    }

    #[test]
    fn test_submerge_past_bottom() {
        let mut a = abyss(&[1, 2]);
        a.submerge(9).unwrap();
        assert_eq!(ints(&a), scalars(&[2, 1]));
    }

    #[test]
    fn test_split_scalar_consumes_it() {
        let mut a = abyss(&[1, 2]);
        a.split().unwrap();
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_surround_then_split_restores_stack() {
        let mut a = abyss(&[1, 2, 3, 4]);
        a.surround(3).unwrap();
        assert_eq!(
            ints(&a),
            vec![Bubble::Scalar(1), Bubble::from_ints([2, 3, 4])]
        );
        a.split().unwrap();
        assert_eq!(ints(&a), scalars(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_surround_splices_doubles() {
        let mut a = Abyss::new();
        a.push(Bubble::from_ints([1, 2]));
        a.push(Bubble::Scalar(3));
        a.surround(2).unwrap();
        assert_eq!(ints(&a), vec![Bubble::from_ints([1, 2, 3])]);

        a.push(Bubble::from_ints([4, 5]));
        a.surround(2).unwrap();
        assert_eq!(ints(&a), vec![Bubble::from_ints([1, 2, 3, 4, 5])]);
        a.split().unwrap();
        assert_eq!(ints(&a), scalars(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_surround_single_and_none() {
        let mut a = abyss(&[7]);
        a.surround(1).unwrap();
        assert_eq!(ints(&a), scalars(&[7]));

        a.surround(0).unwrap();
        assert_eq!(ints(&a), scalars(&[7, 0]));

        let mut a = Abyss::new();
        a.push(Bubble::from_ints([1, 2]));
        a.surround(1).unwrap();
        assert_eq!(ints(&a), vec![Bubble::from_ints([1, 2])]);
    }

    #[test]
    fn test_surround_underflow() {
        let mut a = abyss(&[1]);
        assert_eq!(a.surround(2), Err(Underflow { needed: 2, found: 1 }));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_merge_scalars() {
        let mut a = abyss(&[2, 1]);
        a.merge().unwrap();
        assert_eq!(ints(&a), vec![Bubble::from_ints([2, 1])]);
    }

    #[test]
    fn test_merge_grows_double() {
        let mut a = Abyss::new();
        a.push(Bubble::from_ints([1, 2]));
        a.push(Bubble::Scalar(3));
        a.merge().unwrap();
        assert_eq!(ints(&a), vec![Bubble::from_ints([1, 2, 3])]);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut a = Abyss::new();
        a.push(Bubble::from_ints([1, 2]));
        a.duplicate().unwrap();
        a.merge().unwrap();
        assert_eq!(ints(&a), vec![Bubble::from_ints([1, 2, 1, 2])]);
    }

    #[test]
    fn test_count() {
        let mut a = Abyss::new();
        a.push(Bubble::from_ints([1, 2, 3]));
        a.count().unwrap();
        assert_eq!(a.peek().unwrap(), &Bubble::Scalar(3));
        a.count().unwrap();
        assert_eq!(a.peek().unwrap(), &Bubble::Scalar(0));
        assert_eq!(a.len(), 3);
    }
}
