use std::fmt;

/// A boolean decision variable. Selectors and other indicators are built from these.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BoolVar(pub u64);

impl BoolVar {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BoolVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// An integer decision variable with a closed, bounded domain.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct IntVar(pub u64);

impl IntVar {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for IntVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
