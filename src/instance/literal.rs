use std::fmt;

use super::BoolVar;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(u64);

pub const MAX_LITERAL: u64 = 1 << 63;

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.polarity() {
            write!(f, "{:?}", self.var())
        } else {
            write!(f, "!{:?}", self.var())
        }
    }
}

impl Literal {
    pub fn new(var: BoolVar, polarity: bool) -> Literal {
        if var.0 > MAX_LITERAL {
            panic!("variable too large - must be < 2^63");
        }
        Literal((var.0 << 1) | (polarity as u64))
    }

    pub fn positive(var: BoolVar) -> Literal {
        Literal::new(var, true)
    }

    pub fn var(&self) -> BoolVar {
        BoolVar(self.0 >> 1)
    }

    pub fn polarity(&self) -> bool {
        (self.0 & 1) != 0
    }

    pub fn invert(&self) -> Literal {
        Literal(self.0 ^ 1)
    }

    /// The value this literal takes when its variable is set to `value`
    pub fn under(&self, value: bool) -> bool {
        value == self.polarity()
    }
}
