//! Combinational boolean blocks.

use crate::block::stateless_block;

/// Inputs of the switch blocks: `y = if u2 { u1 } else { u3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwitchInput<T> {
    pub u1: T,
    /// Selector.
    pub u2: bool,
    pub u3: T,
}

impl<T> SwitchInput<T> {
    pub fn new(u1: T, u2: bool, u3: T) -> Self {
        Self { u1, u2, u3 }
    }

    pub fn select(self) -> T {
        if self.u2 { self.u1 } else { self.u3 }
    }
}

stateless_block!(
    Not {},
    bool => bool,
    |_this, u| Ok(!u)
);

stateless_block!(
    And {},
    (bool, bool) => bool,
    |_this, (u1, u2)| Ok(u1 && u2)
);

stateless_block!(
    Or {},
    (bool, bool) => bool,
    |_this, (u1, u2)| Ok(u1 || u2)
);

stateless_block!(
    Xor {},
    (bool, bool) => bool,
    |_this, (u1, u2)| Ok(u1 ^ u2)
);

stateless_block!(
    Nand {},
    (bool, bool) => bool,
    |_this, (u1, u2)| Ok(!(u1 && u2))
);

stateless_block!(
    Nor {},
    (bool, bool) => bool,
    |_this, (u1, u2)| Ok(!(u1 || u2))
);

stateless_block!(
    /// True when every input is true; an empty input vector gives false.
    MultiAnd {},
    Vec<bool> => bool,
    |_this, u| Ok(!u.is_empty() && u.iter().all(|&b| b))
);

stateless_block!(
    MultiOr {},
    Vec<bool> => bool,
    |_this, u| Ok(u.iter().any(|&b| b))
);

stateless_block!(
    Switch {},
    SwitchInput<bool> => bool,
    |_this, input| Ok(input.select())
);
