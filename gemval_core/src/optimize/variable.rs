//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

/// A continuous variable of a linear program
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique id of the variable
    pub id: String,
    /// Lowest value the variable may take, may be `f64::NEG_INFINITY`
    pub lower_bound: f64,
    /// Highest value the variable may take, may be `f64::INFINITY`
    pub upper_bound: f64,
    /// Column of the variable in the problem
    pub(crate) index: usize,
}

impl Variable {
    pub(crate) fn new(id: &str, lower_bound: f64, upper_bound: f64, index: usize) -> Variable {
        Variable {
            id: id.to_string(),
            lower_bound,
            upper_bound,
            index,
        }
    }

    /// Column of the variable in the problem
    pub fn index(&self) -> usize {
        self.index
    }

    /// Both bounds are equal, so the variable is a constant
    pub fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <= {} <= {}", self.lower_bound, self.id, self.upper_bound)
    }
}
