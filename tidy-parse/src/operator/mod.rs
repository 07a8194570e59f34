//! Operator precedence parsing


use std::cmp::Ordering;
use tidy_syntax::{Assoc, Binop, Node};

/// A non-associative operator was chained with an operator of the same precedence.
#[derive(Debug, PartialEq, Eq)]
pub struct AmbiguousUse {
    pub binop: Binop,
    pub pos: usize,
}

struct State<'a> {
    values: Vec<Node>,
    operators: Vec<Binop>,
    rest: &'a mut dyn Iterator<Item = (Binop, usize, Node)>,
    current: Option<(Binop, usize, Node)>,
}

impl<'a> State<'a> {
    fn new(first: Node, rest: &'a mut dyn Iterator<Item = (Binop, usize, Node)>) -> Self {
        let current = rest.next();
        State {
            values: vec![first],
            operators: Vec::with_capacity(1),
            rest,
            current,
        }
    }

    fn shift(&mut self) {
        match self.current.take() {
            None => {
                panic!("shift called on empty input")
            }
            Some((binop, _, rhs)) => {
                self.values.push(rhs);
                self.operators.push(binop);
                self.current = self.rest.next();
            }
        }
    }

    fn reduce(&mut self) {
        debug_assert!(self.values.len() >= 2);

        let rhs = self.values.pop().unwrap();
        let lhs = self.values.pop().unwrap();
        let binop = self.operators.pop().unwrap();
        self.values.push(Node::mk_binop(binop, lhs, rhs));
    }

    fn peek_operator(&self) -> Option<Binop> {
        self.operators.last().copied()
    }

    fn peek_current(&self) -> Option<(Binop, usize)> {
        self.current.as_ref().map(|(binop, pos, _)| (*binop, *pos))
    }
}

/// Parse a sequence of binary operators into a correctly associated expression tree.
pub fn operator(
    first: Node,
    rest: &mut dyn Iterator<Item = (Binop, usize, Node)>,
) -> Result<Node, AmbiguousUse> {
    let mut state = State::new(first, rest);
    loop {
        match state.peek_current() {
            None => match state.peek_operator() {
                None => {
                    break;
                }
                Some(_prev_binop) => {
                    state.reduce();
                }
            },
            Some((binop, pos)) => match state.peek_operator() {
                None => {
                    state.shift();
                }
                Some(prev_binop) => match binop.compare_precedence(&prev_binop) {
                    Ordering::Less => {
                        state.reduce();
                    }
                    Ordering::Equal => match (binop.assoc(), prev_binop.assoc()) {
                        (Assoc::Left, Assoc::Left) => {
                            state.reduce();
                        }
                        (Assoc::Right, Assoc::Right) => {
                            state.shift();
                        }
                        _ => return Err(AmbiguousUse { binop, pos }),
                    },
                    Ordering::Greater => {
                        state.shift();
                    }
                },
            },
        }
    }

    debug_assert!(state.values.len() == 1);
    debug_assert!(state.operators.is_empty());
    Ok(state.values.pop().unwrap())
}
