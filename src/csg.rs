//! Boolean combination of two solids.
//!
//! Both operands are traced independently and their sorted hit lists are
//! merged while tracking whether the ray is inside A, inside B, both or
//! neither. A hit becomes part of the combined boundary when it moves the
//! ray into or out of the set of states the operation cares about.

use crate::float::*;
use crate::intersect::Ray;
use crate::intersection::Intersections;
use crate::primitive::{trace_with_stack, Primitive};
use crate::transform::TransformStack;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsgState {
    InNeither = 0,
    InA = 1,
    InB = 2,
    InBoth = 3,
}

/// Rows are indexed by the current state, columns by the operand that was crossed
const TRANSITIONS: [[CsgState; 2]; 4] = [
    [CsgState::InA, CsgState::InB],
    [CsgState::InNeither, CsgState::InBoth],
    [CsgState::InBoth, CsgState::InNeither],
    [CsgState::InB, CsgState::InA],
];

impl CsgState {
    pub fn new(in_a: bool, in_b: bool) -> CsgState {
        match (in_a, in_b) {
            (false, false) => CsgState::InNeither,
            (true, false) => CsgState::InA,
            (false, true) => CsgState::InB,
            (true, true) => CsgState::InBoth,
        }
    }

    pub fn in_a(self) -> bool {
        self == CsgState::InA || self == CsgState::InBoth
    }

    pub fn in_b(self) -> bool {
        self == CsgState::InB || self == CsgState::InBoth
    }
}

/// State after crossing the surface of A
pub fn toggle_a(state: CsgState) -> CsgState {
    TRANSITIONS[state as usize][0]
}

/// State after crossing the surface of B
pub fn toggle_b(state: CsgState) -> CsgState {
    TRANSITIONS[state as usize][1]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Intersection,
    /// A minus B
    Difference,
}

impl CsgOp {
    pub fn states_of_interest(self) -> &'static [CsgState] {
        match self {
            CsgOp::Union => &[CsgState::InA, CsgState::InB, CsgState::InBoth],
            CsgOp::Intersection => &[CsgState::InBoth],
            CsgOp::Difference => &[CsgState::InA],
        }
    }

    pub fn is_of_interest(self, state: CsgState) -> bool {
        self.states_of_interest().contains(&state)
    }

    /// Surfaces of B bound the result from the inside
    fn flips_b_normals(self) -> bool {
        self == CsgOp::Difference
    }
}

/// Merge the hits of the two operands into the hits of the combination.
/// On equal distances the hit of B is consumed first.
pub fn merge<'a>(
    op: CsgOp,
    hits_a: Intersections<'a>,
    hits_b: Intersections<'a>,
    epsilon: Float,
) -> Intersections<'a> {
    let mut state = CsgState::new(hits_a.len() % 2 == 1, hits_b.len() % 2 == 1);
    let mut list_a = hits_a.sorted();
    let mut list_b = hits_b.sorted();
    let mut merged = Intersections::new(epsilon);
    loop {
        let take_a = match (list_a.peek(), list_b.peek()) {
            (None, None) => break,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a.t < b.t,
        };
        let (hit, new_state) = if take_a {
            (list_a.pop(), toggle_a(state))
        } else {
            let hit = list_b.pop().map(|mut hit| {
                if op.flips_b_normals() {
                    hit.normal = -hit.normal;
                }
                hit
            });
            (hit, toggle_b(state))
        };
        if op.is_of_interest(state) != op.is_of_interest(new_state) {
            if let Some(hit) = hit {
                merged.add(hit);
            }
        }
        state = new_state;
    }
    merged
}

/// Boolean node with owned operands
#[derive(Clone, Debug)]
pub struct Csg {
    op: CsgOp,
    a: Box<Primitive>,
    b: Box<Primitive>,
}

impl Csg {
    pub fn new(op: CsgOp, a: Primitive, b: Primitive) -> Csg {
        Csg {
            op,
            a: Box::new(a),
            b: Box::new(b),
        }
    }

    pub fn op(&self) -> CsgOp {
        self.op
    }

    pub fn a(&self) -> &Primitive {
        &self.a
    }

    pub fn b(&self) -> &Primitive {
        &self.b
    }

    /// Trace both operands in the frame on top of the stack and merge them
    pub fn trace<'a>(&'a self, ray: &Ray, stack: &mut TransformStack) -> Intersections<'a> {
        let hits_a = trace_with_stack(&self.a, ray, stack);
        let hits_b = trace_with_stack(&self.b, ray, stack);
        merge(self.op, hits_a, hits_b, ray.epsilon)
    }
}
