use crate::interpreter::{
    evaluator::core::Machine,
    program::{VectorOp, broadcast_index},
    value::scalar::Scalar,
};

impl<T: Scalar> Machine<T> {
    /// Pops a right group of width `right` and a left group of width `left`,
    /// and pushes the result group.
    ///
    /// Results are written over the operands from the bottom of the left
    /// group upwards. Component `j` only reads operand components at or above
    /// the slot it writes, except broadcast scalars, which are read first.
    pub(crate) fn eval_vector(&mut self, op: VectorOp, left: usize, right: usize) {
        let base = self.len - left - right;
        let rhs_base = base + left;
        let lhs_scalar = self.stack[base];
        let rhs_scalar = self.stack[rhs_base];
        let width = op.result_width(left, right);

        let lhs = |stack: &[T], j: usize| {
            if left == 1 {
                lhs_scalar
            } else {
                broadcast_index(left, j).map_or(T::ZERO, |i| stack[base + i])
            }
        };
        let rhs = |stack: &[T], j: usize| {
            if right == 1 {
                rhs_scalar
            } else {
                broadcast_index(right, j).map_or(T::ZERO, |i| stack[rhs_base + i])
            }
        };

        match op {
            VectorOp::Dot => {
                let mut sum = T::ZERO;
                for j in 0..left.min(right) {
                    sum = sum + lhs(&self.stack, j) * rhs(&self.stack, j);
                }
                self.stack[base] = sum;
            },
            _ => {
                for j in 0..width {
                    let a = lhs(&self.stack, j);
                    let b = rhs(&self.stack, j);
                    self.stack[base + j] = match op {
                        VectorOp::Add => a + b,
                        VectorOp::Sub => a - b,
                        VectorOp::VecScalarDiv => a / b,
                        VectorOp::VecScalarMul | VectorOp::ScalarVecMul | VectorOp::Dot => a * b,
                    };
                }
            },
        }
        self.len = base + width;
    }
}
