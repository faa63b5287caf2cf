use std::fmt::Display;

use crate::interpreter::program::{
    ArithmeticOp, CompareOp, LogicOp, Program, Step, VectorOp, broadcast_index,
};

/// Renders the program as a step listing.
///
/// Each line shows the step index, the step and the symbolic expression on
/// top of the stack afterwards. The expressions are rebuilt from the steps
/// and need not match the source text.
///
/// # Example
/// ```
/// use evalfunc::EvalFunction;
///
/// let mut f = EvalFunction::new();
/// f.define_argument("x", 1, 1, false).unwrap();
/// f.parse("2 * x + 1").unwrap();
///
/// let trace = f.program().to_string();
/// assert!(trace.contains("((2 * x1) + 1)"));
/// ```
impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack: Vec<String> = Vec::with_capacity(self.max_depth());

        for (index, step) in self.steps().iter().enumerate() {
            replay(step, &mut stack);
            let top = stack.last().map_or("", String::as_str);
            writeln!(f, "{index:>4}  {:<16} {top}", step.to_string())?;
        }
        Ok(())
    }
}

/// Applies one step to a stack of symbolic expressions.
fn replay(step: &Step, stack: &mut Vec<String>) {
    match step {
        Step::Constant(value) => stack.push(value.to_string()),
        Step::Imaginary => stack.push("I".to_string()),
        Step::Argument(slot) => stack.push(format!("x{slot}")),
        Step::External { name, .. } => stack.push(name.clone()),
        Step::Call(function) => {
            let a = pop(stack);
            stack.push(format!("{}({a})", function.name()));
        },
        Step::CallBinary(function) => {
            let b = pop(stack);
            let a = pop(stack);
            stack.push(format!("{}({a}, {b})", function.name()));
        },
        Step::Negate => {
            let a = pop(stack);
            stack.push(format!("(-{a})"));
        },
        Step::Not => {
            let a = pop(stack);
            stack.push(format!("(not {a})"));
        },
        Step::Arithmetic(op) => {
            let symbol = match op {
                ArithmeticOp::Add => "+",
                ArithmeticOp::Sub => "-",
                ArithmeticOp::Mul => "*",
                ArithmeticOp::Div => "/",
            };
            binary(stack, symbol);
        },
        Step::Compare(op) => {
            let symbol = match op {
                CompareOp::Greater => ">",
                CompareOp::Less => "<",
                CompareOp::GreaterEqual => ">=",
                CompareOp::LessEqual => "<=",
                CompareOp::Equal => "==",
            };
            binary(stack, symbol);
        },
        Step::Logic(op) => binary(stack, if *op == LogicOp::And { "and" } else { "or" }),
        Step::Vector { op, left, right } => vector(stack, *op, *left, *right),
        Step::End => {},
    }
}

fn pop(stack: &mut Vec<String>) -> String {
    stack.pop().unwrap_or_else(|| "?".to_string())
}

fn binary(stack: &mut Vec<String>, symbol: &str) {
    let b = pop(stack);
    let a = pop(stack);
    stack.push(format!("({a} {symbol} {b})"));
}

fn vector(stack: &mut Vec<String>, op: VectorOp, left: usize, right: usize) {
    let rhs = stack.split_off(stack.len().saturating_sub(right));
    let lhs = stack.split_off(stack.len().saturating_sub(left));
    let component = |group: &[String], width: usize, index: usize| {
        broadcast_index(width, index).and_then(|i| group.get(i))
                                     .map_or_else(|| "0".to_string(), Clone::clone)
    };

    if op == VectorOp::Dot {
        let terms: Vec<String> = (0..left.min(right)).map(|i| {
                                                         format!("{} * {}",
                                                                 component(&lhs, left, i),
                                                                 component(&rhs, right, i))
                                                     })
                                                     .collect();
        stack.push(format!("({})", terms.join(" + ")));
        return;
    }

    let symbol = match op {
        VectorOp::Add => "+",
        VectorOp::Sub => "-",
        VectorOp::VecScalarMul | VectorOp::ScalarVecMul => "*",
        VectorOp::VecScalarDiv | VectorOp::Dot => "/",
    };
    for i in 0..op.result_width(left, right) {
        stack.push(format!("({} {symbol} {})",
                           component(&lhs, left, i),
                           component(&rhs, right, i)));
    }
}
