use std::{f64::consts::PI, thread};

use evalfunc::{
    CompileError, ComplexNumber, Degradation, EvalFunction, ExternalCell,
    interpreter::{
        function::core::{BinaryFunction, FunctionRegistry, UnaryFunction},
        program::{ArithmeticOp, CompareOp, MAX_STACK_DEPTH, Operation, VectorOp},
    },
    status::{StatusHandler, TracingStatusHandler},
};

fn complex_unit(src: &str) -> EvalFunction {
    let mut f = EvalFunction::new();
    f.define_argument("z", 1, 1, true).unwrap();
    f.define_argument("x", 2, 1, false).unwrap();
    f.parse(src)
     .unwrap_or_else(|e| panic!("Formula '{src}' failed to compile: {e}"));
    f
}

fn c(real: f64, imaginary: f64) -> ComplexNumber {
    ComplexNumber::new(real, imaginary)
}

fn assert_close(actual: ComplexNumber, expected: ComplexNumber) {
    assert!((actual - expected).abs() < 1e-12,
            "got {actual}, expected {expected}");
}

#[test]
fn complex_square_of_imaginary_unit() {
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, true).unwrap();
    f.parse("x*x").unwrap();

    assert!(f.is_complex());
    assert_eq!(f.eval_complex(&[c(0.0, 1.0)]), c(-1.0, 0.0));
}

#[test]
fn imaginary_unit_literal() {
    let f: EvalFunction = "I * I".parse().unwrap();
    assert!(f.is_complex());
    assert_eq!(f.eval_complex(&[]), c(-1.0, 0.0));

    let (value, report) = f.eval_complex_with_report(&[]);
    assert_eq!(value, c(-1.0, 0.0));
    assert!(report.is_clean());

    let f: EvalFunction = "2 + 3 * I".parse().unwrap();
    assert_eq!(f.eval_complex(&[]), c(2.0, 3.0));
}

#[test]
fn imaginary_unit_in_real_domain_is_degraded() {
    let f: EvalFunction = "1 + I".parse().unwrap();
    let (value, report) = f.eval_with_report(&[]);

    assert_eq!(value, 1.0);
    assert_eq!(report.count(), 1);
    assert_eq!(report.first(), Some(Degradation::ImaginaryInRealDomain));
}

#[test]
fn complex_elementary_functions() {
    assert_close("exp(I * pi)".parse::<EvalFunction>().unwrap().eval_complex(&[]),
                 c(-1.0, 0.0));
    assert_close(complex_unit("sqrt(z)").eval_complex(&[c(-4.0, 0.0), c(0.0, 0.0)]),
                 c(0.0, 2.0));
    assert_close(complex_unit("log(z)").eval_complex(&[c(-1.0, 0.0), c(0.0, 0.0)]),
                 c(0.0, PI));
    assert_close(complex_unit("abs(z)").eval_complex(&[c(3.0, 4.0), c(0.0, 0.0)]),
                 c(5.0, 0.0));
    assert_close(complex_unit("cos(z) * cos(z) + sin(z) * sin(z)").eval_complex(&[c(1.0, 1.0),
                                                                                 c(0.0, 0.0)]),
                 c(1.0, 0.0));
}

#[test]
fn real_arguments_in_complex_domain() {
    let f = complex_unit("z + x");
    assert_eq!(f.eval_complex(&[c(1.0, 2.0), c(3.0, 0.0)]), c(4.0, 2.0));
}

#[test]
fn complex_result_type_inference() {
    assert!(complex_unit("z + 1").is_complex());
    assert!(complex_unit("abs(z)").is_complex());
    assert!(!complex_unit("sign(z)").is_complex());
    assert!(!complex_unit("x * 2").is_complex());

    let f = complex_unit("z > 0");
    assert!(f.is_bool());
    assert!(!f.is_complex());
}

#[test]
fn complex_comparison_substitutes_zero() {
    let f = complex_unit("z > -1");

    let (value, report) = f.eval_complex_with_report(&[c(5.0, 1.0), c(0.0, 0.0)]);
    // 0 > -1
    assert_eq!(value, c(1.0, 0.0));
    assert_eq!(report.first(), Some(Degradation::ComplexComparison));

    let f = complex_unit("z > 1");
    let (value, report) = f.eval_complex_with_report(&[c(5.0, 1.0), c(0.0, 0.0)]);
    assert_eq!(value, c(0.0, 0.0));
    assert_eq!(report.count(), 1);

    let (value, report) = f.eval_complex_with_report(&[c(5.0, 0.0), c(0.0, 0.0)]);
    assert_eq!(value, c(1.0, 0.0));
    assert!(report.is_clean());
}

#[test]
fn complex_condition_tests_real_part() {
    let f = complex_unit("z and 1");
    let (value, report) = f.eval_complex_with_report(&[c(0.0, 0.5), c(0.0, 0.0)]);
    assert_eq!(value, c(0.0, 0.0));
    assert_eq!(report.first(), Some(Degradation::ComplexCondition));

    let f = complex_unit("not z");
    let (value, report) = f.eval_complex_with_report(&[c(1.0, 2.0), c(0.0, 0.0)]);
    assert_eq!(value, c(0.0, 0.0));
    assert_eq!(report.first(), Some(Degradation::ComplexCondition));
}

#[test]
fn real_only_function_uses_real_part() {
    let f = complex_unit("sign(z)");
    let (value, report) = f.eval_complex_with_report(&[c(-3.0, 1.0), c(0.0, 0.0)]);
    assert_eq!(value, c(-1.0, 0.0));
    assert_eq!(report.first(),
               Some(Degradation::ComplexFunctionArgument { function: "sign" }));

    let f = complex_unit("atan2(z, 1)");
    let (_, report) = f.eval_complex_with_report(&[c(1.0, 1.0), c(0.0, 0.0)]);
    assert_eq!(report.first(),
               Some(Degradation::ComplexFunctionArgument { function: "atan2" }));

    let (value, report) = f.eval_complex_with_report(&[c(1.0, 0.0), c(0.0, 0.0)]);
    assert_close(value, c(PI / 4.0, 0.0));
    assert!(report.is_clean());
}

#[test]
fn degradations_are_counted_per_evaluation() {
    let f = complex_unit("(z > 0) + (z < 0) + sign(z)");
    let (_, report) = f.eval_complex_with_report(&[c(1.0, 1.0), c(0.0, 0.0)]);
    assert_eq!(report.count(), 3);
    assert_eq!(report.first(), Some(Degradation::ComplexComparison));

    let (_, report) = f.eval_complex_with_report(&[c(1.0, 0.0), c(0.0, 0.0)]);
    assert!(report.is_clean());
}

#[test]
fn complex_vectors() {
    let mut f = EvalFunction::new();
    f.define_argument("v", 1, 2, true).unwrap();
    f.parse("v * I + 1").unwrap();

    assert_eq!(f.dimension(), 2);
    let mut out = [ComplexNumber::default(); 2];
    f.eval_complex_vector(&[c(1.0, 0.0), c(0.0, 1.0)], &mut out);
    assert_eq!(out, [c(1.0, 1.0), c(0.0, 0.0)]);

    f.parse("v * v").unwrap();
    assert_eq!(f.eval_complex(&[c(1.0, 1.0), c(0.0, 1.0)]), c(-1.0, 2.0));
}

#[test]
fn stack_depth_is_limited() {
    let mut f = EvalFunction::new();
    f.define_argument("v", 1, 200, false).unwrap();
    f.define_argument("w", 201, 100, false).unwrap();

    assert!(f.parse("v * 2").is_ok());
    assert!(matches!(f.parse("v + w"),
                     Err(CompileError::StackOverflow { depth: 257,
                                                       limit: MAX_STACK_DEPTH, })));
    assert!(!f.is_compiled());
}

#[test]
fn concurrent_evaluation() {
    let g = ExternalCell::new(3.0);
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();
    f.define_external("g", &g).unwrap();
    f.parse("x * x + g").unwrap();

    let f = &f;
    thread::scope(|scope| {
        for t in 0..4 {
            scope.spawn(move || {
                     for i in 0..1000 {
                         let x = f64::from(t * 1000 + i);
                         assert_eq!(f.eval(&[x]), x * x + 3.0);
                     }
                 });
        }
    });
}

#[test]
fn low_level_append() {
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();

    f.append_argument(1).unwrap();
    f.append_constant(2.0).unwrap();
    f.append_operation(Operation::Arithmetic(ArithmeticOp::Mul)).unwrap();
    f.append_function(UnaryFunction::new("inc", |x| x + 1.0)).unwrap();

    assert!(f.is_compiled());
    assert!(!f.is_constant());
    assert_eq!(f.dimension(), 1);
    assert_eq!(f.eval(&[4.0]), 9.0);

    f.append_constant(5.0).unwrap();
    f.append_operation(Operation::Compare(CompareOp::Greater)).unwrap();
    assert!(f.is_bool());
    assert_eq!(f.eval(&[4.0]), 1.0);
    assert_eq!(f.eval(&[1.0]), 0.0);

    f.append_operation(Operation::End).unwrap();
    assert!(matches!(f.append_constant(1.0), Err(CompileError::ProgramEnded { .. })));
    assert_eq!(f.eval(&[4.0]), 1.0);
}

#[test]
fn low_level_append_checks_the_stack() {
    let mut f = EvalFunction::new();
    assert!(matches!(f.append_operation(Operation::Arithmetic(ArithmeticOp::Add)),
                     Err(CompileError::StackUnderflow { needed:    2,
                                                        available: 0,
                                                        .. })));
    assert!(matches!(f.append_argument(0), Err(CompileError::InvalidSlot { slot: 0 })));
    assert!(f.program().is_empty());

    for _ in 0..MAX_STACK_DEPTH {
        f.append_constant(1.0).unwrap();
    }
    assert!(matches!(f.append_constant(1.0), Err(CompileError::StackOverflow { .. })));
    assert_eq!(f.program().len(), MAX_STACK_DEPTH);
}

#[test]
fn low_level_vectors_externals_and_binary_functions() {
    let cell = ExternalCell::new(10.0);
    let mut f = EvalFunction::new();
    f.append_argument(1).unwrap();
    f.append_argument(2).unwrap();
    f.append_external("scale", &cell).unwrap();
    f.append_operation(Operation::Vector { op:    VectorOp::VecScalarMul,
                                           left:  2,
                                           right: 1, })
     .unwrap();
    assert_eq!(f.dimension(), 2);

    let mut out = [0.0; 2];
    f.eval_vector(&[1.0, 2.0], &mut out);
    assert_eq!(out, [10.0, 20.0]);
    assert!(f.trace().contains("(x2 * scale)"));

    f.append_binary_function(BinaryFunction::new("hypot", f64::hypot)).unwrap();
    assert_eq!(f.dimension(), 1);
    cell.set(1.0);
    assert_eq!(f.eval(&[3.0, 4.0]), 5.0);

    let mut g = EvalFunction::new();
    g.append_constant(1.0).unwrap();
    g.append_constant(2.0).unwrap();
    assert!(matches!(g.append_operation(Operation::Vector { op:    VectorOp::ScalarVecMul,
                                                            left:  2,
                                                            right: 0, }),
                     Err(CompileError::InvalidVectorStep { .. })));
}

#[test]
fn low_level_imaginary_marks_complex() {
    let mut f = EvalFunction::new();
    f.append_operation(Operation::Imaginary).unwrap();
    f.append_operation(Operation::Negate).unwrap();
    assert!(f.is_complex());
    assert_eq!(f.eval_complex(&[]), c(0.0, -1.0));
}

#[test]
fn custom_function_registry() {
    let registry = FunctionRegistry::standard().with_unary(UnaryFunction::new("cube", |x| x * x * x));
    let mut f = EvalFunction::new().with_functions(registry);
    f.parse("cube(2) + sin(0)").unwrap();
    assert_eq!(f.eval(&[]), 8.0);
    assert!(f.functions().len() > 1);

    let mut f = EvalFunction::new().with_functions(FunctionRegistry::empty());
    assert!(matches!(f.parse("sin(1)"), Err(CompileError::UnknownIdentifier { .. })));
}

#[test]
fn programs_with_same_named_functions_differ_by_implementation() {
    fn double(x: f64) -> f64 {
        2.0 * x
    }
    fn halve(x: f64) -> f64 {
        x / 2.0
    }

    let compile = |registry: &FunctionRegistry| {
        let mut f = EvalFunction::new().with_functions(registry.clone());
        f.parse("scale(4)").unwrap();
        f
    };
    let doubling = FunctionRegistry::empty().with_unary(UnaryFunction::new("scale", double));
    let halving = FunctionRegistry::empty().with_unary(UnaryFunction::new("scale", halve));

    let a = compile(&doubling);
    let b = compile(&halving);
    assert_eq!(a.eval(&[]), 8.0);
    assert_eq!(b.eval(&[]), 2.0);
    assert_ne!(a.program(), b.program());
    assert_eq!(a.program(), compile(&doubling).program());
}

#[test]
fn status_handler_tracks_nested_phases() {
    let status = TracingStatusHandler::default();
    assert_eq!(status.status(), (String::new(), 0.0));

    status.push_status("outer");
    status.push_status("inner");
    status.set_percentage(25.0);
    assert_eq!(status.status(), ("inner".to_string(), 25.0));

    status.pop_status();
    assert_eq!(status.status().0, "outer");
    status.pop_status();
    status.pop_status();
    assert_eq!(status.status().0, "");

    assert!(!status.should_terminate());
    status.set_terminate();
    assert!(status.should_terminate());
    status.unset_terminate();
    assert!(!status.should_terminate());
}
