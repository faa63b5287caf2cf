use std::f64::consts::{FRAC_PI_4, PI};

use evalfunc::{
    CompileError, EvalFunction, ExternalCell, interpreter::parser::core::MAX_NESTING_DEPTH,
};

fn compiled(src: &str) -> EvalFunction {
    src.parse()
       .unwrap_or_else(|e| panic!("Formula '{src}' failed to compile: {e}"))
}

fn assert_value(src: &str, expected: f64) {
    let value = compiled(src).eval(&[]);
    assert!((value - expected).abs() < 1e-12,
            "'{src}' evaluated to {value}, expected {expected}");
}

fn assert_failure(src: &str) -> CompileError {
    match src.parse::<EvalFunction>() {
        Ok(_) => panic!("Formula '{src}' compiled but was expected to fail"),
        Err(e) => e,
    }
}

/// A unit with `x` at slot 1, `v` (width 3) at slots 2-4 and `w` (width 2) at
/// slots 5-6.
fn with_arguments(src: &str) -> EvalFunction {
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();
    f.define_argument("v", 2, 3, false).unwrap();
    f.define_argument("w", 5, 2, false).unwrap();
    f.parse(src)
     .unwrap_or_else(|e| panic!("Formula '{src}' failed to compile: {e}"));
    f
}

const INPUT: [f64; 6] = [7.0, 1.0, 2.0, 3.0, 10.0, 20.0];

fn vector_value(src: &str) -> Vec<f64> {
    let f = with_arguments(src);
    let mut out = vec![0.0; f.dimension()];
    f.eval_vector(&INPUT, &mut out);
    out
}

#[test]
fn literal_arithmetic() {
    assert_value("2*3+4", 10.0);
    assert_value("(1+2)*3", 9.0);
    assert_value("1 + 2 * 3", 7.0);
    assert_value("1 - 2 - 3", -4.0);
    assert_value("12 / 4 / 3", 1.0);
    assert_value("10 / 4", 2.5);
    assert_value("-2 * 3", -6.0);
    assert_value("--2", 2.0);
    assert_value("2 * -3", -6.0);
}

#[test]
fn numeric_literal_forms() {
    assert_value("12", 12.0);
    assert_value("1.5", 1.5);
    assert_value(".5", 0.5);
    assert_value("2.", 2.0);
    assert_value("1e-3 * 1000", 1.0);
    assert_value("2.5E+4", 25_000.0);
}

#[test]
fn whitespace_and_newlines_are_ignored() {
    assert_value("  1 +\n\t2\r\n*  3 ", 7.0);
}

#[test]
fn argument_binding() {
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();
    f.parse("x*x").unwrap();

    assert_eq!(f.eval(&[3.0]), 9.0);
    assert_eq!(f.eval(&[-2.0]), 4.0);
    assert_eq!(f.required_inputs(), 1);
}

#[test]
fn arguments_read_their_own_slots() {
    let mut f = EvalFunction::new();
    f.define_argument("a", 2, 1, false).unwrap();
    f.define_argument("b", 1, 1, false).unwrap();
    f.parse("a - b").unwrap();

    assert_eq!(f.eval(&[1.0, 5.0]), 4.0);
}

#[test]
fn tolerance_based_truthiness() {
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();
    f.parse("x>0.5").unwrap();

    assert!(f.is_bool());
    assert_eq!(f.eval(&[0.6]), 1.0);
    assert_eq!(f.eval(&[0.4]), 0.0);
    assert_eq!(f.eval(&[0.5]), 0.0);
}

#[test]
fn comparisons() {
    assert_value("2 > 1", 1.0);
    assert_value("1 > 2", 0.0);
    assert_value("1 < 2", 1.0);
    assert_value("2 >= 2", 1.0);
    assert_value("1 >= 2", 0.0);
    assert_value("2 <= 2", 1.0);
    assert_value("3 <= 2", 0.0);
    assert_value("3 == 3", 1.0);
    assert_value("3 == 4", 0.0);
    // differences below the tolerance are equal
    assert_value("1 == 1 + 1e-15", 1.0);
    assert_value("1 + 1e-15 > 1", 0.0);
    assert_value("1 + 1e-15 >= 1", 1.0);
}

#[test]
fn comparisons_with_nan_are_false() {
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();
    for src in ["x == 5", "x >= 5", "x <= -5", "x > 5", "x < 5", "5 == x", "x == x", "x >= x"] {
        f.parse(src).unwrap();
        assert_eq!(f.eval(&[f64::NAN]), 0.0, "'{src}' with x = NaN");
    }
    f.parse("not (x == x)").unwrap();
    assert_eq!(f.eval(&[f64::NAN]), 1.0);
    assert_eq!(f.eval(&[2.0]), 0.0);

    assert_value("0/0 == 0/0", 0.0);
    assert_value("sqrt(-1) <= 0", 0.0);
    assert_value("1/0 == 1/0", 1.0);
    assert_value("1/0 >= 1", 1.0);
}

#[test]
fn comparisons_chain_left_to_right() {
    // (3 > 2) > 1  is  1 > 1
    assert_value("3 > 2 > 1", 0.0);
    // (1 < 2) == 1
    assert_value("1 < 2 == 1", 1.0);
}

#[test]
fn custom_tolerance() {
    let mut f = EvalFunction::new().with_tolerance(0.1);
    f.define_argument("x", 1, 1, false).unwrap();
    f.parse("x > 1").unwrap();

    assert_eq!(f.tolerance(), 0.1);
    assert_eq!(f.eval(&[1.05]), 0.0);
    assert_eq!(f.eval(&[1.2]), 1.0);
}

#[test]
fn boolean_operators() {
    assert_value("1 and 1", 1.0);
    assert_value("1 and 0", 0.0);
    assert_value("0 or 1", 1.0);
    assert_value("0 or 0", 0.0);
    assert_value("not 0", 1.0);
    assert_value("not 2", 0.0);
    assert_value("not -1", 1.0);
    assert_value("1e-15 or 0", 0.0);
    assert_value("1 < 2 and 3 < 4", 1.0);
    assert_value("1 > 2 or 3 > 4", 0.0);
    // and/or share one level, left to right
    assert_value("1 or 0 and 0", 0.0);
}

#[test]
fn boolean_results_feed_arithmetic() {
    let f = compiled("(2 > 1) * 5");
    assert!(!f.is_bool());
    assert_eq!(f.eval(&[]), 5.0);
}

#[test]
fn constants() {
    let mut f = EvalFunction::new();
    f.define_constant("c", 3.0).unwrap();
    f.parse("c * 2").unwrap();
    assert_eq!(f.eval(&[]), 6.0);
    assert!(f.is_constant());

    f.define_constant("c", 4.0).unwrap();
    f.parse("c * 2").unwrap();
    assert_eq!(f.eval(&[]), 8.0);

    assert_value("pi", PI);
    assert_value("2 * pi", 2.0 * PI);
}

#[test]
fn arguments_shadow_externals_and_constants() {
    let cell = ExternalCell::new(100.0);
    let mut f = EvalFunction::new();
    f.define_constant("a", 1.0).unwrap();
    f.define_external("a", &cell).unwrap();
    f.parse("a").unwrap();
    assert_eq!(f.eval(&[]), 100.0);

    f.define_argument("a", 1, 1, false).unwrap();
    f.parse("a").unwrap();
    assert_eq!(f.eval(&[5.0]), 5.0);
}

#[test]
fn names_shadow_builtin_functions() {
    let mut f = EvalFunction::new();
    f.define_constant("sin", 2.0).unwrap();
    f.parse("sin * 3").unwrap();
    assert_eq!(f.eval(&[]), 6.0);
}

#[test]
fn late_binding() {
    let g = ExternalCell::new(1.0);
    let mut f = EvalFunction::new();
    f.define_external("g", &g).unwrap();
    f.parse("g+1").unwrap();

    assert_eq!(f.eval(&[]), 2.0);
    g.set(5.0);
    assert_eq!(f.eval(&[]), 6.0);
}

#[test]
fn builtin_functions() {
    assert_value("sqrt(16)", 4.0);
    assert_value("abs(-3)", 3.0);
    assert_value("sign(-2)", -1.0);
    assert_value("sign(0)", 0.0);
    assert_value("step(-1)", 0.0);
    assert_value("step(2)", 1.0);
    assert_value("exp(0)", 1.0);
    assert_value("log(1)", 0.0);
    assert_value("sin(0) + cos(0)", 1.0);
    assert_value("tan(0)", 0.0);
    assert_value("atan(1)", FRAC_PI_4);
    assert_value("sinh(0) + cosh(0) + tanh(0)", 1.0);
    assert_value("atan2(1, 1)", FRAC_PI_4);
    assert_value("atan2(0, -1)", PI);
    assert_value("sqrt(abs(-4)) * 2", 4.0);
}

#[test]
fn bessel_functions() {
    assert!((compiled("besselj0(0)").eval(&[]) - 1.0).abs() < 1e-8);
    assert!(compiled("besselj1(0)").eval(&[]).abs() < 1e-8);
    assert!(compiled("besselj0(2.404825557695773)").eval(&[]).abs() < 1e-7);
    assert!((compiled("besselj1(1)").eval(&[]) - 0.440_050_585_744_933_5).abs() < 1e-7);
    assert!((compiled("bessely0(1)").eval(&[]) - 0.088_256_964_215_676_96).abs() < 1e-7);
    assert!((compiled("bessely1(1)").eval(&[]) + 0.781_212_821_300_288_7).abs() < 1e-7);
    assert!((compiled("besselj0(10)").eval(&[]) + 0.245_935_764_451_348_3).abs() < 1e-7);
}

#[test]
fn bessel_functions_for_large_arguments() {
    let cases = [("besselj0(8.5)", 0.041_939_251_842_934_5),
                 ("bessely0(8.5)", 0.270_205_105_365_787),
                 ("besselj0(20)", 0.167_024_664_340_583),
                 ("bessely0(20)", 0.062_640_596_809_383_8)];
    for (src, expected) in cases {
        let value = compiled(src).eval(&[]);
        assert!((value - expected).abs() < 1e-9, "'{src}' evaluated to {value}, expected {expected}");
    }
}

#[test]
fn vector_pass_through() {
    let mut f = EvalFunction::new();
    f.define_argument("v", 1, 2, false).unwrap();
    f.parse("v").unwrap();

    assert_eq!(f.dimension(), 2);
    let mut out = [0.0; 2];
    f.eval_vector(&[3.0, 4.0], &mut out);
    assert_eq!(out, [3.0, 4.0]);
    // scalar evaluation yields the first component
    assert_eq!(f.eval(&[3.0, 4.0]), 3.0);
}

#[test]
fn vector_scalar_broadcast() {
    assert_eq!(vector_value("v + x"), [8.0, 9.0, 10.0]);
    assert_eq!(vector_value("x + v"), [8.0, 9.0, 10.0]);
    assert_eq!(vector_value("v - 1"), [0.0, 1.0, 2.0]);
    assert_eq!(vector_value("1 - v"), [0.0, -1.0, -2.0]);
    assert_eq!(vector_value("v * 2"), [2.0, 4.0, 6.0]);
    assert_eq!(vector_value("2 * v"), [2.0, 4.0, 6.0]);
    assert_eq!(vector_value("v / 2"), [0.5, 1.0, 1.5]);
    assert_eq!(vector_value("-v"), [-1.0, -2.0, -3.0]);
    assert_eq!(vector_value("(v + 1) * (x - 5)"), [4.0, 6.0, 8.0]);
}

#[test]
fn vector_widths_are_zero_extended() {
    assert_eq!(vector_value("v + w"), [11.0, 22.0, 3.0]);
    assert_eq!(vector_value("w + v"), [11.0, 22.0, 3.0]);
    assert_eq!(vector_value("v - w"), [-9.0, -18.0, 3.0]);
    assert_eq!(vector_value("w - v"), [9.0, 18.0, -3.0]);
    assert_eq!(with_arguments("v + w").dimension(), 3);
}

#[test]
fn dot_product() {
    let f = with_arguments("v * v");
    assert_eq!(f.dimension(), 1);
    assert_eq!(f.eval(&INPUT), 14.0);

    // common components only
    assert_eq!(with_arguments("v * w").eval(&INPUT), 50.0);
    assert_eq!(with_arguments("(2 * v) * v + 1").eval(&INPUT), 29.0);
}

#[test]
fn vector_result_in_function_argument_is_rejected() {
    let mut f = EvalFunction::new();
    f.define_argument("v", 1, 3, false).unwrap();

    assert!(matches!(f.parse("sin(v)"),
                     Err(CompileError::ExpectedScalar { width: 3, .. })));
    assert!(matches!(f.parse("v > 1"), Err(CompileError::ExpectedScalar { .. })));
    assert!(matches!(f.parse("1 and v"), Err(CompileError::ExpectedScalar { .. })));
    assert!(matches!(f.parse("not v"), Err(CompileError::ExpectedScalar { .. })));
    assert!(f.parse("sin(v * v)").is_ok());
}

#[test]
fn division_by_vector_is_rejected() {
    let mut f = EvalFunction::new();
    f.define_argument("v", 1, 3, false).unwrap();

    let error = f.parse("1 / v").unwrap_err();
    assert!(matches!(error,
                     CompileError::VectorDivisor { width:  3,
                                                   line:   1,
                                                   column: 3, }));
    assert!(matches!(f.parse("v / v"), Err(CompileError::VectorDivisor { .. })));
}

#[test]
fn unknown_identifier_fails_deterministically() {
    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();

    for _ in 0..2 {
        let error = f.parse("x + y").unwrap_err();
        assert!(matches!(&error,
                         CompileError::UnknownIdentifier { name, line: 1, column: 5 } if name == "y"));
        assert!(!f.is_compiled());
    }
    assert!(matches!(assert_failure("foo(1)"), CompileError::UnknownIdentifier { .. }));
    // the imaginary unit is `I`, not `i`
    assert!(matches!(assert_failure("i"), CompileError::UnknownIdentifier { .. }));
}

#[test]
fn failed_compilation_discards_the_previous_program() {
    let mut f = EvalFunction::new();
    f.parse("1 + 1").unwrap();
    assert!(f.is_compiled());

    assert!(f.parse("1 +").is_err());
    assert!(!f.is_compiled());
    assert!(f.program().is_empty());
    assert_eq!(f.eval(&[]), 0.0);
}

#[test]
fn syntax_errors() {
    assert!(matches!(assert_failure("2x"), CompileError::MalformedNumber { .. }));
    assert!(matches!(assert_failure("1.2.3"), CompileError::MalformedNumber { .. }));
    assert!(matches!(assert_failure("1e+"), CompileError::MalformedNumber { .. }));
    assert!(matches!(assert_failure("3 $ 4"),
                     CompileError::UnexpectedCharacter { column: 3, .. }));
    assert!(matches!(assert_failure("3 = 4"), CompileError::UnexpectedCharacter { .. }));
    assert!(matches!(assert_failure("(1 + 2"), CompileError::ExpectedClosingParen { .. }));
    assert!(matches!(assert_failure("sin(1"), CompileError::ExpectedClosingParen { .. }));
    assert!(matches!(assert_failure("1 +"), CompileError::UnexpectedEndOfInput { .. }));
    assert!(matches!(assert_failure(""), CompileError::UnexpectedEndOfInput { .. }));
    assert!(matches!(assert_failure("1 2"), CompileError::UnexpectedTrailingTokens { .. }));
    assert!(matches!(assert_failure("(1))"), CompileError::UnexpectedTrailingTokens { .. }));
    assert!(matches!(assert_failure("* 2"), CompileError::UnexpectedToken { .. }));
    assert!(matches!(assert_failure("sin 1"), CompileError::UnexpectedToken { .. }));
    assert!(matches!(assert_failure("sin(1 2)"), CompileError::UnexpectedToken { .. }));
    assert!(matches!(assert_failure("and"), CompileError::UnexpectedToken { .. }));
}

#[test]
fn arity_errors() {
    assert!(matches!(assert_failure("sin(1, 2)"),
                     CompileError::ArityMismatch { function: "sin",
                                                   expected: 1,
                                                   found: 2,
                                                   .. }));
    assert!(matches!(assert_failure("atan2(1)"),
                     CompileError::ArityMismatch { function: "atan2",
                                                   expected: 2,
                                                   found: 1,
                                                   .. }));
    assert!(matches!(assert_failure("cos()"),
                     CompileError::ArityMismatch { found: 0, .. }));
}

#[test]
fn errors_report_line_and_column() {
    let error = assert_failure("1 +\n  2 )");
    assert!(matches!(error,
                     CompileError::UnexpectedTrailingTokens { line: 2, column: 5, .. }));
    assert_eq!(error.to_string(),
               "Error on line 2, column 5: Extra tokens after expression: ')'.");

    let error = assert_failure("1 +\n\n(2");
    assert!(matches!(error, CompileError::ExpectedClosingParen { line: 3, .. }));
    assert!(error.to_string().contains("end of input"));

    let mut f = EvalFunction::new();
    f.define_argument("v", 1, 200, false).unwrap();
    let error = f.parse("v +\n  v").unwrap_err();
    assert!(matches!(error,
                     CompileError::ExpressionTooLarge { depth: 257,
                                                        limit: 256,
                                                        line: 2,
                                                        column: 3 }));
    assert!(error.to_string().starts_with("Error on line 2, column 3:"));
    assert!(!f.is_compiled());
}

#[test]
fn nesting_depth_is_limited() {
    let depth = MAX_NESTING_DEPTH;
    assert_value(&format!("{}1{}", "(".repeat(depth), ")".repeat(depth)), 1.0);
    assert_value(&format!("{}1", "-".repeat(depth)), 1.0);
    assert_value(&format!("{}0{}", "cos(".repeat(depth), ")".repeat(depth)), {
        (0..depth).fold(0.0_f64, |x, _| x.cos())
    });

    let too_deep = |src: String, column: usize| {
        let error = assert_failure(&src);
        assert!(matches!(error,
                         CompileError::NestingTooDeep { line: 1, column: c, .. } if c == column),
                "unexpected error {error:?}");
    };
    too_deep(format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000)), depth + 1);
    too_deep(format!("{}1", "-".repeat(10_000)), depth + 1);
    too_deep(format!("{}1", "not ".repeat(10_000)), 4 * depth + 1);
    too_deep(format!("{}1", "sin(".repeat(10_000)), 4 * depth + 1);
    too_deep(format!("{}1", "(-".repeat(10_000)), depth + 1);
}

#[test]
fn invalid_definitions_are_rejected() {
    let mut f = EvalFunction::new();
    assert!(matches!(f.define_constant("and", 1.0),
                     Err(CompileError::InvalidDefinition { .. })));
    assert!(f.define_constant("1x", 1.0).is_err());
    assert!(f.define_external("a b", &ExternalCell::new(0.0)).is_err());
    assert!(f.define_argument("x", 0, 1, false).is_err());
    assert!(f.define_argument("x", 1, 0, false).is_err());
    assert!(f.define_argument("x", 1, 1000, false).is_err());
    assert!(f.symbols().arguments.is_empty());
}

#[test]
fn determinism() {
    let cell = ExternalCell::new(0.25);
    let build = || {
        let mut f = EvalFunction::new();
        f.define_argument("x", 1, 1, false).unwrap();
        f.define_argument("y", 2, 1, false).unwrap();
        f.define_external("g", &cell).unwrap();
        f.parse("sin(x) * y + g > 0.1 or x * x - y >= 3").unwrap();
        f
    };
    let a = build();
    let b = build();

    assert_eq!(a.program(), b.program());
    for i in -10..10 {
        let input = [f64::from(i) * 0.37, f64::from(i) * -0.21];
        assert_eq!(a.eval(&input), b.eval(&input));
    }
}

#[test]
fn is_constant_tracks_input_reads() {
    assert!(compiled("2 * pi + sqrt(2)").is_constant());
    assert!(compiled("I * I").is_constant());

    let mut f = EvalFunction::new();
    f.define_argument("x", 1, 1, false).unwrap();
    f.define_external("g", &ExternalCell::new(1.0)).unwrap();
    f.parse("x").unwrap();
    assert!(!f.is_constant());
    f.parse("g").unwrap();
    assert!(!f.is_constant());
    f.parse("1 + 0 * 3").unwrap();
    assert!(f.is_constant());
}

#[test]
fn parse_reader_reads_the_whole_stream() {
    let mut f = EvalFunction::new();
    f.parse_reader("1 +\n2".as_bytes()).unwrap();
    assert_eq!(f.eval(&[]), 3.0);
}

#[test]
fn trace_lists_every_step() {
    let mut f = EvalFunction::new();
    f.define_argument("v", 1, 2, false).unwrap();
    f.parse("v * 2 + 1").unwrap();

    let trace = f.trace();
    assert_eq!(trace.lines().count(), f.program().len());
    assert!(trace.contains("vsmul 2x1"));
    assert!(trace.contains("((x2 * 2) + 1)"));
    assert!(trace.lines().last().unwrap().contains("end"));
}

#[test]
fn trace_names_external_cells() {
    let speed = ExternalCell::new(3.0);
    let time = ExternalCell::new(3.0);
    let mut f = EvalFunction::new();
    f.define_external("speed", &speed).unwrap();
    f.define_external("time", &time).unwrap();
    f.parse("speed * time").unwrap();

    let trace = f.trace();
    assert!(trace.contains("extern speed"));
    assert!(trace.contains("extern time"));
    assert!(trace.contains("(speed * time)"));
}
