use std::{fmt::Display, fs, process};

use clap::Parser;
use evalfunc::{
    ComplexNumber, EvalFunction, ExternalCell,
    interpreter::evaluator::core::DEFAULT_TOLERANCE,
    status::{StatusHandler, TracingStatusHandler},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// evalfunc compiles a formula once and evaluates it at any number of points.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells evalfunc to read the formula from a file instead of the command
    /// line.
    #[arg(short, long)]
    file: bool,

    /// Declares an argument. Slots are assigned in the order the arguments
    /// are given.
    #[arg(short, long = "arg", value_name = "NAME[:WIDTH][:complex]", value_parser = parse_argument)]
    arguments: Vec<ArgumentSpec>,

    /// Defines a named constant.
    #[arg(short, long = "const", value_name = "NAME=VALUE", value_parser = parse_binding)]
    constants: Vec<(String, f64)>,

    /// Defines an external variable with its initial value.
    #[arg(short, long = "external", value_name = "NAME=VALUE", value_parser = parse_binding)]
    externals: Vec<(String, f64)>,

    /// A point to evaluate at, as comma separated input slots. Complex
    /// components are written `re:im`.
    #[arg(short, long = "point", value_name = "X1,X2,...")]
    points: Vec<String>,

    /// Evaluates in the complex domain.
    #[arg(long)]
    complex: bool,

    /// Prints the compiled program before evaluating.
    #[arg(short, long)]
    trace: bool,

    /// Values at or below the tolerance count as false.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    contents: String,
}

#[derive(Debug, Clone)]
struct ArgumentSpec {
    name:       String,
    width:      usize,
    is_complex: bool,
}

fn parse_argument(text: &str) -> Result<ArgumentSpec, String> {
    let mut parts = text.split(':');
    let name = parts.next().unwrap_or_default().to_string();
    let mut argument = ArgumentSpec { name,
                                      width: 1,
                                      is_complex: false };
    for part in parts {
        if part == "complex" {
            argument.is_complex = true;
        } else {
            argument.width = part.parse()
                                 .map_err(|_| format!("invalid width '{part}' in '{text}'"))?;
        }
    }
    Ok(argument)
}

fn parse_binding(text: &str) -> Result<(String, f64), String> {
    let (name, value) = text.split_once('=')
                            .ok_or_else(|| format!("expected NAME=VALUE, found '{text}'"))?;
    let value = value.trim()
                     .parse()
                     .map_err(|_| format!("invalid value '{value}' for '{name}'"))?;
    Ok((name.trim().to_string(), value))
}

fn parse_real(text: &str) -> Result<f64, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("invalid number '{text}'"))
}

fn parse_complex(text: &str) -> Result<ComplexNumber, String> {
    match text.split_once(':') {
        Some((real, imaginary)) => Ok(ComplexNumber::new(parse_real(real)?, parse_real(imaginary)?)),
        None => parse_real(text).map(ComplexNumber::from),
    }
}

fn parse_point<T>(text: &str, component: fn(&str) -> Result<T, String>) -> Result<Vec<T>, String> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',').map(component).collect()
}

fn format_values<T: Display>(values: &[T]) -> String {
    if let [value] = values {
        return value.to_string();
    }
    let components: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", components.join(", "))
}

fn fail(message: impl Display) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn compile(args: &Args, source: &str) -> (EvalFunction, Vec<ExternalCell>) {
    let mut function = EvalFunction::new().with_tolerance(args.tolerance);

    let mut slot = 1;
    for argument in &args.arguments {
        function.define_argument(&argument.name, slot, argument.width, argument.is_complex)
                .unwrap_or_else(|e| fail(e));
        slot += argument.width;
    }
    for (name, value) in &args.constants {
        function.define_constant(name, *value).unwrap_or_else(|e| fail(e));
    }
    let cells: Vec<ExternalCell> = args.externals
                                       .iter()
                                       .map(|(name, value)| {
                                           let cell = ExternalCell::new(*value);
                                           function.define_external(name, &cell)
                                                   .unwrap_or_else(|e| fail(e));
                                           cell
                                       })
                                       .collect();

    function.parse(source).unwrap_or_else(|e| fail(e));
    (function, cells)
}

fn evaluate<T: Copy + Default + Display>(function: &EvalFunction,
                                         points: &[Vec<T>],
                                         eval: fn(&EvalFunction, &[T], &mut [T]),
                                         status: &dyn StatusHandler) {
    let mut output = vec![T::default(); function.dimension()];

    status.push_status("evaluating");
    for (index, point) in points.iter().enumerate() {
        if status.should_terminate() {
            break;
        }
        if point.len() < function.required_inputs() {
            fail(format!("point {} has {} component(s), the formula needs {}",
                         index + 1,
                         point.len(),
                         function.required_inputs()));
        }
        eval(function, point, &mut output);
        println!("{}", format_values(&output));

        #[allow(clippy::cast_precision_loss)]
        status.set_percentage(100.0 * (index + 1) as f64 / points.len() as f64);
    }
    status.pop_status();
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                 EnvFilter::new("warn")
                                             }))
                             .with_target(false)
                             .init();

    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            fail(format!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                         &args.contents))
        })
    } else {
        args.contents.clone()
    };

    let (function, cells) = compile(&args, &source);
    debug!(externals = cells.len(),
           dimension = function.dimension(),
           constant = function.is_constant(),
           "formula ready");

    if args.trace {
        print!("{}", function.trace());
    }

    let status = TracingStatusHandler::default();
    let zeros = vec!["0"; function.required_inputs()].join(",");
    let points = if args.points.is_empty() {
        vec![zeros]
    } else {
        args.points.clone()
    };

    if args.complex {
        let points: Vec<Vec<ComplexNumber>> =
            points.iter()
                  .map(|p| parse_point(p, parse_complex).unwrap_or_else(|e| fail(e)))
                  .collect();
        evaluate(&function, &points, EvalFunction::eval_complex_vector, &status);
    } else {
        let points: Vec<Vec<f64>> = points.iter()
                                          .map(|p| parse_point(p, parse_real).unwrap_or_else(|e| fail(e)))
                                          .collect();
        evaluate(&function, &points, EvalFunction::eval_vector, &status);
    }
}
