//! The built-in constant and function library
//!
//! One process-wide, read-only table shared by the variable extractor and
//! the evaluator, so the reserved-name set cannot drift between them.
//! Names are case-sensitive: `sqrt` is a function, `SQRT` is a free
//! variable.

use ahash::AHashMap;
use std::sync::OnceLock;

/// Function implementation signature
///
/// Implementations are total over their (arity-checked) inputs; domain
/// errors such as `sqrt(-1)` produce NaN, which the evaluator's final
/// guard reports as a non-finite result.
pub type FunctionImpl = fn(&[f64]) -> f64;

/// Function definition
pub struct FunctionDef {
    /// Function name
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// The constant/function library
pub struct Library {
    constants: AHashMap<&'static str, f64>,
    functions: AHashMap<&'static str, FunctionDef>,
}

/// Global library (lazily initialized)
static LIBRARY: OnceLock<Library> = OnceLock::new();

/// Get the process-wide library
pub fn library() -> &'static Library {
    LIBRARY.get_or_init(Library::new)
}

impl Library {
    fn new() -> Self {
        let mut library = Self {
            constants: AHashMap::new(),
            functions: AHashMap::new(),
        };

        library.constants.insert("PI", std::f64::consts::PI);
        library.constants.insert("E", std::f64::consts::E);

        // sin
        library.register(FunctionDef {
            name: "sin",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_sin,
        });

        // cos
        library.register(FunctionDef {
            name: "cos",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_cos,
        });

        // tan
        library.register(FunctionDef {
            name: "tan",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_tan,
        });

        // log: natural log, or log(x, base)
        library.register(FunctionDef {
            name: "log",
            min_args: 1,
            max_args: Some(2),
            implementation: fn_log,
        });

        // abs
        library.register(FunctionDef {
            name: "abs",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_abs,
        });

        // sqrt
        library.register(FunctionDef {
            name: "sqrt",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_sqrt,
        });

        // pow
        library.register(FunctionDef {
            name: "pow",
            min_args: 2,
            max_args: Some(2),
            implementation: fn_pow,
        });

        // round: round(x), or round(x, digits)
        library.register(FunctionDef {
            name: "round",
            min_args: 1,
            max_args: Some(2),
            implementation: fn_round,
        });

        // floor
        library.register(FunctionDef {
            name: "floor",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_floor,
        });

        // ceil
        library.register(FunctionDef {
            name: "ceil",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_ceil,
        });

        // min (variadic)
        library.register(FunctionDef {
            name: "min",
            min_args: 2,
            max_args: None,
            implementation: fn_min,
        });

        // max (variadic)
        library.register(FunctionDef {
            name: "max",
            min_args: 2,
            max_args: None,
            implementation: fn_max,
        });

        library
    }

    fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    /// Look up a constant by name
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Whether a name is reserved (constant or function)
    pub fn is_reserved(&self, name: &str) -> bool {
        self.constants.contains_key(name) || self.functions.contains_key(name)
    }
}

fn fn_sin(args: &[f64]) -> f64 {
    args[0].sin()
}

fn fn_cos(args: &[f64]) -> f64 {
    args[0].cos()
}

fn fn_tan(args: &[f64]) -> f64 {
    args[0].tan()
}

fn fn_log(args: &[f64]) -> f64 {
    match args {
        [x] => x.ln(),
        [x, base] => x.log(*base),
        _ => unreachable!("arity checked by the evaluator"),
    }
}

fn fn_abs(args: &[f64]) -> f64 {
    args[0].abs()
}

fn fn_sqrt(args: &[f64]) -> f64 {
    args[0].sqrt()
}

fn fn_pow(args: &[f64]) -> f64 {
    args[0].powf(args[1])
}

/// Round half away from zero, optionally to a number of decimal digits
fn fn_round(args: &[f64]) -> f64 {
    match args {
        [x] => x.round(),
        [x, digits] => {
            let factor = 10f64.powi(digits.trunc() as i32);
            (x * factor).round() / factor
        }
        _ => unreachable!("arity checked by the evaluator"),
    }
}

fn fn_floor(args: &[f64]) -> f64 {
    args[0].floor()
}

fn fn_ceil(args: &[f64]) -> f64 {
    args[0].ceil()
}

fn fn_min(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fn_max(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
