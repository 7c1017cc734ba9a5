use crate::evaluate;
use clap::Parser;
use log::debug;
use std::ffi::OsString;
use std::io::{self, Write};

pub const USAGE: &str = "Usage: exprcalc <expression>\n  exprcalc \"sin(pi/2) + 1\"";

/// Exit status for a failed evaluation.
pub const EXIT_FAILURE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "exprcalc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Safe arithmetic expression calculator", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Args {
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Joined with single spaces into one expression.
    #[arg(
        value_name = "EXPRESSION",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        allow_negative_numbers = true
    )]
    pub expression: Vec<String>,
}

impl Args {
    /// The expression to evaluate, or `None` when usage should be shown.
    pub fn expression(&self) -> Option<String> {
        if self.help || self.expression.is_empty() {
            None
        } else {
            Some(self.expression.join(" "))
        }
    }
}

/// Runs the calculator on `args` (program name first) and returns the exit status.
pub fn run<I, T>(args: I, stdout: &mut impl Write, stderr: &mut impl Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    execute(args, stdout, stderr).unwrap_or(1)
}

fn execute<I, T>(args: I, stdout: &mut impl Write, stderr: &mut impl Write) -> io::Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        // --version lands here too, on stdout with status 0
        Err(error) if !error.use_stderr() => {
            write!(stdout, "{}", error.render())?;
            return Ok(0);
        }
        Err(error) => {
            write!(stderr, "{}", error.render())?;
            return Ok(EXIT_FAILURE);
        }
    };

    let Some(expression) = args.expression() else {
        writeln!(stdout, "{}", USAGE)?;
        return Ok(0);
    };

    debug!("Evaluating {:?}", expression);
    match evaluate(&expression) {
        Ok(value) => {
            writeln!(stdout, "{:?}", value)?;
            Ok(0)
        }
        Err(error) => {
            writeln!(stderr, "error: {}", error)?;
            Ok(EXIT_FAILURE)
        }
    }
}
