use exprcalc::cli;
use std::io;

fn main() {
    pretty_env_logger::init();

    let code = cli::run(
        std::env::args_os(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    std::process::exit(code);
}
