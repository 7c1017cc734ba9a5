use exprcalc::evaluate;

fn main() {
    pretty_env_logger::init();

    for expression in ["2 + 3 * 4", "sin(pi / 6) ** 2", "log(1024, 2)", "factorial(2.5)"] {
        match evaluate(expression) {
            Ok(result) => println!("{} = {:?}", expression, result),
            Err(err) => println!("{}: {}", expression, err),
        }
    }
}
