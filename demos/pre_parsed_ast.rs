use exprcalc::{parse, Evaluator, Expr};

fn main() {
    pretty_env_logger::init();

    let ast = parse("hypot(3, 4) * tau").expect("Failed to parse");
    println!("AST: {:#?}", ast);

    let evaluator = Evaluator::default();
    let whitelist = evaluator.whitelist();
    println!("Constants: {}", whitelist.constant_names().join(", "));
    println!("Functions: {}", whitelist.function_names().join(", "));

    // A tree built by hand can name anything.
    let function = "print";
    if !whitelist.contains(function) {
        let unchecked = Expr::call(function, vec![Expr::number(1.0)]);
        println!("{:?} would fail: {:?}", unchecked, evaluator.evaluate(&unchecked));
    }

    match evaluator.evaluate(&ast) {
        Ok(result) => println!("Result: {:?}", result),
        Err(err) => println!("Error: {}", err),
    }
}
