use exprcalc::evaluate_batch;

fn main() {
    pretty_env_logger::init();

    let expressions: Vec<String> = (1..=10)
        .map(|n| format!("comb({}, 3) / sqrt({})", n * 10, n))
        .collect();

    for (expression, result) in expressions.iter().zip(evaluate_batch(&expressions)) {
        match result {
            Ok(value) => println!("{} = {:?}", expression, value),
            Err(err) => println!("{}: {}", expression, err),
        }
    }
}
