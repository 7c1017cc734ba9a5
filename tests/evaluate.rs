use exprcalc::{evaluate, parse, Arity, Error, EvaluationError, Evaluator, Whitelist};
use std::f64::consts::PI;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn assert_approx(expression: &str, expected: f64) {
    let actual = evaluate(expression).unwrap();
    assert!(
        (actual - expected).abs() <= 1e-12 * expected.abs().max(1.0),
        "{} evaluated to {}, expected {}",
        expression,
        actual,
        expected
    );
}

#[test]
fn test_basic_expressions() {
    let cases = [
        ("1", 1.0),
        ("2+3*4", 14.0),
        ("(2+3)*4", 20.0),
        ("sin(pi/2)", 1.0),
        ("sin(pi/6)**2", (PI / 6.0).sin().powi(2)),
        ("sqrt(2)**2", 2.0),
        ("log(e)", 1.0),
        ("2*(3+4)-5/2", 11.5),
    ];
    for (expression, expected) in cases {
        assert_approx(expression, expected);
    }
}

#[test]
fn test_operator_semantics() {
    assert_eq!(evaluate("2**3**2"), Ok(512.0));
    assert_eq!(evaluate("-2**2"), Ok(-4.0));
    assert_eq!(evaluate("(-2)**2"), Ok(4.0));
    assert_eq!(evaluate("2**-1"), Ok(0.5));
    assert_eq!(evaluate("7 % -3"), Ok(1.0));
    assert_eq!(evaluate("-7 % 3"), Ok(-1.0));
    assert_eq!(evaluate("--+-3"), Ok(-3.0));
    assert_eq!(evaluate("1/0"), Ok(f64::INFINITY));
    assert_eq!(evaluate("-1/0"), Ok(f64::NEG_INFINITY));
    assert!(evaluate("0/0").unwrap().is_nan());
    assert!(evaluate("(-8)**(1/3)").unwrap().is_nan());
}

#[test]
fn test_whitelisted_functions() {
    assert_approx("log(8, 2)", 3.0);
    assert_eq!(evaluate("hypot(3, 4)"), Ok(5.0));
    assert_eq!(evaluate("factorial(5)"), Ok(120.0));
    assert_eq!(evaluate("gcd(12, 18, 27)"), Ok(3.0));
    assert_eq!(evaluate("isclose(0.1 + 0.2, 0.3)"), Ok(1.0));
    assert_eq!(evaluate("isnan(nan)"), Ok(1.0));
    assert_approx("degrees(tau)", 360.0);
    assert_approx("gamma(0.5)**2", PI);
}

#[test]
fn test_numeric_literals() {
    assert_eq!(evaluate("1_000 + 0x10"), Ok(1016.0));
    assert_eq!(evaluate("0b101 * 0o7"), Ok(35.0));
    assert_eq!(evaluate(".5 + 1."), Ok(1.5));
    assert_eq!(evaluate("1e-3 * 1E3"), Ok(1.0));
}

#[test]
fn test_unknown_names() {
    assert_eq!(
        evaluate("unknown_func(2)"),
        Err(Error::NameNotFound("unknown_func".to_string()))
    );
    assert_eq!(
        evaluate("x + 1"),
        Err(Error::NameNotFound("x".to_string()))
    );
    // functions are not values
    assert_eq!(
        evaluate("sin"),
        Err(Error::NameNotFound("sin".to_string()))
    );
}

#[test]
fn test_unsupported_syntax() {
    for expression in [
        "(lambda x: x)(2)",
        "7 // 2",
        "log(x=1)",
        "math.sin(0)",
        "'hi'",
        "[1, 2, 3]",
        "(1, 2)",
        "{1: 2}",
        "1 if 1 else 0",
        "1 < 2",
        "1 and 0",
        "not 1",
        "~1",
        "1 << 2",
        "True",
        "None",
        "2j",
        "abs(1)[0]",
        "[x for x in y]",
        "sin(x for x in y)",
        "{x: 1 for x in y if x}",
        "sin(*x)",
        "sin(**x)",
        "abs(1)[1:2]",
        "(x := 1)",
    ] {
        assert!(
            matches!(evaluate(expression), Err(Error::UnsupportedSyntax(_))),
            "{} should be rejected, got {:?}",
            expression,
            evaluate(expression)
        );
    }
}

#[test]
fn test_syntax_errors() {
    for expression in ["", "1 +", "(1", "2 ** ", "sin(", "1 2", "3 $ 4"] {
        assert!(
            matches!(evaluate(expression), Err(Error::Syntax { .. })),
            "{:?} should not parse, got {:?}",
            expression,
            evaluate(expression)
        );
    }
}

#[test]
fn test_evaluation_errors() {
    assert_eq!(
        evaluate("sin(1, 2)"),
        Err(Error::Evaluation(EvaluationError::Arity {
            function: "sin",
            expected: Arity::Exactly(1),
            found: 2,
        }))
    );
    assert_eq!(
        evaluate("factorial(2.5)"),
        Err(Error::Evaluation(EvaluationError::NotIntegral {
            function: "factorial",
            value: 2.5,
        }))
    );
    assert_eq!(
        evaluate("sin(1, 2)").unwrap_err().to_string(),
        "sin() takes exactly 1 argument (2 given)"
    );
}

#[test]
fn test_integer_arguments_beyond_u64() {
    for expression in ["comb(1e20, 1)", "isqrt(1e30)", "perm(2**64)"] {
        assert!(
            matches!(
                evaluate(expression),
                Err(Error::Evaluation(EvaluationError::Domain { .. }))
            ),
            "{} should be out of range, got {:?}",
            expression,
            evaluate(expression)
        );
    }
}

#[test]
fn test_huge_permutation_finishes() {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(evaluate("perm(1e18)"));
    });
    let result = receiver
        .recv_timeout(Duration::from_secs(5))
        .expect("perm(1e18) did not finish in time");
    assert_eq!(result, Ok(f64::INFINITY));
    assert_eq!(evaluate("comb(1e18, 5e17)"), Ok(f64::INFINITY));
}

#[test]
fn test_math_domain_follows_ieee() {
    assert!(evaluate("sqrt(-1)").unwrap().is_nan());
    assert_eq!(evaluate("log(0)"), Ok(f64::NEG_INFINITY));
    assert!(evaluate("asin(2)").unwrap().is_nan());
    assert_eq!(evaluate("exp(1000)"), Ok(f64::INFINITY));
}

#[test]
fn test_idempotent() {
    for expression in ["sin(pi/3) * 2 + 1", "comb(30, 7) / 3", "nan", "lambda: 0"] {
        let first = evaluate(expression);
        let second = evaluate(expression);
        match (&first, &second) {
            (Ok(a), Ok(b)) if a.is_nan() => assert!(b.is_nan()),
            _ => assert_eq!(first, second),
        }
    }
}

#[test]
fn test_parse_then_evaluate_matches_evaluate() {
    let expression = "atan2(1, 1) * 4 - pi";
    let ast = parse(expression).unwrap();
    let evaluator = Evaluator::new(Whitelist::global());
    assert_eq!(evaluator.evaluate(&ast), evaluate(expression));
    // the tree is reusable
    assert_eq!(evaluator.evaluate(&ast), evaluator.evaluate(&ast));
}

#[test]
fn test_evaluator_exposes_its_whitelist() {
    let evaluator = Evaluator::default();
    let whitelist = evaluator.whitelist();
    assert!(std::ptr::eq(whitelist, Whitelist::global()));
    for name in ["sin", "pi", "isqrt"] {
        assert!(whitelist.contains(name), "{} should be whitelisted", name);
    }
    for name in ["print", "__import__", "math"] {
        assert!(!whitelist.contains(name), "{} should not be whitelisted", name);
    }
}

#[test]
fn test_syntax_error_reports_position() {
    match evaluate("1 +\n  * 2") {
        Err(Error::Syntax { line, column, .. }) => {
            assert_eq!(line, 2);
            assert!(column > 1);
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}
