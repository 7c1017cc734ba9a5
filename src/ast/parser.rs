use crate::ast::{
    Argument, BinaryOperator, ComparisonOperator, ComprehensionFor, ComprehensionKind, Expr,
    Literal, LogicalOperator, UnaryOperator,
};
use crate::error::{Error, Result};
use log::debug;
use pest::error::LineColLocation;
use pest::iterators::{Pair, Pairs};
use pest::{Parser, Span};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "expression.pest"]
pub struct ExpressionParser;

/// Parses `input` into an expression tree.
///
/// The grammar accepts more than the evaluator supports (strings, lambdas,
/// attribute access, ...). Those constructs come back as their own `Expr`
/// variants; only text that is not an expression at all fails here.
pub fn parse(input: &str) -> Result<Expr> {
    ExpressionParser::parse_expression(input)
}

impl ExpressionParser {
    pub fn parse_expression(input: &str) -> Result<Expr> {
        debug!("Parsing expression: {}", input);
        let mut pairs =
            ExpressionParser::parse(Rule::expression, input).map_err(Self::syntax_error)?;
        let expression = pairs.next().ok_or_else(|| Error::Syntax {
            line: 1,
            column: 1,
            message: "expected expression".to_string(),
        })?;
        let span = expression.as_span();
        let test = next_pair(&mut expression.into_inner(), span, "expression")?;

        let tree = Self::build_test(test)?;
        debug!("Parse result: {:?}", tree);
        Ok(tree)
    }

    fn syntax_error(error: pest::error::Error<Rule>) -> Error {
        let error = error.renamed_rules(|rule| rule_label(rule).to_string());
        let (line, column) = match error.line_col {
            LineColLocation::Pos(position) => position,
            LineColLocation::Span(start, _) => start,
        };
        Error::Syntax {
            line,
            column,
            message: error.variant.message().to_string(),
        }
    }

    fn build_test(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let inner = next_pair(&mut pair.into_inner(), span, "expression")?;
        match inner.as_rule() {
            Rule::lambda_expr => Self::build_lambda(inner),
            Rule::conditional => Self::build_conditional(inner),
            _ => Err(malformed(span, "expression")),
        }
    }

    fn build_lambda(pair: Pair<Rule>) -> Result<Expr> {
        debug!("Building lambda: {:?}", pair.as_str());
        let span = pair.as_span();
        let mut params = Vec::new();
        let mut body = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::LAMBDA => {}
                Rule::lambda_params => {
                    params = inner
                        .into_inner()
                        .map(|param| param.as_str().to_string())
                        .collect();
                }
                Rule::test => body = Some(Self::build_test(inner)?),
                _ => return Err(malformed(inner.as_span(), "lambda")),
            }
        }

        let body = body.ok_or_else(|| malformed(span, "lambda"))?;
        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
        })
    }

    fn build_conditional(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let mut pairs = pair.into_inner();
        let body = Self::build_or_expression(next_pair(&mut pairs, span, "expression")?)?;

        if pairs.next().is_none() {
            return Ok(body);
        }

        debug!("Building conditional expression: {:?}", span.as_str());
        let test = Self::build_or_expression(next_pair(&mut pairs, span, "condition")?)?;
        next_pair(&mut pairs, span, "else")?;
        let orelse = Self::build_test(next_pair(&mut pairs, span, "expression")?)?;

        Ok(Expr::Conditional {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        })
    }

    fn build_or_expression(pair: Pair<Rule>) -> Result<Expr> {
        build_chain(pair, Self::build_and_expression, |left, _, right| {
            Ok(Expr::Logical {
                left: Box::new(left),
                operator: LogicalOperator::Or,
                right: Box::new(right),
            })
        })
    }

    fn build_and_expression(pair: Pair<Rule>) -> Result<Expr> {
        build_chain(pair, Self::build_not_expression, |left, _, right| {
            Ok(Expr::Logical {
                left: Box::new(left),
                operator: LogicalOperator::And,
                right: Box::new(right),
            })
        })
    }

    fn build_not_expression(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let mut pairs = pair.into_inner();
        let first = next_pair(&mut pairs, span, "expression")?;

        if first.as_rule() == Rule::NOT {
            let inner = Self::build_not_expression(next_pair(&mut pairs, span, "expression")?)?;
            return Ok(Expr::Not(Box::new(inner)));
        }

        Self::build_comparison_expression(first)
    }

    fn build_comparison_expression(pair: Pair<Rule>) -> Result<Expr> {
        build_chain(pair, Self::build_arithmetic, |left, operator_pair, right| {
            let operator = ComparisonOperator::try_from(operator_pair.as_str())
                .map_err(|message| malformed(operator_pair.as_span(), &message))?;
            Ok(Expr::Compare {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            })
        })
    }

    /// Handles every left-associative binary level from `|` down to `*`.
    fn build_arithmetic(pair: Pair<Rule>) -> Result<Expr> {
        match pair.as_rule() {
            Rule::factor => Self::build_factor(pair),
            Rule::bit_or
            | Rule::bit_xor
            | Rule::bit_and
            | Rule::shift
            | Rule::arith
            | Rule::term => build_chain(pair, Self::build_arithmetic, |left, operator_pair, right| {
                let operator = BinaryOperator::try_from(operator_pair.as_str())
                    .map_err(|message| malformed(operator_pair.as_span(), &message))?;
                Ok(Expr::binary(left, operator, right))
            }),
            _ => Err(malformed(pair.as_span(), "arithmetic expression")),
        }
    }

    fn build_factor(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let mut pairs = pair.into_inner();
        let first = next_pair(&mut pairs, span, "operand")?;

        if first.as_rule() == Rule::unary_op {
            let operator = UnaryOperator::try_from(first.as_str())
                .map_err(|message| malformed(first.as_span(), &message))?;
            let operand = Self::build_factor(next_pair(&mut pairs, span, "operand")?)?;
            return Ok(Expr::unary(operator, operand));
        }

        Self::build_power(first)
    }

    /// `a ** b` where `b` is a full factor, which makes `**` right-associative
    /// and lets it take a signed exponent.
    fn build_power(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let mut pairs = pair.into_inner();
        let base = Self::build_postfix(next_pair(&mut pairs, span, "operand")?)?;

        if pairs.next().is_none() {
            return Ok(base);
        }

        let exponent = Self::build_factor(next_pair(&mut pairs, span, "exponent")?)?;
        Ok(Expr::binary(base, BinaryOperator::Power, exponent))
    }

    fn build_postfix(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let mut pairs = pair.into_inner();
        let mut node = Self::build_primary_expression(next_pair(&mut pairs, span, "operand")?)?;

        for trailer in pairs {
            node = match trailer.as_rule() {
                Rule::call_args => Expr::Call {
                    callee: Box::new(node),
                    args: Self::build_arguments(trailer)?,
                },
                Rule::attribute => {
                    let trailer_span = trailer.as_span();
                    let attribute = next_pair(&mut trailer.into_inner(), trailer_span, "attribute")?;
                    Expr::Attribute {
                        base: Box::new(node),
                        attribute: attribute.as_str().to_string(),
                    }
                }
                Rule::subscript => Expr::Subscript {
                    base: Box::new(node),
                    index: Box::new(Self::build_index(trailer)?),
                },
                _ => return Err(malformed(trailer.as_span(), "trailer")),
            };
        }

        Ok(node)
    }

    fn build_arguments(pair: Pair<Rule>) -> Result<Vec<Argument>> {
        let span = pair.as_span();
        let (mut arguments, clauses, _) = Self::build_display_parts(pair, Self::build_argument)?;
        if clauses.is_empty() {
            return Ok(arguments);
        }

        // `f(x for x in y)`: a bare generator is the only argument
        match arguments.pop() {
            Some(Argument::Positional(element)) if arguments.is_empty() => {
                Ok(vec![Argument::Positional(comprehension(
                    ComprehensionKind::Generator,
                    element,
                    None,
                    clauses,
                ))])
            }
            _ => Err(malformed(span, "generator argument")),
        }
    }

    fn build_argument(pair: Pair<Rule>) -> Result<Argument> {
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::keyword_argument => {
                let mut inner = pair.into_inner();
                let name = next_pair(&mut inner, span, "argument name")?;
                let value = Self::build_test(next_pair(&mut inner, span, "argument value")?)?;
                Ok(Argument::Keyword {
                    name: name.as_str().to_string(),
                    value,
                })
            }
            Rule::keyword_unpack => {
                let mapping = next_pair(&mut pair.into_inner(), span, "mapping")?;
                Ok(Argument::KeywordUnpack(Self::build_test(mapping)?))
            }
            _ => Ok(Argument::Positional(Self::build_item(pair)?)),
        }
    }

    /// `a[i]`, `a[i, j]` or any of them as slices.
    fn build_index(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let (mut items, _, has_comma) = Self::build_display_parts(pair, Self::build_index_item)?;
        match (items.len(), has_comma) {
            (1, false) => items.pop().ok_or_else(|| malformed(span, "subscript")),
            _ => Ok(Expr::Tuple(items)),
        }
    }

    fn build_index_item(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let mut lower = None;
        let mut rest = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::test => lower = Some(Self::build_test(inner)?),
                Rule::slice_rest => rest = Some(inner),
                _ => return Err(malformed(inner.as_span(), "subscript")),
            }
        }

        let Some(rest) = rest else {
            return lower.ok_or_else(|| malformed(span, "subscript"));
        };

        debug!("Building slice: {:?}", span.as_str());
        let mut upper = None;
        let mut step = None;
        for bound in rest.into_inner() {
            let bound_span = bound.as_span();
            let rule = bound.as_rule();
            let value = Self::build_test(next_pair(&mut bound.into_inner(), bound_span, "slice bound")?)?;
            match rule {
                Rule::slice_upper => upper = Some(Box::new(value)),
                Rule::slice_step => step = Some(Box::new(value)),
                _ => return Err(malformed(bound_span, "slice")),
            }
        }

        Ok(Expr::Slice {
            lower: lower.map(Box::new),
            upper,
            step,
        })
    }

    /// An element of a display or argument list: `*x`, `name := value` or a
    /// plain expression.
    fn build_item(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::test => Self::build_test(pair),
            Rule::starred => {
                let value = next_pair(&mut pair.into_inner(), span, "expression")?;
                Ok(Expr::Starred(Box::new(Self::build_test(value)?)))
            }
            Rule::named_expr => {
                let mut inner = pair.into_inner();
                let target = next_pair(&mut inner, span, "assignment target")?;
                let value = Self::build_test(next_pair(&mut inner, span, "expression")?)?;
                Ok(Expr::NamedExpr {
                    target: target.as_str().to_string(),
                    value: Box::new(value),
                })
            }
            _ => Err(malformed(span, "expression")),
        }
    }

    /// Splits the children of a bracketed rule into items and `for` clauses,
    /// and reports whether a top-level comma was seen.
    fn build_display_parts<'i, T, F>(
        pair: Pair<'i, Rule>,
        item: F,
    ) -> Result<(Vec<T>, Vec<ComprehensionFor>, bool)>
    where
        F: Fn(Pair<'i, Rule>) -> Result<T>,
    {
        let mut items = Vec::new();
        let mut clauses = Vec::new();
        let mut has_comma = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::COMMA => has_comma = true,
                Rule::comp_for => clauses.push(Self::build_comprehension_for(inner)?),
                _ => items.push(item(inner)?),
            }
        }

        Ok((items, clauses, has_comma))
    }

    fn build_comprehension_for(pair: Pair<Rule>) -> Result<ComprehensionFor> {
        let span = pair.as_span();
        let mut targets = Vec::new();
        let mut iterable = None;
        let mut conditions = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::FOR | Rule::IN => {}
                Rule::comp_target => {
                    targets = inner
                        .into_inner()
                        .map(|target| target.as_str().to_string())
                        .collect();
                }
                Rule::or_test => iterable = Some(Self::build_or_expression(inner)?),
                Rule::comp_if => {
                    let if_span = inner.as_span();
                    let condition = inner
                        .into_inner()
                        .find(|part| part.as_rule() == Rule::or_test)
                        .ok_or_else(|| malformed(if_span, "condition"))?;
                    conditions.push(Self::build_or_expression(condition)?);
                }
                _ => return Err(malformed(inner.as_span(), "comprehension")),
            }
        }

        let iterable = iterable.ok_or_else(|| malformed(span, "comprehension"))?;
        Ok(ComprehensionFor {
            targets,
            iterable,
            conditions,
        })
    }

    fn build_parenthesized(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let (mut items, clauses, has_comma) = Self::build_display_parts(pair, Self::build_item)?;

        if !clauses.is_empty() {
            let element = items.pop().ok_or_else(|| malformed(span, "generator expression"))?;
            return Ok(comprehension(ComprehensionKind::Generator, element, None, clauses));
        }

        match (items.len(), has_comma) {
            (1, false) => items.pop().ok_or_else(|| malformed(span, "expression")),
            _ => Ok(Expr::Tuple(items)),
        }
    }

    fn build_list(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let (mut items, clauses, _) = Self::build_display_parts(pair, Self::build_item)?;

        if clauses.is_empty() {
            return Ok(Expr::List(items));
        }
        let element = items.pop().ok_or_else(|| malformed(span, "list comprehension"))?;
        Ok(comprehension(ComprehensionKind::List, element, None, clauses))
    }

    /// `{}` is an empty dict; otherwise every item must agree on having a
    /// `key: value` form (dict) or not (set).
    fn build_braces(pair: Pair<Rule>) -> Result<Expr> {
        let span = pair.as_span();
        let (mut items, clauses, _) = Self::build_display_parts(pair, Self::build_brace_item)?;

        if !clauses.is_empty() {
            let (element, value) = items.pop().ok_or_else(|| malformed(span, "comprehension"))?;
            let kind = match value {
                Some(_) => ComprehensionKind::Dict,
                None => ComprehensionKind::Set,
            };
            return Ok(comprehension(kind, element, value, clauses));
        }

        if items.iter().all(|(_, value)| value.is_some()) {
            let entries = items
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value)))
                .collect();
            Ok(Expr::Dict(entries))
        } else if items.iter().all(|(_, value)| value.is_none()) {
            Ok(Expr::Set(items.into_iter().map(|(element, _)| element).collect()))
        } else {
            Err(malformed(span, "braced display"))
        }
    }

    fn build_brace_item(pair: Pair<Rule>) -> Result<(Expr, Option<Expr>)> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let key = Self::build_test(next_pair(&mut inner, span, "expression")?)?;
        let value = inner.next().map(Self::build_test).transpose()?;
        Ok((key, value))
    }

    fn build_primary_expression(pair: Pair<Rule>) -> Result<Expr> {
        debug!("Building primary expression: {:?}", pair.as_str());
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::number => Ok(Expr::number(parse_number(pair.as_str()))),
            Rule::imaginary => {
                let text = pair.as_str();
                let value = parse_number(&text[..text.len() - 1]);
                Ok(Expr::Literal(Literal::Imaginary(value)))
            }
            Rule::string => {
                let content = next_pair(&mut pair.into_inner(), span, "string")?;
                Ok(Expr::Literal(Literal::Str(content.as_str().to_string())))
            }
            Rule::TRUE => Ok(Expr::Literal(Literal::Bool(true))),
            Rule::FALSE => Ok(Expr::Literal(Literal::Bool(false))),
            Rule::NONE => Ok(Expr::Literal(Literal::None)),
            Rule::identifier => Ok(Expr::name(pair.as_str())),
            Rule::parenthesized => Self::build_parenthesized(pair),
            Rule::list => Self::build_list(pair),
            Rule::braces => Self::build_braces(pair),
            _ => Err(malformed(span, "primary expression")),
        }
    }
}

fn comprehension(
    kind: ComprehensionKind,
    element: Expr,
    value: Option<Expr>,
    clauses: Vec<ComprehensionFor>,
) -> Expr {
    debug!("Building {} with {} clause(s)", kind, clauses.len());
    Expr::Comprehension {
        kind,
        element: Box::new(element),
        value: value.map(Box::new),
        clauses,
    }
}

fn build_chain<'i, F, G>(pair: Pair<'i, Rule>, operand: F, combine: G) -> Result<Expr>
where
    F: Fn(Pair<'i, Rule>) -> Result<Expr>,
    G: Fn(Expr, Pair<'i, Rule>, Expr) -> Result<Expr>,
{
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let mut node = operand(next_pair(&mut pairs, span, "operand")?)?;

    while let Some(operator_pair) = pairs.next() {
        let right = operand(next_pair(&mut pairs, span, "operand")?)?;
        node = combine(node, operator_pair, right)?;
    }

    Ok(node)
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, span: Span<'i>, what: &str) -> Result<Pair<'i, Rule>> {
    pairs.next().ok_or_else(|| malformed(span, what))
}

fn malformed(span: Span<'_>, what: &str) -> Error {
    let (line, column) = span.start_pos().line_col();
    Error::Syntax {
        line,
        column,
        message: format!("malformed {}", what),
    }
}

/// Decimal, float and `0x`/`0o`/`0b` forms, with `_` separators. The grammar
/// has already validated the text, so every character here is a digit of the
/// detected radix.
fn parse_number(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let radix = match lower.get(..2) {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return lower.parse::<f64>().unwrap_or(f64::NAN),
    };

    lower[2..]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |value, digit| value * radix as f64 + digit as f64)
}

fn rule_label(rule: &Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression
        | Rule::test
        | Rule::lambda_expr
        | Rule::conditional
        | Rule::or_test
        | Rule::and_test
        | Rule::not_test
        | Rule::comparison
        | Rule::bit_or
        | Rule::bit_xor
        | Rule::bit_and
        | Rule::shift
        | Rule::arith
        | Rule::term
        | Rule::factor
        | Rule::power
        | Rule::postfix => "expression",
        Rule::number | Rule::imaginary => "number",
        Rule::string => "string",
        Rule::identifier | Rule::lambda_params => "identifier",
        Rule::comp_op
        | Rule::BIT_OR
        | Rule::BIT_XOR
        | Rule::BIT_AND
        | Rule::shift_op
        | Rule::arith_op
        | Rule::term_op
        | Rule::POW => "operator",
        Rule::unary_op => "unary operator",
        Rule::call_args => "argument list",
        Rule::keyword_argument | Rule::keyword_unpack => "keyword argument",
        Rule::starred => "starred expression",
        Rule::named_expr => "assignment expression",
        Rule::attribute => "attribute",
        Rule::subscript
        | Rule::index_item
        | Rule::slice_rest
        | Rule::slice_upper
        | Rule::slice_step => "subscript",
        Rule::parenthesized => "parenthesized expression",
        Rule::list => "list",
        Rule::braces | Rule::brace_item => "braced display",
        Rule::comp_for | Rule::comp_target | Rule::comp_if => "comprehension",
        Rule::COMMA => "','",
        Rule::FOR => "'for'",
        Rule::IF => "'if'",
        Rule::ELSE => "'else'",
        Rule::OR => "'or'",
        Rule::AND => "'and'",
        Rule::NOT => "'not'",
        _ => "token",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Expr {
        Expr::number(value)
    }

    #[test]
    fn test_simple_binary_expression() {
        let ast = parse("2 + 3").unwrap();
        assert_eq!(ast, Expr::binary(num(2.0), BinaryOperator::Add, num(3.0)));
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let ast = parse("2+3*4").unwrap();
        let expected = Expr::binary(
            num(2.0),
            BinaryOperator::Add,
            Expr::binary(num(3.0), BinaryOperator::Multiply, num(4.0)),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let ast = parse("(2+3)*4").unwrap();
        let expected = Expr::binary(
            Expr::binary(num(2.0), BinaryOperator::Add, num(3.0)),
            BinaryOperator::Multiply,
            num(4.0),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let ast = parse("10 - 4 - 3").unwrap();
        let expected = Expr::binary(
            Expr::binary(num(10.0), BinaryOperator::Subtract, num(4.0)),
            BinaryOperator::Subtract,
            num(3.0),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_power_is_right_associative() {
        let ast = parse("2 ** 3 ** 2").unwrap();
        let expected = Expr::binary(
            num(2.0),
            BinaryOperator::Power,
            Expr::binary(num(3.0), BinaryOperator::Power, num(2.0)),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_power_binds_tighter_than_leading_sign() {
        let ast = parse("-2**2").unwrap();
        let expected = Expr::unary(
            UnaryOperator::Negate,
            Expr::binary(num(2.0), BinaryOperator::Power, num(2.0)),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_power_accepts_signed_exponent() {
        let ast = parse("2**-1").unwrap();
        let expected = Expr::binary(
            num(2.0),
            BinaryOperator::Power,
            Expr::unary(UnaryOperator::Negate, num(1.0)),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_stacked_unary_operators() {
        let ast = parse("- + -5").unwrap();
        let expected = Expr::unary(
            UnaryOperator::Negate,
            Expr::unary(
                UnaryOperator::Identity,
                Expr::unary(UnaryOperator::Negate, num(5.0)),
            ),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_number_forms() {
        let cases = [
            ("42", 42.0),
            ("3.25", 3.25),
            ("1.", 1.0),
            (".5", 0.5),
            ("1e3", 1000.0),
            ("2.5E-1", 0.25),
            ("1_000_000", 1_000_000.0),
            ("0x1F", 31.0),
            ("0o17", 15.0),
            ("0b1010", 10.0),
        ];
        for (input, expected) in cases {
            assert_eq!(parse(input).unwrap(), num(expected), "input: {}", input);
        }
    }

    #[test]
    fn test_function_call() {
        let ast = parse("atan2(1, 2)").unwrap();
        assert_eq!(ast, Expr::call("atan2", vec![num(1.0), num(2.0)]));
    }

    #[test]
    fn test_function_call_no_args() {
        let ast = parse("gcd()").unwrap();
        assert_eq!(ast, Expr::call("gcd", vec![]));
    }

    #[test]
    fn test_nested_call_arguments() {
        let ast = parse("sin(pi / 2)").unwrap();
        let expected = Expr::call(
            "sin",
            vec![Expr::binary(
                Expr::name("pi"),
                BinaryOperator::Divide,
                num(2.0),
            )],
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_keyword_argument() {
        let ast = parse("log(x=2)").unwrap();
        let expected = Expr::Call {
            callee: Box::new(Expr::name("log")),
            args: vec![Argument::Keyword {
                name: "x".to_string(),
                value: num(2.0),
            }],
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_equality_is_not_a_keyword_argument() {
        let ast = parse("f(x == 2)").unwrap();
        let expected = Expr::Call {
            callee: Box::new(Expr::name("f")),
            args: vec![Argument::Positional(Expr::Compare {
                left: Box::new(Expr::name("x")),
                operator: ComparisonOperator::Equal,
                right: Box::new(num(2.0)),
            })],
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_attribute_call() {
        let ast = parse("math.sin(0)").unwrap();
        let expected = Expr::Call {
            callee: Box::new(Expr::Attribute {
                base: Box::new(Expr::name("math")),
                attribute: "sin".to_string(),
            }),
            args: vec![Argument::Positional(num(0.0))],
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_lambda_call() {
        let ast = parse("(lambda x: x)(2)").unwrap();
        let expected = Expr::Call {
            callee: Box::new(Expr::Lambda {
                params: vec!["x".to_string()],
                body: Box::new(Expr::name("x")),
            }),
            args: vec![Argument::Positional(num(2.0))],
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_floor_division_parses_as_its_own_operator() {
        let ast = parse("5//2").unwrap();
        assert_eq!(ast, Expr::binary(num(5.0), BinaryOperator::FloorDivide, num(2.0)));
    }

    #[test]
    fn test_literal_kinds() {
        assert_eq!(
            parse("'hi'").unwrap(),
            Expr::Literal(Literal::Str("hi".to_string()))
        );
        assert_eq!(
            parse("\"a b\"").unwrap(),
            Expr::Literal(Literal::Str("a b".to_string()))
        );
        assert_eq!(parse("True").unwrap(), Expr::Literal(Literal::Bool(true)));
        assert_eq!(parse("None").unwrap(), Expr::Literal(Literal::None));
        assert_eq!(parse("2j").unwrap(), Expr::Literal(Literal::Imaginary(2.0)));
    }

    #[test]
    fn test_keyword_prefix_is_an_identifier() {
        assert_eq!(parse("inf").unwrap(), Expr::name("inf"));
        assert_eq!(parse("nothing").unwrap(), Expr::name("nothing"));
        assert_eq!(parse("Truex").unwrap(), Expr::name("Truex"));
    }

    #[test]
    fn test_displays() {
        assert_eq!(
            parse("[1, 2, 3]").unwrap(),
            Expr::List(vec![num(1.0), num(2.0), num(3.0)])
        );
        assert_eq!(parse("(1, 2)").unwrap(), Expr::Tuple(vec![num(1.0), num(2.0)]));
        assert_eq!(parse("(1,)").unwrap(), Expr::Tuple(vec![num(1.0)]));
        assert_eq!(parse("()").unwrap(), Expr::Tuple(vec![]));
        assert_eq!(parse("{1, 2}").unwrap(), Expr::Set(vec![num(1.0), num(2.0)]));
        assert_eq!(
            parse("{1: 2}").unwrap(),
            Expr::Dict(vec![(num(1.0), num(2.0))])
        );
        assert_eq!(parse("{}").unwrap(), Expr::Dict(vec![]));
        assert_eq!(parse("((1))").unwrap(), num(1.0));
    }

    #[test]
    fn test_comprehensions() {
        let ast = parse("[x * 2 for x in y if x]").unwrap();
        let expected = Expr::Comprehension {
            kind: ComprehensionKind::List,
            element: Box::new(Expr::binary(
                Expr::name("x"),
                BinaryOperator::Multiply,
                num(2.0),
            )),
            value: None,
            clauses: vec![ComprehensionFor {
                targets: vec!["x".to_string()],
                iterable: Expr::name("y"),
                conditions: vec![Expr::name("x")],
            }],
        };
        assert_eq!(ast, expected);

        let (kind, value, clauses) = match parse("{k: v for k, v in a for b in c}").unwrap() {
            Expr::Comprehension {
                kind,
                value,
                clauses,
                ..
            } => (kind, value, clauses),
            other => panic!("expected a comprehension, got {:?}", other),
        };
        assert_eq!(kind, ComprehensionKind::Dict);
        assert_eq!(value, Some(Box::new(Expr::name("v"))));
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].targets, vec!["k".to_string(), "v".to_string()]);

        assert!(matches!(
            parse("{x for x in y}").unwrap(),
            Expr::Comprehension {
                kind: ComprehensionKind::Set,
                ..
            }
        ));
        assert!(matches!(
            parse("(x for x in y)").unwrap(),
            Expr::Comprehension {
                kind: ComprehensionKind::Generator,
                ..
            }
        ));
    }

    #[test]
    fn test_generator_argument() {
        let args = match parse("f(x for x in y)").unwrap() {
            Expr::Call { args, .. } => args,
            other => panic!("expected a call, got {:?}", other),
        };
        assert!(matches!(
            args.as_slice(),
            [Argument::Positional(Expr::Comprehension {
                kind: ComprehensionKind::Generator,
                ..
            })]
        ));
    }

    #[test]
    fn test_starred_and_keyword_unpack() {
        let ast = parse("f(*a, **b)").unwrap();
        let expected = Expr::Call {
            callee: Box::new(Expr::name("f")),
            args: vec![
                Argument::Positional(Expr::Starred(Box::new(Expr::name("a")))),
                Argument::KeywordUnpack(Expr::name("b")),
            ],
        };
        assert_eq!(ast, expected);
        assert_eq!(
            parse("[*a]").unwrap(),
            Expr::List(vec![Expr::Starred(Box::new(Expr::name("a")))])
        );
    }

    #[test]
    fn test_slices() {
        let subscript = |index: Expr| Expr::Subscript {
            base: Box::new(Expr::name("a")),
            index: Box::new(index),
        };
        assert_eq!(
            parse("a[1:2]").unwrap(),
            subscript(Expr::Slice {
                lower: Some(Box::new(num(1.0))),
                upper: Some(Box::new(num(2.0))),
                step: None,
            })
        );
        assert_eq!(
            parse("a[::-1]").unwrap(),
            subscript(Expr::Slice {
                lower: None,
                upper: None,
                step: Some(Box::new(Expr::unary(UnaryOperator::Negate, num(1.0)))),
            })
        );
        assert_eq!(
            parse("a[:]").unwrap(),
            subscript(Expr::Slice {
                lower: None,
                upper: None,
                step: None,
            })
        );
        assert_eq!(
            parse("a[1, :2]").unwrap(),
            subscript(Expr::Tuple(vec![
                num(1.0),
                Expr::Slice {
                    lower: None,
                    upper: Some(Box::new(num(2.0))),
                    step: None,
                },
            ]))
        );
        assert_eq!(parse("a[0]").unwrap(), subscript(num(0.0)));
        assert_eq!(parse("a[0,]").unwrap(), subscript(Expr::Tuple(vec![num(0.0)])));
    }

    #[test]
    fn test_assignment_expression() {
        let expected = Expr::NamedExpr {
            target: "x".to_string(),
            value: Box::new(num(1.0)),
        };
        assert_eq!(parse("(x := 1)").unwrap(), expected);
        assert_eq!(
            parse("f(x := 1)").unwrap(),
            Expr::Call {
                callee: Box::new(Expr::name("f")),
                args: vec![Argument::Positional(expected)],
            }
        );
        assert!(matches!(parse("x := 1"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_logic_and_comparison() {
        let ast = parse("not 1 < 2 or 3 is not 4").unwrap();
        let expected = Expr::Logical {
            left: Box::new(Expr::Not(Box::new(Expr::Compare {
                left: Box::new(num(1.0)),
                operator: ComparisonOperator::LessThan,
                right: Box::new(num(2.0)),
            }))),
            operator: LogicalOperator::Or,
            right: Box::new(Expr::Compare {
                left: Box::new(num(3.0)),
                operator: ComparisonOperator::IsNot,
                right: Box::new(num(4.0)),
            }),
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_conditional_expression() {
        let ast = parse("1 if 2 else 3").unwrap();
        let expected = Expr::Conditional {
            test: Box::new(num(2.0)),
            body: Box::new(num(1.0)),
            orelse: Box::new(num(3.0)),
        };
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_bitwise_and_shift() {
        let ast = parse("1 | 2 << 3").unwrap();
        let expected = Expr::binary(
            num(1.0),
            BinaryOperator::BitOr,
            Expr::binary(num(2.0), BinaryOperator::LeftShift, num(3.0)),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_excess_whitespace() {
        let ast = parse("  2   *\t( 3 +\n 4 )  ").unwrap();
        let expected = Expr::binary(
            num(2.0),
            BinaryOperator::Multiply,
            Expr::binary(num(3.0), BinaryOperator::Add, num(4.0)),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_invalid_syntax() {
        let inputs = vec![
            "",
            "   ",
            "(1 + 2",
            "1 + 2)",
            "2 +",
            "* 3",
            "2 3",
            "1 $ 2",
            "sin(1,,2)",
            "x = 2",
            "1abc",
            "'unterminated",
            "math.",
            "{1: 2, 3}",
            "[x for]",
            "[x for x in]",
            "a[]",
            "(for x in y)",
        ];

        for input in inputs {
            assert!(
                matches!(parse(input), Err(Error::Syntax { .. })),
                "Input '{}' should fail to parse, but it succeeded",
                input
            );
        }
    }

    #[test]
    fn test_syntax_error_reports_position() {
        match parse("1 +\n(2 * )") {
            Err(Error::Syntax { line, column, .. }) => {
                assert_eq!(line, 2);
                assert!(column > 1);
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_very_large_expression() {
        let input = (0..100)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" + ");

        let ast = parse(&input).unwrap();

        let mut expected = num(0.0);
        for i in 1..100 {
            expected = Expr::binary(expected, BinaryOperator::Add, num(i as f64));
        }

        assert_eq!(ast, expected);
    }
}
