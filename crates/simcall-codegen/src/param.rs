//! Textual form of gate parameters.

use simcall_ir::ParameterExpression;

/// Render a numeric value the way Python's `repr(float)` does.
///
/// Integral values keep a trailing `.0`; very large and very small magnitudes
/// switch to exponent notation with a signed, two-digit exponent.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{value:e}");
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exponent.abs())
            }
            None => scientific,
        };
    }

    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Render a gate parameter.
///
/// Fully numeric expressions are evaluated. Symbolic ones are simplified and
/// printed structurally, with π as `M_PI`.
pub fn format_parameter(param: &ParameterExpression) -> String {
    if !param.is_symbolic() {
        if let Some(value) = param.as_f64() {
            return format_float(value);
        }
    }
    format_expression(&param.simplify())
}

fn format_expression(expr: &ParameterExpression) -> String {
    match expr {
        ParameterExpression::Constant(v) => format_float(*v),
        ParameterExpression::Symbol(name) => name.clone(),
        ParameterExpression::Pi => "M_PI".into(),
        ParameterExpression::Neg(e) => format!("-({})", format_expression(e)),
        ParameterExpression::Add(a, b) => binary(a, "+", b),
        ParameterExpression::Sub(a, b) => binary(a, "-", b),
        ParameterExpression::Mul(a, b) => binary(a, "*", b),
        ParameterExpression::Div(a, b) => binary(a, "/", b),
    }
}

fn binary(a: &ParameterExpression, op: &str, b: &ParameterExpression) -> String {
    format!("({} {op} {})", format_expression(a), format_expression(b))
}
