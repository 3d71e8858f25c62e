use serde_json::Value;

use super::format_scalar;

/// Headline values, most specific first. Dotted paths reach into sections.
const PRIORITY_PATHS: [&str; 7] = [
    "returns.annualized_return_on_capital",
    "monthly_payment",
    "stamp_duty",
    "principal_required",
    "base_case_value",
    "cash_outlay.total",
    "total_grants",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", format_scalar(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}
