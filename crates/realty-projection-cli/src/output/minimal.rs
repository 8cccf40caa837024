use serde_json::Value;

use super::{format_scalar, result_of};

/// Print just the key answer value from the output.
///
/// Comparisons print one `key: final_value` line per entity. Everything else
/// prints the first well-known field found, looking one level into `summary`.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Some(Value::Array(summaries)) = result.get("summaries") {
        for s in summaries {
            println!(
                "{}: {}",
                s.get("key").map(format_scalar).unwrap_or_default(),
                s.get("final_value").map(format_scalar).unwrap_or_default()
            );
        }
        return;
    }

    let priority_keys = ["final_value", "monthly_payment", "gross_yield_pct"];
    let scopes = [Some(result), result.get("summary")];

    for key in &priority_keys {
        for scope in scopes.iter().flatten() {
            if let Some(val) = scope.get(*key) {
                if !val.is_null() {
                    println!("{}", format_scalar(val));
                    return;
                }
            }
        }
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result));
}
