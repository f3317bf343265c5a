//! JSON request fixtures shaped like the arguments clients send.
//!
//! Every operation takes its arguments as JSON strings; these helpers build
//! them with `serde_json::json!` so tests read like the requests they model.

use serde_json::{Value, json};

/// A bike catalog entry `{uuid, ...ContractType}`.
pub fn contract_type(uuid: &str, shop_type: &str, active: bool) -> Value {
    json!({
        "uuid": uuid,
        "shop_type": shop_type,
        "formula_per_day": "price * 0.01",
        "max_sum_insured": 5000.0,
        "theft_insured": true,
        "description": format!("{shop_type} insurance"),
        "conditions": "Standard terms",
        "active": active,
        "min_duration_days": 1,
        "max_duration_days": 365,
    })
}

/// The bootstrap argument: a JSON array of catalog entries.
pub fn catalog(entries: &[Value]) -> String {
    Value::Array(entries.to_vec()).to_string()
}

/// A bike used as the insured item.
pub fn item() -> Value {
    json!({
        "id": 1,
        "brand": "Canyon",
        "model": "Grand Canyon 8",
        "price": 1499.0,
        "description": "Hardtail mountain bike",
        "serial_no": "CNY123456",
    })
}

/// A `contract_create` argument that onboards `username` with `password`.
///
/// Pass an empty password to require an existing user.
pub fn contract(uuid: &str, contract_type_uuid: &str, username: &str, password: &str) -> Value {
    json!({
        "uuid": uuid,
        "contract_type_uuid": contract_type_uuid,
        "username": username,
        "password": password,
        "first_name": "Alice",
        "last_name": "Smith",
        "item": item(),
        "start_date": "2024-01-01T00:00:00Z",
        "end_date": "2025-01-01T00:00:00Z",
    })
}

/// A `claim_file` argument.
pub fn claim(uuid: &str, contract_uuid: &str, is_theft: bool) -> Value {
    json!({
        "uuid": uuid,
        "contract_uuid": contract_uuid,
        "date": "2024-06-01T12:00:00Z",
        "description": if is_theft { "Stolen from the station" } else { "Broken chain" },
        "is_theft": is_theft,
    })
}

/// A `claim_process` argument.
pub fn claim_decision(uuid: &str, contract_uuid: &str, status: &str, reimbursable: f64) -> Value {
    json!({
        "uuid": uuid,
        "contract_uuid": contract_uuid,
        "status": status,
        "reimbursable": reimbursable,
    })
}

/// A `theft_claim_process` argument.
pub fn theft_decision(uuid: &str, contract_uuid: &str, is_theft: bool, file_reference: &str) -> Value {
    json!({
        "uuid": uuid,
        "contract_uuid": contract_uuid,
        "is_theft": is_theft,
        "file_reference": file_reference,
    })
}

/// Wraps a single JSON argument into the argument list of an invocation.
pub fn args(value: &Value) -> Vec<String> {
    vec![value.to_string()]
}
