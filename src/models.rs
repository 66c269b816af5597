use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const CHECKOUT_ACTION: &str = "checkout";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Employee {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub office_email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub nickname: String,
}

impl Employee {
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompanyList {
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskEntry {
    pub task_for: String,
    pub task_name: String,
    pub task_details: String,
    pub my_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendancePayload {
    pub email: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskEntry>>,
}

impl AttendancePayload {
    /// Builds a payload; `tasks` is only carried for the checkout action.
    pub fn new(email: impl Into<String>, action: impl Into<String>, tasks: Vec<TaskEntry>) -> Self {
        let action = action.into();
        let tasks = (action == CHECKOUT_ACTION).then_some(tasks);
        Self {
            email: email.into(),
            action,
            tasks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AttendanceReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub office_email: Option<String>,
}

/// Pulls the human readable reason out of an error body, falling back to the raw JSON.
pub fn error_detail(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::String(_) | Value::Null | Value::Bool(false)) | None => body.to_string(),
        Some(other) => other.to_string(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_checkout_payload_omits_tasks() {
        let task = TaskEntry {
            task_for: "Acme".into(),
            task_name: "n".into(),
            task_details: "d".into(),
            my_role: "r".into(),
        };
        let payload = AttendancePayload::new("a@x.com", "meeting", vec![task]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "email": "a@x.com", "action": "meeting" })
        );
    }

    #[test]
    fn checkout_payload_carries_tasks_even_when_empty() {
        let payload = AttendancePayload::new("a@x.com", "checkout", Vec::new());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["tasks"], json!([]));
    }

    #[test]
    fn employee_id_accepts_numbers() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 42,
            "email": "A@X.com",
            "office_email": "a@office.com",
            "full_name": "Alice Example",
            "nickname": "Al",
            "score": 3
        }))
        .unwrap();
        assert_eq!(employee.id, "42");
        assert!(employee.matches_email("a@x.COM"));
    }

    #[test]
    fn error_detail_falls_back_to_raw_json() {
        assert_eq!(error_detail(&json!({ "detail": "late checkout" })), "late checkout");
        assert_eq!(error_detail(&json!({ "message": "nope" })), r#"{"message":"nope"}"#);
        assert_eq!(error_detail(&json!({ "detail": "" })), r#"{"detail":""}"#);
        assert_eq!(error_detail(&json!({ "detail": null })), r#"{"detail":null}"#);
        assert_eq!(error_detail(&json!({ "detail": false })), r#"{"detail":false}"#);
    }
}
