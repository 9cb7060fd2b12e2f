//! Typed wire models for list-all responses.
//!
//! The server speaks snake_case JSON. Field names here match the wire
//! exactly, so no rename attributes are needed. Optional columns are
//! nullable on the server and modeled as `Option`.

use chrono::{DateTime, NaiveDate, Utc};
use cm_common::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub deceased_name: Option<String>,
    pub deceased_date: Option<NaiveDate>,
    pub relationship_to_deceased: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: RecordId,
    pub payer: String,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub amount_due: f64,
    #[serde(default)]
    pub remaining_balance: f64,
    #[serde(default)]
    pub maintenance_fee: f64,
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: RecordId,
    pub family_name: String,
    pub deceased_name: Option<String>,
    pub deceased_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occupant {
    pub id: RecordId,
    pub name: String,
    pub interment_date: Option<NaiveDate>,
    #[serde(default)]
    pub niche: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Niche {
    pub id: RecordId,
    #[serde(default)]
    pub amount: f64,
    pub location: String,
    #[serde(default)]
    pub status: String,
    pub date_of_availment: Option<NaiveDate>,
    /// Server-computed, 50 years after availment.
    pub date_of_expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub role: String,
}

/// One audit log line. Append-only on the server; the console never
/// edits or deletes these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub user: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub action: String,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub response_data: Option<AuditResponseData>,
}

/// Structured payload recorded alongside mutating audit actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResponseData {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_decodes_with_nulls() {
        let raw = r#"{
            "id": 3,
            "name": "Maria Santos",
            "contact_number": null,
            "email": "maria@example.org",
            "address": null,
            "deceased_name": "Jose Santos",
            "deceased_date": "2021-04-17",
            "relationship_to_deceased": "spouse"
        }"#;
        let c: Customer = serde_json::from_str(raw).unwrap();
        assert_eq!(c.id, RecordId(3));
        assert!(c.contact_number.is_none());
        assert_eq!(
            c.deceased_date,
            Some(NaiveDate::from_ymd_opt(2021, 4, 17).unwrap())
        );
    }

    #[test]
    fn test_payment_defaults_missing_amounts() {
        let raw = r#"{
            "id": 9,
            "payer": "Maria Santos",
            "amount_due": 5000.0,
            "payment_date": "2024-06-01T10:30:00Z",
            "status": "Pending"
        }"#;
        let p: Payment = serde_json::from_str(raw).unwrap();
        assert_eq!(p.amount_due, 5000.0);
        assert_eq!(p.amount_paid, 0.0);
        assert_eq!(p.remaining_balance, 0.0);
    }

    #[test]
    fn test_audit_entry_response_data() {
        let raw = r#"{
            "user": "admin",
            "action": "delete",
            "app": "customers",
            "path": "/api/customers/delete/",
            "timestamp": "2024-06-01T10:30:00Z",
            "response_data": {"ids": [4, 5]}
        }"#;
        let e: AuditEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(e.response_data.unwrap().ids, vec![4, 5]);
        assert!(e.id.is_none());
    }
}
