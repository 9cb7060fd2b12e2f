//! Per-entity view descriptors.
//!
//! Each tab is described declaratively: its columns, its create/edit form
//! fields, how a typed wire model projects into an engine `Record`, and an
//! optional row-tone hook. One generic screen consumes all of them.

use crate::table::{ColumnSpec, ColumnType, Record, Value};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use cm_api::models::{AuditEntry, Contact, Customer, Niche, Occupant, Payment, User};
use cm_api::{ApiClient, EntityKind};
use cm_common::{RecordId, Result};

/// Visual emphasis applied to a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowTone {
    #[default]
    Normal,
    /// Nearing a deadline; rendered in the warning style.
    Warning,
}

/// Input widget kind for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Password,
    Select(&'static [&'static str]),
}

/// One field of a create/edit form, keyed by its wire name.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, label, kind }
    }
}

/// Everything the generic tab screen needs to render one entity.
#[derive(Clone)]
pub struct ViewDescriptor {
    pub kind: EntityKind,
    pub columns: Vec<ColumnSpec>,
    pub fields: Vec<FieldSpec>,
    pub fetch: fn(&ApiClient) -> Result<Vec<Record>>,
    pub tone: Option<fn(&Record) -> RowTone>,
}

impl ViewDescriptor {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Whether the first column is the checkbox column.
    pub fn has_select(&self) -> bool {
        self.columns.first().map(|c| c.is_select()).unwrap_or(false)
    }
}

/// Descriptors for every tab, in sidebar order.
pub fn all_descriptors() -> Vec<ViewDescriptor> {
    vec![
        customers(),
        payments(),
        contacts(),
        occupants(),
        niches(),
        users(),
        audit(),
    ]
}

pub fn descriptor(kind: EntityKind) -> ViewDescriptor {
    match kind {
        EntityKind::Customers => customers(),
        EntityKind::Payments => payments(),
        EntityKind::Contacts => contacts(),
        EntityKind::Occupants => occupants(),
        EntityKind::Niches => niches(),
        EntityKind::Users => users(),
        EntityKind::Audit => audit(),
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

fn customers() -> ViewDescriptor {
    ViewDescriptor {
        kind: EntityKind::Customers,
        columns: vec![
            ColumnSpec::select(),
            ColumnSpec::new("Customer ID", "id", ColumnType::Number),
            ColumnSpec::new("Full Name", "name", ColumnType::Text),
            ColumnSpec::new("Contact Number", "contact_number", ColumnType::Text),
            ColumnSpec::new("Email", "email", ColumnType::Text),
            ColumnSpec::new("Address", "address", ColumnType::Text),
            ColumnSpec::new("Deceased's Name", "deceased_name", ColumnType::Text),
            ColumnSpec::new("Date Deceased", "deceased_date", ColumnType::Date),
            ColumnSpec::new(
                "Relationship to Deceased",
                "relationship_to_deceased",
                ColumnType::Text,
            ),
        ],
        fields: vec![
            FieldSpec::new("name", "Customer Name", FieldKind::Text),
            FieldSpec::new("contact_number", "Contact Number", FieldKind::Text),
            FieldSpec::new("email", "Email", FieldKind::Text),
            FieldSpec::new("address", "Address", FieldKind::Text),
            FieldSpec::new("deceased_name", "Deceased's Name", FieldKind::Text),
            FieldSpec::new("deceased_date", "Deceased Date", FieldKind::Date),
            FieldSpec::new(
                "relationship_to_deceased",
                "Relationship to Deceased",
                FieldKind::Text,
            ),
        ],
        fetch: fetch_customers,
        tone: None,
    }
}

fn payments() -> ViewDescriptor {
    ViewDescriptor {
        kind: EntityKind::Payments,
        columns: vec![
            ColumnSpec::select(),
            ColumnSpec::new("Payment ID", "id", ColumnType::Number),
            ColumnSpec::new("Customer Name", "payer", ColumnType::Text),
            ColumnSpec::new("Amount Paid", "amount_paid", ColumnType::Number),
            ColumnSpec::new("Amount Due", "amount_due", ColumnType::Number),
            ColumnSpec::new("Remaining Balance", "remaining_balance", ColumnType::Number),
            ColumnSpec::new("Maintenance Fee", "maintenance_fee", ColumnType::Number),
            ColumnSpec::new("Date Paid", "payment_date", ColumnType::Date),
            ColumnSpec::new("Status", "status", ColumnType::Text),
        ],
        fields: vec![
            FieldSpec::new("payer", "Customer Name", FieldKind::Text),
            FieldSpec::new("amount_due", "Amount Due", FieldKind::Number),
            FieldSpec::new("maintenance_fee", "Maintenance Fee", FieldKind::Number),
        ],
        fetch: fetch_payments,
        tone: None,
    }
}

fn contacts() -> ViewDescriptor {
    ViewDescriptor {
        kind: EntityKind::Contacts,
        columns: vec![
            ColumnSpec::select(),
            ColumnSpec::new("Contact ID", "id", ColumnType::Number),
            ColumnSpec::new("Family Name", "family_name", ColumnType::Text),
            ColumnSpec::new("Deceased's Name", "deceased_name", ColumnType::Text),
            ColumnSpec::new("Deceased Date", "deceased_date", ColumnType::Date),
            ColumnSpec::new("Address", "address", ColumnType::Text),
            ColumnSpec::new("Contact Number", "contact_number", ColumnType::Text),
        ],
        fields: vec![
            FieldSpec::new("family_name", "Family Name", FieldKind::Text),
            FieldSpec::new("deceased_name", "Deceased's Name", FieldKind::Text),
            FieldSpec::new("deceased_date", "Deceased Date", FieldKind::Date),
            FieldSpec::new("address", "Address", FieldKind::Text),
            FieldSpec::new("contact_number", "Contact Number", FieldKind::Text),
        ],
        fetch: fetch_contacts,
        tone: None,
    }
}

fn occupants() -> ViewDescriptor {
    ViewDescriptor {
        kind: EntityKind::Occupants,
        columns: vec![
            ColumnSpec::select(),
            ColumnSpec::new("Occupant ID", "id", ColumnType::Number),
            ColumnSpec::new("Name", "name", ColumnType::Text),
            ColumnSpec::new("Date of Interment", "interment_date", ColumnType::Date),
            ColumnSpec::new("Niche", "niche", ColumnType::Text),
        ],
        fields: vec![
            FieldSpec::new("name", "Name", FieldKind::Text),
            FieldSpec::new("interment_date", "Date of Interment", FieldKind::Date),
            FieldSpec::new("niche_id", "Niche ID", FieldKind::Number),
        ],
        fetch: fetch_occupants,
        tone: None,
    }
}

fn niches() -> ViewDescriptor {
    ViewDescriptor {
        kind: EntityKind::Niches,
        columns: vec![
            ColumnSpec::select(),
            ColumnSpec::new("Niche ID", "id", ColumnType::Number),
            ColumnSpec::new("Amount", "amount", ColumnType::Number),
            ColumnSpec::new("Location", "location", ColumnType::Text),
            ColumnSpec::new("Status", "status", ColumnType::Text),
            ColumnSpec::new("Date of Expiry", "date_of_expiry", ColumnType::Date),
        ],
        fields: vec![
            FieldSpec::new("amount", "Amount", FieldKind::Number),
            FieldSpec::new("location", "Location", FieldKind::Text),
            FieldSpec::new("type", "Type", FieldKind::Select(&["Granite", "Glass"])),
            FieldSpec::new("max_occupants", "Max Occupants", FieldKind::Number),
        ],
        fetch: fetch_niches,
        tone: Some(niche_tone),
    }
}

fn users() -> ViewDescriptor {
    ViewDescriptor {
        kind: EntityKind::Users,
        columns: vec![
            ColumnSpec::select(),
            ColumnSpec::new("User ID", "id", ColumnType::Number),
            ColumnSpec::new("Username", "username", ColumnType::Text),
            ColumnSpec::new("Role", "role", ColumnType::Text),
        ],
        fields: vec![
            FieldSpec::new("username", "Username", FieldKind::Text),
            FieldSpec::new("password", "Password", FieldKind::Password),
            FieldSpec::new("role", "Role", FieldKind::Select(&["admin", "staff"])),
        ],
        fetch: fetch_users,
        tone: None,
    }
}

fn audit() -> ViewDescriptor {
    ViewDescriptor {
        kind: EntityKind::Audit,
        // No checkbox column: audit logs are read-only
        columns: vec![
            ColumnSpec::new("User", "user", ColumnType::Text),
            ColumnSpec::new("Role", "role", ColumnType::Text),
            ColumnSpec::new("IP Address", "ip_address", ColumnType::Text),
            ColumnSpec::new("Object ID", "object_id", ColumnType::Text),
            ColumnSpec::new("Action", "action", ColumnType::Text),
            ColumnSpec::new("Application", "app", ColumnType::Text),
            ColumnSpec::new("URL", "path", ColumnType::Text),
            ColumnSpec::new("Timestamp", "timestamp", ColumnType::Date),
        ],
        fields: vec![],
        fetch: fetch_audit,
        tone: None,
    }
}

// ---------------------------------------------------------------------------
// Projectors
// ---------------------------------------------------------------------------

fn date_value(d: Option<NaiveDate>) -> Value {
    match d {
        Some(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
        None => Value::Null,
    }
}

fn datetime_value(dt: Option<DateTime<Utc>>) -> Value {
    match dt {
        Some(dt) => Value::Text(dt.to_rfc3339()),
        None => Value::Null,
    }
}

fn fetch_customers(client: &ApiClient) -> Result<Vec<Record>> {
    let rows: Vec<Customer> = client.list_all(EntityKind::Customers)?;
    Ok(rows
        .into_iter()
        .map(|c| {
            Record::new(c.id)
                .with_field("id", c.id.0 as f64)
                .with_field("name", c.name)
                .with_field("contact_number", c.contact_number)
                .with_field("email", c.email)
                .with_field("address", c.address)
                .with_field("deceased_name", c.deceased_name)
                .with_field("deceased_date", date_value(c.deceased_date))
                .with_field("relationship_to_deceased", c.relationship_to_deceased)
        })
        .collect())
}

fn fetch_payments(client: &ApiClient) -> Result<Vec<Record>> {
    let rows: Vec<Payment> = client.list_all(EntityKind::Payments)?;
    Ok(rows
        .into_iter()
        .map(|p| {
            Record::new(p.id)
                .with_field("id", p.id.0 as f64)
                .with_field("payer", p.payer)
                .with_field("amount_paid", p.amount_paid)
                .with_field("amount_due", p.amount_due)
                .with_field("remaining_balance", p.remaining_balance)
                .with_field("maintenance_fee", p.maintenance_fee)
                .with_field("payment_date", datetime_value(p.payment_date))
                .with_field("status", p.status)
        })
        .collect())
}

fn fetch_contacts(client: &ApiClient) -> Result<Vec<Record>> {
    let rows: Vec<Contact> = client.list_all(EntityKind::Contacts)?;
    Ok(rows
        .into_iter()
        .map(|c| {
            Record::new(c.id)
                .with_field("id", c.id.0 as f64)
                .with_field("family_name", c.family_name)
                .with_field("deceased_name", c.deceased_name)
                .with_field("deceased_date", date_value(c.deceased_date))
                .with_field("address", c.address)
                .with_field("contact_number", c.contact_number)
        })
        .collect())
}

fn fetch_occupants(client: &ApiClient) -> Result<Vec<Record>> {
    let rows: Vec<Occupant> = client.list_all(EntityKind::Occupants)?;
    Ok(rows
        .into_iter()
        .map(|o| {
            Record::new(o.id)
                .with_field("id", o.id.0 as f64)
                .with_field("name", o.name)
                .with_field("interment_date", date_value(o.interment_date))
                .with_field("niche", o.niche)
        })
        .collect())
}

fn fetch_niches(client: &ApiClient) -> Result<Vec<Record>> {
    let rows: Vec<Niche> = client.list_all(EntityKind::Niches)?;
    Ok(rows
        .into_iter()
        .map(|n| {
            Record::new(n.id)
                .with_field("id", n.id.0 as f64)
                .with_field("amount", n.amount)
                .with_field("location", n.location)
                .with_field("status", n.status)
                .with_field("date_of_availment", date_value(n.date_of_availment))
                .with_field("date_of_expiry", date_value(n.date_of_expiry))
        })
        .collect())
}

fn fetch_users(client: &ApiClient) -> Result<Vec<Record>> {
    let rows: Vec<User> = client.list_all(EntityKind::Users)?;
    Ok(rows
        .into_iter()
        .map(|u| {
            Record::new(u.id)
                .with_field("id", u.id.0 as f64)
                .with_field("username", u.username)
                .with_field("role", u.role)
        })
        .collect())
}

fn fetch_audit(client: &ApiClient) -> Result<Vec<Record>> {
    let rows: Vec<AuditEntry> = client.list_all(EntityKind::Audit)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, e)| {
            // Entries without a server id still need a unique row key
            let id = e.id.unwrap_or(RecordId(i as i64));
            let object_id = e
                .response_data
                .map(|d| {
                    d.ids
                        .iter()
                        .map(|n| n.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .filter(|s| !s.is_empty());
            Record::new(id)
                .with_field("user", e.user)
                .with_field("role", e.role)
                .with_field("ip_address", e.ip_address)
                .with_field("object_id", object_id)
                .with_field("action", e.action)
                .with_field("app", e.app)
                .with_field("path", e.path)
                .with_field("method", e.method)
                .with_field(
                    "status_code",
                    e.status_code.map(|c| Value::Number(c as f64)).unwrap_or(Value::Null),
                )
                .with_field("timestamp", datetime_value(e.timestamp))
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Row tone
// ---------------------------------------------------------------------------

/// Highlight niches within a year of their expiry date.
fn niche_tone(record: &Record) -> RowTone {
    let expiry = match record.get("date_of_expiry").as_display() {
        Some(s) => s,
        None => return RowTone::Normal,
    };
    let expiry = match NaiveDate::parse_from_str(&expiry, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => return RowTone::Normal,
    };

    let today = Utc::now().date_naive();
    let days = (expiry - today).num_days();
    if days <= 365 {
        RowTone::Warning
    } else {
        RowTone::Normal
    }
}

// ---------------------------------------------------------------------------
// Cell formatting
// ---------------------------------------------------------------------------

/// Render one cell for display.
///
/// IDs render padded (`#001`), other numbers as peso amounts with thousands
/// separators, dates as `M/D/YYYY` (with a time suffix when one is present).
pub fn render_cell(record: &Record, column: &ColumnSpec) -> String {
    let value = record.get(&column.key);
    let raw = match value.as_display() {
        Some(s) => s,
        None => return String::new(),
    };

    match column.ty {
        ColumnType::Number => match value {
            Value::Number(n) if column.key == "id" => format!("#{:03}", *n as i64),
            Value::Number(n) => format_peso(*n),
            _ => raw,
        },
        ColumnType::Date => format_date(&raw),
        ColumnType::Text => raw,
    }
}

/// `₱ 5,000.00` with thousands separators.
pub fn format_peso(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("₱ {sign}{grouped}.{frac:02}")
}

/// `M/D/YYYY`, plus `h:mm:ss am/pm` when a nonzero time is present.
fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let dt = dt.with_timezone(&Utc);
        let date = format!("{}/{}/{}", dt.month(), dt.day(), dt.year());
        if (dt.hour(), dt.minute(), dt.second()) == (0, 0, 0) {
            return date;
        }
        let (is_pm, hour12) = dt.hour12();
        return format!(
            "{date} {}:{:02}:{:02} {}",
            hour12,
            dt.minute(),
            dt.second(),
            if is_pm { "pm" } else { "am" }
        );
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return format!("{}/{}/{}", d.month(), d.day(), d.year());
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::filterable_columns;

    #[test]
    fn test_registry_covers_all_kinds() {
        let descriptors = all_descriptors();
        assert_eq!(descriptors.len(), cm_api::entity::ALL_KINDS.len());
        for (d, kind) in descriptors.iter().zip(cm_api::entity::ALL_KINDS) {
            assert_eq!(d.kind, *kind);
        }
    }

    #[test]
    fn test_audit_has_no_select_and_no_fields() {
        let d = descriptor(EntityKind::Audit);
        assert!(!d.has_select());
        assert!(d.fields.is_empty());
        assert!(!d.kind.is_mutable());
    }

    #[test]
    fn test_mutable_tabs_have_select_and_fields() {
        for d in all_descriptors() {
            if d.kind.is_mutable() {
                assert!(d.has_select(), "{} should have a checkbox column", d.title());
                assert!(!d.fields.is_empty(), "{} should have form fields", d.title());
            }
        }
    }

    #[test]
    fn test_select_never_filterable() {
        for d in all_descriptors() {
            for col in filterable_columns(&d.columns) {
                assert!(!col.is_select());
            }
        }
    }

    #[test]
    fn test_format_peso() {
        assert_eq!(format_peso(5000.0), "₱ 5,000.00");
        assert_eq!(format_peso(0.0), "₱ 0.00");
        assert_eq!(format_peso(1234567.5), "₱ 1,234,567.50");
        assert_eq!(format_peso(-25.75), "₱ -25.75");
    }

    #[test]
    fn test_render_cell_id_padding() {
        let col = ColumnSpec::new("Customer ID", "id", ColumnType::Number);
        let r = Record::new(RecordId(7)).with_field("id", 7.0);
        assert_eq!(render_cell(&r, &col), "#007");
    }

    #[test]
    fn test_render_cell_dates() {
        let col = ColumnSpec::new("Date Deceased", "deceased_date", ColumnType::Date);
        let r = Record::new(RecordId(1)).with_field("deceased_date", "2024-06-01");
        assert_eq!(render_cell(&r, &col), "6/1/2024");

        let col = ColumnSpec::new("Timestamp", "timestamp", ColumnType::Date);
        let r = Record::new(RecordId(1)).with_field("timestamp", "2024-06-01T10:30:00+00:00");
        assert_eq!(render_cell(&r, &col), "6/1/2024 10:30:00 am");
    }

    #[test]
    fn test_render_cell_null_is_empty() {
        let col = ColumnSpec::new("Email", "email", ColumnType::Text);
        let r = Record::new(RecordId(1));
        assert_eq!(render_cell(&r, &col), "");
    }

    #[test]
    fn test_niche_tone_warns_near_expiry() {
        let soon = (Utc::now().date_naive() + chrono::Duration::days(30))
            .format("%Y-%m-%d")
            .to_string();
        let far = (Utc::now().date_naive() + chrono::Duration::days(800))
            .format("%Y-%m-%d")
            .to_string();

        let near = Record::new(RecordId(1)).with_field("date_of_expiry", soon.as_str());
        let distant = Record::new(RecordId(2)).with_field("date_of_expiry", far.as_str());
        let vacant = Record::new(RecordId(3));

        assert_eq!(niche_tone(&near), RowTone::Warning);
        assert_eq!(niche_tone(&distant), RowTone::Normal);
        assert_eq!(niche_tone(&vacant), RowTone::Normal);
    }
}
