use chrono::NaiveDate;

use crate::error::{Result, VisitError};
use crate::store::{Client, ClientStore, VisitStore};

/// Field values collected for one visit, either typed or pre-filled from
/// a stored client
#[derive(Debug, Clone)]
pub struct VisitForm {
    pub date: NaiveDate,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub locality: String,
    pub zone: String,
    pub subject: String,
}

/// Outcome of a saved visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Whether the client was new and got saved to the clients file
    pub client_saved: bool,
}

impl VisitForm {
    pub fn from_client(date: NaiveDate, client: &Client, subject: &str) -> Self {
        Self {
            date,
            name: client.name.clone(),
            company: client.company.clone(),
            phone: client.phone.clone(),
            locality: client.locality.clone(),
            zone: client.zone.clone(),
            subject: subject.to_string(),
        }
    }

    /// Names of required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        blank_fields(&[
            ("Nombre", self.name.as_str()),
            ("Empresa", self.company.as_str()),
            ("Localidad", self.locality.as_str()),
            ("Asunto", self.subject.as_str()),
        ])
    }
}

fn blank_fields(fields: &[(&'static str, &str)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect()
}

/// Save a client on its own, outside a visit.
///
/// Name, company and locality must be filled in; returns whether the client
/// was new.
pub fn add_client(
    clients: &mut ClientStore,
    name: &str,
    company: &str,
    phone: &str,
    locality: &str,
    zone: &str,
) -> Result<bool> {
    let missing = blank_fields(&[
        ("Nombre", name),
        ("Empresa", company),
        ("Localidad", locality),
    ]);
    if !missing.is_empty() {
        return Err(VisitError::MissingFields(missing));
    }

    clients.upsert(name, company, phone, locality, zone)
}

/// Save the client if it is new, then append the visit.
///
/// Nothing is written when a required field is missing.
pub fn register_visit(
    clients: &mut ClientStore,
    visits: &mut VisitStore,
    form: &VisitForm,
) -> Result<Registration> {
    let missing = form.missing_fields();
    if !missing.is_empty() {
        return Err(VisitError::MissingFields(missing));
    }

    let client_saved = clients.upsert(
        &form.name,
        &form.company,
        &form.phone,
        &form.locality,
        &form.zone,
    )?;
    visits.append(
        form.date,
        &form.name,
        &form.company,
        &form.phone,
        &form.locality,
        &form.zone,
        &form.subject,
    )?;

    Ok(Registration { client_saved })
}
