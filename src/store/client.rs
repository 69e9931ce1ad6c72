use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{clean, Table};
use crate::error::Result;

/// A client as stored in the clients file.
///
/// Identity is the (name, company) pair; phone, locality and zone are
/// descriptive only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Client {
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Empresa")]
    pub company: String,
    #[serde(rename = "Tlf", default)]
    pub phone: String,
    #[serde(rename = "Localidad")]
    pub locality: String,
    #[serde(rename = "Zona", default)]
    pub zone: String,
}

impl Client {
    pub fn new(name: &str, company: &str, phone: &str, locality: &str, zone: &str) -> Self {
        Self {
            name: clean(name),
            company: clean(company),
            phone: clean(phone),
            locality: clean(locality),
            zone: clean(zone),
        }
    }

    fn is(&self, name: &str, company: &str) -> bool {
        self.name == name && self.company == company
    }
}

pub struct ClientStore {
    table: Table<Client>,
}

impl ClientStore {
    pub const HEADERS: &'static [&'static str] = &["Nombre", "Empresa", "Tlf", "Localidad", "Zona"];

    /// Load the clients file, creating an empty one if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let table = Table::open(path.into(), Self::HEADERS)?;
        Ok(Self { table })
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    /// All clients in insertion order
    pub fn list(&self) -> &[Client] {
        self.table.rows()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// First client with this exact name.
    ///
    /// Two clients may share a name across companies; only the first one
    /// stored is returned.
    pub fn find_by_name(&self, name: &str) -> Option<&Client> {
        let name = name.trim();
        self.list().iter().find(|c| c.name == name)
    }

    pub fn find(&self, name: &str, company: &str) -> Option<&Client> {
        let (name, company) = (name.trim(), company.trim());
        self.list().iter().find(|c| c.is(name, company))
    }

    /// Distinct, sorted client names for a selection list
    pub fn names(&self) -> Vec<&str> {
        self.list()
            .iter()
            .map(|c| c.name.as_str())
            .filter(|n| !n.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Insert the client unless one with the same (name, company) exists.
    ///
    /// Returns `true` when a record was added. An existing record keeps its
    /// phone, locality and zone even if the new values differ.
    pub fn upsert(
        &mut self,
        name: &str,
        company: &str,
        phone: &str,
        locality: &str,
        zone: &str,
    ) -> Result<bool> {
        let client = Client::new(name, company, phone, locality, zone);

        if self.find(&client.name, &client.company).is_some() {
            tracing::debug!(name = %client.name, company = %client.company, "client already stored");
            return Ok(false);
        }

        tracing::info!(name = %client.name, company = %client.company, "saving new client");
        self.table.push(client)?;
        Ok(true)
    }

    /// Rewrite the clients file from memory
    pub fn persist(&self) -> Result<()> {
        self.table.persist()
    }
}
