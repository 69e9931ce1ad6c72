use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{clean, Client, Table};
use crate::error::Result;
use crate::query::{FilterOptions, VisitFilter};

/// One registered visit. Client fields are copied at registration time,
/// so later changes to the client record do not touch past visits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Visit {
    #[serde(rename = "Fecha")]
    pub date: NaiveDate,
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
    #[serde(rename = "Asunto")]
    pub subject: String,
}

impl Visit {
    /// Snapshot of a client's fields for a visit on `date`
    pub fn for_client(date: NaiveDate, client: &Client, subject: &str) -> Self {
        Self {
            date,
            name: clean(&client.name),
            company: clean(&client.company),
            phone: clean(&client.phone),
            locality: clean(&client.locality),
            zone: clean(&client.zone),
            subject: clean(subject),
        }
    }
}

/// Append-only visit log
pub struct VisitStore {
    table: Table<Visit>,
}

impl VisitStore {
    pub const HEADERS: &'static [&'static str] = &[
        "Fecha",
        "Nombre",
        "Empresa",
        "Tlf",
        "Localidad",
        "Zona",
        "Asunto",
    ];

    /// Load the visits file, creating an empty one if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let table = Table::open(path.into(), Self::HEADERS)?;
        Ok(Self { table })
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    /// All visits in insertion order
    pub fn list(&self) -> &[Visit] {
        self.table.rows()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Append a visit and rewrite the file. Duplicates are allowed.
    #[allow(clippy::too_many_arguments)]
    pub fn append(
        &mut self,
        date: NaiveDate,
        name: &str,
        company: &str,
        phone: &str,
        locality: &str,
        zone: &str,
        subject: &str,
    ) -> Result<()> {
        let visit = Visit::for_client(
            date,
            &Client::new(name, company, phone, locality, zone),
            subject,
        );

        tracing::info!(date = %visit.date, name = %visit.name, company = %visit.company, "appending visit");
        self.table.push(visit)
    }

    /// Visits matching `filter`, most recent first.
    ///
    /// The sort is stable: visits sharing a date stay in insertion order.
    pub fn query(&self, filter: &VisitFilter) -> Vec<Visit> {
        let mut rows: Vec<Visit> = self
            .list()
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    /// Distinct values offered by each filter
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_visits(self.list())
    }

    /// Rewrite the visits file from memory
    pub fn persist(&self) -> Result<()> {
        self.table.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Selection;
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_store(dir: &TempDir) -> VisitStore {
        VisitStore::open(dir.path().join("citas.csv")).unwrap()
    }

    fn add(store: &mut VisitStore, when: NaiveDate, name: &str, locality: &str, subject: &str) {
        store
            .append(when, name, "Acme", "555-0100", locality, "North", subject)
            .unwrap();
    }

    #[test]
    fn missing_file_is_created_with_header() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(store.is_empty());
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content.trim_end(),
            "Fecha,Nombre,Empresa,Tlf,Localidad,Zona,Asunto"
        );
    }

    #[test]
    fn append_stores_iso_date_and_trimmed_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store
            .append(
                date(2024, 3, 1),
                " Ana Ruiz ",
                "Acme ",
                "555-0100",
                " Madrid",
                "North",
                "  Quarterly review  ",
            )
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("2024-03-01,Ana Ruiz,Acme,555-0100,Madrid,North,Quarterly review"));
    }

    #[test]
    fn duplicates_are_kept() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        add(&mut store, date(2024, 3, 1), "Ana Ruiz", "Madrid", "Review");
        add(&mut store, date(2024, 3, 1), "Ana Ruiz", "Madrid", "Review");

        assert_eq!(store.len(), 2);
        assert_eq!(open_store(&dir).len(), 2);
    }

    #[test]
    fn unfiltered_query_is_newest_first_and_stable() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        add(&mut store, date(2024, 1, 10), "Ana Ruiz", "Madrid", "first");
        add(&mut store, date(2024, 3, 1), "Ana Ruiz", "Madrid", "second");
        add(&mut store, date(2024, 1, 10), "Luis Gil", "Bilbao", "third");
        add(&mut store, date(2024, 3, 1), "Luis Gil", "Bilbao", "fourth");

        let subjects: Vec<_> = store
            .query(&VisitFilter::default())
            .into_iter()
            .map(|v| v.subject)
            .collect();
        assert_eq!(subjects, vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn min_date_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        add(&mut store, date(2024, 2, 29), "Ana Ruiz", "Madrid", "before");
        add(&mut store, date(2024, 3, 1), "Ana Ruiz", "Madrid", "on");
        add(&mut store, date(2024, 3, 2), "Ana Ruiz", "Madrid", "after");

        let filter = VisitFilter {
            min_date: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        let subjects: Vec<_> = store.query(&filter).into_iter().map(|v| v.subject).collect();
        assert_eq!(subjects, vec!["after", "on"]);
    }

    #[test]
    fn scenario_single_visit() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store
            .append(
                date(2024, 3, 1),
                "Ana Ruiz",
                "Acme",
                "555-0100",
                "Madrid",
                "North",
                "Quarterly review",
            )
            .unwrap();

        let since_january = store.query(&VisitFilter {
            min_date: Some(date(2024, 1, 1)),
            ..Default::default()
        });
        assert_eq!(since_january.len(), 1);
        assert_eq!(since_january[0].date, date(2024, 3, 1));
        assert_eq!(since_january[0].subject, "Quarterly review");

        let since_april = store.query(&VisitFilter {
            min_date: Some(date(2024, 4, 1)),
            ..Default::default()
        });
        assert!(since_april.is_empty());
    }

    #[test]
    fn column_filters_combine() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        add(&mut store, date(2024, 3, 1), "Ana Ruiz", "Madrid", "a");
        add(&mut store, date(2024, 3, 2), "Ana Ruiz", "Bilbao", "b");
        add(&mut store, date(2024, 3, 3), "Luis Gil", "Madrid", "c");

        let filter = VisitFilter {
            name: Selection::Exact("Ana Ruiz".into()),
            locality: Selection::Exact("Madrid".into()),
            ..Default::default()
        };
        let rows = store.query(&filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "a");

        let by_zone = VisitFilter {
            zone: Selection::Exact("South".into()),
            ..Default::default()
        };
        assert!(store.query(&by_zone).is_empty());
    }

    #[test]
    fn visits_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&dir);
            add(&mut store, date(2024, 3, 1), "Ana Ruiz", "Madrid", "Quarterly review");
        }

        let store = open_store(&dir);
        assert_eq!(store.list()[0].date, date(2024, 3, 1));
        assert_eq!(store.list()[0].subject, "Quarterly review");
    }

    #[test]
    fn failed_write_leaves_log_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        add(&mut store, date(2024, 3, 1), "Ana Ruiz", "Madrid", "kept");

        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();

        let result = store.append(
            date(2024, 3, 2),
            "Ana Ruiz",
            "Acme",
            "",
            "Madrid",
            "",
            "lost",
        );
        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].subject, "kept");
    }

    #[test]
    fn unknown_columns_survive_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("citas.csv");
        fs::write(
            &path,
            "Fecha,Nombre,Empresa,Tlf,Localidad,Zona,Asunto,Resultado\n\
             2024-03-01,Ana Ruiz,Acme,,Madrid,North,Review,signed\n",
        )
        .unwrap();

        let mut store = VisitStore::open(&path).unwrap();
        add(&mut store, date(2024, 3, 2), "Ana Ruiz", "Madrid", "Follow-up");

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Fecha,Nombre,Empresa,Tlf,Localidad,Zona,Asunto,Resultado\n"));
        assert!(content.contains("2024-03-01,Ana Ruiz,Acme,,Madrid,North,Review,signed\n"));
        assert!(content.contains("2024-03-02,Ana Ruiz,Acme,555-0100,Madrid,North,Follow-up,\n"));
    }
}
