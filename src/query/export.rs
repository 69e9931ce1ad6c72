use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::date;
use crate::error::Result;
use crate::store::{write_csv, Visit, VisitStore};

/// A visit as it appears in an export: same columns as the visits file,
/// date written day-first
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Fecha")]
    pub date: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Empresa")]
    pub company: String,
    #[serde(rename = "Tlf")]
    pub phone: String,
    #[serde(rename = "Localidad")]
    pub locality: String,
    #[serde(rename = "Zona")]
    pub zone: String,
    #[serde(rename = "Asunto")]
    pub subject: String,
}

impl From<&Visit> for ExportRow {
    fn from(visit: &Visit) -> Self {
        Self {
            date: date::display(visit.date),
            name: visit.name.clone(),
            company: visit.company.clone(),
            phone: visit.phone.clone(),
            locality: visit.locality.clone(),
            zone: visit.zone.clone(),
            subject: visit.subject.clone(),
        }
    }
}

/// Serialize visits, in the given order, to UTF-8 CSV with a header row
pub fn export_csv(visits: &[Visit]) -> Result<Vec<u8>> {
    let rows: Vec<ExportRow> = visits.iter().map(ExportRow::from).collect();
    write_csv(VisitStore::HEADERS, &rows)
}

/// Write an export to `path`, returning the number of visits written
pub fn export_to_file(path: &Path, visits: &[Visit]) -> Result<usize> {
    let bytes = export_csv(visits)?;
    fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), rows = visits.len(), "exported visits");
    Ok(visits.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn visit(day: u32, subject: &str) -> Visit {
        Visit {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            name: "Ana Ruiz".into(),
            company: "Acme, S.L.".into(),
            phone: "555-0100".into(),
            locality: "Madrid".into(),
            zone: "".into(),
            subject: subject.into(),
        }
    }

    #[test]
    fn header_and_day_first_dates() {
        let bytes = export_csv(&[visit(1, "Quarterly review")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("Fecha,Nombre,Empresa,Tlf,Localidad,Zona,Asunto")
        );
        assert_eq!(
            lines.next(),
            Some("01/03/2024,Ana Ruiz,\"Acme, S.L.\",555-0100,Madrid,,Quarterly review")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_export_still_has_header() {
        let text = String::from_utf8(export_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "Fecha,Nombre,Empresa,Tlf,Localidad,Zona,Asunto\n");
    }

    #[test]
    fn reparsed_export_recovers_every_field() {
        let visits = vec![
            visit(3, "Pricing, \"final\" offer"),
            visit(1, "Ñandú y café\nsecond line"),
        ];
        let bytes = export_csv(&visits).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<ExportRow> = reader
            .deserialize::<ExportRow>()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(rows.len(), visits.len());
        for (row, visit) in rows.iter().zip(&visits) {
            assert_eq!(
                NaiveDate::parse_from_str(&row.date, date::DISPLAY_FORMAT).unwrap(),
                visit.date
            );
            assert_eq!(row, &ExportRow::from(visit));
            assert_eq!(row.subject, visit.subject);
        }
    }
}
