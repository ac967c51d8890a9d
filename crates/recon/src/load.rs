//! CSV tables → untagged site rows.

use crate::config::ColumnMapping;
use crate::error::WatchError;
use crate::model::{ExposureTables, RiskTier, SiteRow};

/// Load one tier's CSV using the column mapping. `notes` may be absent;
/// the other mapped columns are required. Unmapped columns are kept in order.
pub fn load_csv_rows(
    tier: RiskTier,
    csv_data: &str,
    columns: &ColumnMapping,
) -> Result<Vec<SiteRow>, WatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let csv_err = |e: csv::Error| WatchError::Csv {
        tier,
        message: e.to_string(),
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let find = |name: &str| headers.iter().position(|h| h == name.trim());
    let idx = |name: &str| -> Result<usize, WatchError> {
        find(name).ok_or_else(|| WatchError::MissingColumn {
            tier,
            column: name.into(),
        })
    };

    let location_idx = idx(&columns.location)?;
    let period_idx = idx(&columns.exposure_period)?;
    let site_idx = idx(&columns.site)?;
    let notes_idx = find(&columns.notes);

    let mapped = [Some(location_idx), Some(period_idx), Some(site_idx), notes_idx];

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !mapped.contains(&Some(*i)))
            .map(|(i, h)| (h.clone(), field(i)))
            .collect();

        rows.push(SiteRow {
            location: field(location_idx),
            exposure_period: field(period_idx),
            site: field(site_idx),
            notes: notes_idx.map(field).unwrap_or_default(),
            extra,
        });
    }

    Ok(rows)
}

/// Load all three tiers. `read` supplies the CSV text for a tier.
pub fn load_tables<F>(columns: &ColumnMapping, mut read: F) -> Result<ExposureTables, WatchError>
where
    F: FnMut(RiskTier) -> Result<String, WatchError>,
{
    let mut tables = ExposureTables::default();
    for tier in RiskTier::ALL {
        let csv_data = read(tier)?;
        *tables.tier_mut(tier) = load_csv_rows(tier, &csv_data, columns)?;
        tracing::debug!(%tier, rows = tables.tier(tier).len(), "loaded table");
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH: &str = "\
Location,Exposure period,Site,Notes
Melbourne,\"11:00am-1:00pm 02/01/2021\",Cafe,Case attended
Richmond,30/12/2020 - 31/12/2020,Gym,Anyone present
";

    #[test]
    fn load_basic() {
        let rows = load_csv_rows(RiskTier::High, HIGH, &ColumnMapping::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "Melbourne");
        assert_eq!(rows[0].exposure_period, "11:00am-1:00pm 02/01/2021");
        assert_eq!(rows[0].site, "Cafe");
        assert_eq!(rows[0].notes, "Case attended");
        assert!(rows[0].extra.is_empty());
        assert_eq!(rows[1].exposure_period, "30/12/2020 - 31/12/2020");
    }

    #[test]
    fn extra_columns_kept_in_order() {
        let csv = "\
Suburb,Location,Exposure period,Site,Notes,Added
Carlton,Melbourne,02/01/2021,Cafe,,01/02/21
";
        let rows = load_csv_rows(RiskTier::Low, csv, &ColumnMapping::default()).unwrap();
        assert_eq!(
            rows[0].extra,
            vec![
                ("Suburb".to_string(), "Carlton".to_string()),
                ("Added".to_string(), "01/02/21".to_string()),
            ]
        );
        assert_eq!(rows[0].notes, "");
    }

    #[test]
    fn notes_column_optional() {
        let csv = "Location,Exposure period,Site\nMelbourne,02/01/2021,Cafe\n";
        let rows = load_csv_rows(RiskTier::Medium, csv, &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].notes, "");
    }

    #[test]
    fn missing_required_column() {
        let csv = "Location,Site,Notes\nMelbourne,Cafe,\n";
        let err = load_csv_rows(RiskTier::Medium, csv, &ColumnMapping::default()).unwrap_err();
        assert_eq!(
            err,
            WatchError::MissingColumn {
                tier: RiskTier::Medium,
                column: "Exposure period".into(),
            }
        );
        assert!(err.to_string().starts_with("medium table"));
    }

    #[test]
    fn custom_column_names_and_padded_headers() {
        let csv = " Place , When ,Venue\nMelbourne,02/01/2021,Cafe\n";
        let columns = ColumnMapping {
            location: "Place".into(),
            exposure_period: "When".into(),
            site: "Venue".into(),
            notes: "Notes".into(),
        };
        let rows = load_csv_rows(RiskTier::High, csv, &columns).unwrap();
        assert_eq!(rows[0].exposure_period, "02/01/2021");
    }

    #[test]
    fn short_rows_are_padded() {
        let csv = "Location,Exposure period,Site,Notes\nMelbourne,02/01/2021\n";
        let rows = load_csv_rows(RiskTier::High, csv, &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].site, "");
    }

    #[test]
    fn load_tables_reads_each_tier_once() {
        let mut seen = Vec::new();
        let tables = load_tables(&ColumnMapping::default(), |tier| {
            seen.push(tier);
            Ok(HIGH.to_string())
        })
        .unwrap();
        assert_eq!(seen, RiskTier::ALL.to_vec());
        assert_eq!(tables.len(), 6);
    }

    #[test]
    fn load_tables_propagates_reader_error() {
        let err = load_tables(&ColumnMapping::default(), |_| {
            Err(WatchError::Io("gone".into()))
        })
        .unwrap_err();
        assert_eq!(err, WatchError::Io("gone".into()));
    }
}
