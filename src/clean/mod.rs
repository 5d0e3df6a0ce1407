//! The cleaning pipeline: download, filter, transform, publish.
//!
//! Steps run in a fixed sequence with one log line per boundary,
//! mirroring the step order the rest of the pipeline expects. Any
//! failure aborts the run; files already written stay on disk.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TableError;
use crate::store::{ArtifactDraft, StoreClient};
use crate::table::Table;

/// Job type recorded on the run context.
const JOB_TYPE: &str = "basic_cleaning";

/// Name of the cleaned dataset file, overwritten on each run.
pub const OUTPUT_FILE: &str = "clean_sample.csv";

/// NYC bounding box: rows outside are geographically invalid and dropped.
pub const LONGITUDE_RANGE: (f64, f64) = (-74.25, -73.50);
pub const LATITUDE_RANGE: (f64, f64) = (40.5, 41.2);

/// Resolved arguments for one cleaning run, attached to the run context
/// for provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    pub input_artifact: String,
    pub output_artifact: String,
    pub output_type: String,
    pub output_description: String,
    pub min_price: f64,
    pub max_price: f64,
}

/// Row accounting from the in-memory transforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCounts {
    /// Rows dropped by the price range filter.
    pub dropped_price: usize,
    /// Rows dropped by the bounding-box filter.
    pub dropped_geo: usize,
    /// `last_review` cells nulled because they could not be parsed.
    pub unparseable_dates: usize,
}

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub counts: FilterCounts,
    pub published_artifact: String,
    pub published_version: String,
}

/// Applies the in-memory cleaning transforms to a parsed table, in
/// order: price range filter, `last_review` datetime coercion, NYC
/// bounding-box filter.
///
/// A table missing any of the `price`, `last_review`, `longitude` or
/// `latitude` columns fails at the step that needs it.
pub fn apply_filters(
    table: &mut Table,
    min_price: f64,
    max_price: f64,
) -> Result<FilterCounts, TableError> {
    let mut counts = FilterCounts::default();

    info!(min_price, max_price, "Dropping price outliers");
    counts.dropped_price = table.retain_numeric_range("price", min_price, max_price)?;

    info!("Converting last_review to datetime");
    counts.unparseable_dates = table.coerce_datetime("last_review")?;

    info!("Dropping rows outside the NYC bounding box");
    counts.dropped_geo = table.retain_numeric_range(
        "longitude",
        LONGITUDE_RANGE.0,
        LONGITUDE_RANGE.1,
    )?;
    counts.dropped_geo +=
        table.retain_numeric_range("latitude", LATITUDE_RANGE.0, LATITUDE_RANGE.1)?;

    Ok(counts)
}

/// Runs the cleaning step end to end.
///
/// Downloads the input artifact into `work_dir`, cleans it, writes
/// `clean_sample.csv` next to it, publishes the result and finishes the
/// run. Strictly sequential; every error propagates to the caller.
pub async fn run(
    client: &StoreClient,
    config: CleanConfig,
    work_dir: &Path,
) -> anyhow::Result<CleanReport> {
    info!("Starting step: basic_cleaning");
    let run = client.init_run(JOB_TYPE).await?;
    client.log_run_config(&run, &config).await?;

    info!(artifact = %config.input_artifact, "Downloading artifact");
    let handle = client.resolve_artifact(&config.input_artifact).await?;
    let local_path = client.download_file(&handle, work_dir).await?;

    info!(path = %local_path.display(), "Reading the downloaded file");
    let mut table = Table::read_csv(&local_path)?;
    let rows_in = table.len();

    let counts = apply_filters(&mut table, config.min_price, config.max_price)?;

    let output_path = work_dir.join(OUTPUT_FILE);
    info!(path = %output_path.display(), rows = table.len(), "Saving cleaned file");
    table.write_csv(&output_path)?;

    let mut draft = ArtifactDraft::new(
        &config.output_artifact,
        &config.output_type,
        &config.output_description,
    );
    draft.add_file(&output_path)?;

    info!(artifact = %config.output_artifact, "Publishing cleaned dataset");
    let published = client.publish(&run, &draft).await?;
    client.finish_run(&run).await?;
    info!("Finished step: basic_cleaning");

    Ok(CleanReport {
        rows_in,
        rows_out: table.len(),
        counts,
        published_artifact: published.name,
        published_version: published.version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["id", "price", "longitude", "latitude", "last_review"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_price_filter_keeps_in_range_row() {
        let mut table = Table::from_rows(
            headers(),
            vec![
                row(&["1", "50", "-73.9", "40.7", "2019-01-01"]),
                row(&["2", "9999", "-73.9", "40.7", "2019-01-01"]),
            ],
        );

        let counts = apply_filters(&mut table, 10.0, 100.0).unwrap();
        assert_eq!(counts.dropped_price, 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][0], "1");
    }

    #[test]
    fn test_bounding_box_excludes_row_regardless_of_price() {
        let mut table = Table::from_rows(
            headers(),
            vec![row(&["1", "50", "-80", "40.7", "2019-01-01"])],
        );

        let counts = apply_filters(&mut table, 10.0, 100.0).unwrap();
        assert_eq!(counts.dropped_price, 0);
        assert_eq!(counts.dropped_geo, 1);
        assert!(table.is_empty());
    }

    #[test]
    fn test_inverted_price_bounds_yield_empty_table() {
        let mut table = Table::from_rows(
            headers(),
            vec![
                row(&["1", "50", "-73.9", "40.7", "2019-01-01"]),
                row(&["2", "60", "-73.9", "40.7", "2019-01-01"]),
            ],
        );

        let counts = apply_filters(&mut table, 100.0, 10.0).unwrap();
        assert_eq!(counts.dropped_price, 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_output_rows_satisfy_all_bounds() {
        let mut table = Table::from_rows(
            headers(),
            vec![
                row(&["1", "50", "-73.9", "40.7", "2019-01-01"]),
                row(&["2", "5", "-73.9", "40.7", "2019-01-01"]),
                row(&["3", "80", "-74.5", "40.7", "2019-01-01"]),
                row(&["4", "80", "-73.9", "42.0", "2019-01-01"]),
                row(&["5", "99", "-73.6", "41.0", "2019-01-01"]),
            ],
        );

        apply_filters(&mut table, 10.0, 100.0).unwrap();

        for r in table.rows() {
            let price: f64 = r[1].parse().unwrap();
            let longitude: f64 = r[2].parse().unwrap();
            let latitude: f64 = r[3].parse().unwrap();
            assert!((10.0..=100.0).contains(&price));
            assert!((LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude));
            assert!((LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude));
        }
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unparseable_date_nulls_cell_but_keeps_row() {
        let mut table = Table::from_rows(
            headers(),
            vec![row(&["1", "50", "-73.9", "40.7", "never reviewed"])],
        );

        let counts = apply_filters(&mut table, 10.0, 100.0).unwrap();
        assert_eq!(counts.unparseable_dates, 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][4], "");
    }

    #[test]
    fn test_missing_price_column_fails() {
        let mut table = Table::from_rows(
            vec!["id".to_string(), "longitude".to_string()],
            vec![row(&["1", "-73.9"])],
        );

        let err = apply_filters(&mut table, 10.0, 100.0).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(ref c) if c == "price"));
    }

    #[test]
    fn test_filters_preserve_columns() {
        let mut table = Table::from_rows(
            headers(),
            vec![row(&["1", "50", "-73.9", "40.7", "2019-01-01"])],
        );

        apply_filters(&mut table, 10.0, 100.0).unwrap();
        assert_eq!(table.headers(), headers().as_slice());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = CleanConfig {
            input_artifact: "sample.csv:latest".to_string(),
            output_artifact: "clean_sample.csv".to_string(),
            output_type: "clean_sample".to_string(),
            output_description: "Cleaned listings".to_string(),
            min_price: 10.0,
            max_price: 350.0,
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: CleanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.input_artifact, config.input_artifact);
        assert_eq!(back.max_price, config.max_price);
    }
}
