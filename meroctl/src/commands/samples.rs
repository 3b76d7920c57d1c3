use crate::{
    cli::{Commands, OutputOptions, ViewArgs},
    config::Config,
    output::{
        OutputFormat,
        rows::{FilterRow, LatestRow, SampleRow, SampleRowDetails, SampleRowFull},
        table::MeroctlTable,
    },
};
use anyhow::{Result, anyhow};
use libmero::{
    ValidationError,
    sample::{self, MAX_NUMBER, ProjectTag, Sample},
    store::SampleStore,
    view::{FilterTag, ViewParams},
};
use tabled::Table;
use tracing::debug;

pub(crate) fn handle_command(
    command: Commands,
    store: &mut SampleStore,
    cfg: &Config,
) -> Result<()> {
    match command {
        Commands::List { view, output } => {
            let params = view_params(view, cfg);
            debug!(?params, "listing samples");
            let samples = params.apply(store.samples());
            println!("{}", format_listing(&samples, &output, cfg)?);
            Ok(())
        }
        Commands::Show { id, output } => {
            match store.find(&id) {
                Some(sample) => {
                    println!("{}", format_details(sample, output_format(&output, cfg))?)
                }
                None => println!("Sample {id} not found"),
            }
            Ok(())
        }
        Commands::Latest { output } => {
            match format_latest(store, output_format(&output, cfg))? {
                Some(str) => println!("{str}"),
                None => println!("No samples have been registered"),
            }
            Ok(())
        }
        Commands::DeriveId {
            project,
            project_number,
            sample_number,
            sem,
            isolated,
        } => {
            println!(
                "{}",
                derive_id(project, project_number, sample_number, sem, isolated)?
            );
            Ok(())
        }
        Commands::Filters => {
            let mut table = Table::new(FilterTag::all_tags().into_iter().map(FilterRow::from));
            println!("{}", table.styled());
            Ok(())
        }
        Commands::Session => super::session::run(store, cfg),
        Commands::Config { .. } | Commands::Login | Commands::Completions { .. } => Err(anyhow!(
            "Command does not operate on the sample store"
        )),
    }
}

/// Build the view parameters for a listing, falling back to the configured sort order
pub(crate) fn view_params(view: ViewArgs, cfg: &Config) -> ViewParams {
    ViewParams::new()
        .with_search(view.search.unwrap_or_default())
        .with_filter(view.filter.unwrap_or_default())
        .with_range(view.from, view.to)
        .with_sort(view.sort.unwrap_or(cfg.default_sort))
}

fn output_format(output: &OutputOptions, cfg: &Config) -> OutputFormat {
    output.output.unwrap_or(cfg.output)
}

pub(crate) fn format_listing(
    samples: &[&Sample],
    output: &OutputOptions,
    cfg: &Config,
) -> Result<String> {
    let format = output_format(output, cfg);
    match output.full {
        true => format.present_all(samples.iter().copied().map(SampleRowFull::from)),
        false => format.present_all(samples.iter().copied().map(SampleRow::from)),
    }
}

pub(crate) fn format_details(sample: &Sample, format: OutputFormat) -> Result<String> {
    format.present(SampleRowDetails::from(sample))
}

/// The most recently registered sample and the most recently saved one, or `None` if the store
/// is empty
pub(crate) fn format_latest(store: &SampleStore, format: OutputFormat) -> Result<Option<String>> {
    let Some(latest) = store.latest() else {
        return Ok(None);
    };
    let mut rows = vec![LatestRow::new("Registered", latest)];
    if let Some(edited) = store.latest_edited() {
        rows.push(LatestRow::new("Edited", edited));
    }
    format.present_all(rows).map(Some)
}

fn derive_id(
    project: ProjectTag,
    project_number: u32,
    sample_number: u32,
    sem: bool,
    isolated: bool,
) -> Result<String> {
    for (field, value) in [
        ("project number", project_number),
        ("sample number", sample_number),
    ] {
        if value > MAX_NUMBER {
            return Err(ValidationError::NumberOutOfRange { field, value }.into());
        }
    }
    Ok(sample::derive_id(
        project,
        project_number,
        sample_number,
        sem,
        isolated,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use libmero::{sample::Draft, taxonomy::Taxonomy};
    use test_log::test;
    use time::macros::date;

    fn store() -> SampleStore {
        let mut store = SampleStore::seeded();
        store
            .register(Draft {
                name: "Branching sponge".to_string(),
                project: ProjectTag::B,
                project_number: Some(3),
                sample_number: Some(27),
                taxonomy: Taxonomy::new("Animalia", "Callyspongiidae", "", ""),
                acquired: Some(date!(2025 - 09 - 02)),
                ..Default::default()
            })
            .unwrap();
        store
    }

    fn csv_output() -> OutputOptions {
        OutputOptions {
            full: false,
            output: Some(OutputFormat::Csv),
        }
    }

    #[test]
    fn test_view_params() {
        let cfg = Config {
            default_sort: libmero::view::SortOrder::Oldest,
            ..Default::default()
        };
        let params = view_params(ViewArgs::default(), &cfg);
        assert_eq!(
            params,
            ViewParams::new().with_sort(libmero::view::SortOrder::Oldest)
        );
    }

    #[test]
    fn test_format_listing() {
        let store = store();
        let cfg = Config::default();
        let params = view_params(
            ViewArgs {
                search: Some("sponge".to_string()),
                ..Default::default()
            },
            &cfg,
        );
        let samples = params.apply(store.samples());
        let out = format_listing(&samples, &csv_output(), &cfg).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("id,name,species,image,edited"));
        assert!(lines.next().unwrap().starts_with("B-0003-0027,Branching sponge,,No Image,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_format_listing_sorted() {
        let store = store();
        let cfg = Config::default();
        let samples = view_params(ViewArgs::default(), &cfg).apply(store.samples());
        let out = format_listing(&samples, &csv_output(), &cfg).unwrap();
        let ids: Vec<&str> = out
            .lines()
            .skip(1)
            .filter_map(|l| l.split(',').next())
            .collect();
        // the new sample was edited just now, the seed sample in 2025
        assert_eq!(ids, vec!["B-0003-0027", "A-0012-0001"]);
    }

    #[test]
    fn test_format_latest() {
        assert_eq!(
            format_latest(&SampleStore::new(), OutputFormat::Json).unwrap(),
            None
        );

        let out = format_latest(&SampleStore::seeded(), OutputFormat::Csv)
            .unwrap()
            .unwrap();
        assert_eq!(out.lines().count(), 2);

        let out = format_latest(&store(), OutputFormat::Csv).unwrap().unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Registered,B-0003-0027,"));
        assert!(lines[2].starts_with("Edited,B-0003-0027,"));
    }

    #[test]
    fn test_format_details() {
        let store = store();
        let out = format_details(store.find("a-0012-0001").unwrap(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["id"], "A-0012-0001");
        assert_eq!(value["acquired"], "2025-08-31");
        assert_eq!(value["photos"], serde_json::json!([]));
        assert!(format_details(store.latest().unwrap(), OutputFormat::Csv).is_err());
    }

    #[test]
    fn test_derive_id() {
        assert_eq!(
            derive_id(ProjectTag::A, 12, 1, true, true).unwrap(),
            "A-0012-0001-SEM-ISO"
        );
        let err = derive_id(ProjectTag::A, 10000, 1, false, false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NumberOutOfRange {
                field: "project number",
                value: 10000
            })
        );
        let err = derive_id(ProjectTag::B, 1, 10000, false, false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NumberOutOfRange {
                field: "sample number",
                value: 10000
            })
        );
    }
}
