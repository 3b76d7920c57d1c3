use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use libmero::{
    core::timestamp,
    sample::ProjectTag,
    view::{FilterTag, SortOrder},
};
use std::path::PathBuf;
use time::Date;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file to use instead of the default location"
    )]
    pub(crate) config: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    #[command(about = "List samples, optionally searching, filtering and sorting them")]
    List {
        #[command(flatten)]
        view: ViewArgs,
        #[command(flatten)]
        output: OutputOptions,
    },
    #[command(about = "Show all details about a single sample")]
    Show {
        #[arg(help = "The derived ID of the sample, e.g. A-0012-0001")]
        id: String,
        #[command(flatten)]
        output: OutputOptions,
    },
    #[command(about = "Show the most recently registered and most recently edited samples")]
    Latest {
        #[command(flatten)]
        output: OutputOptions,
    },
    #[command(about = "Print the sample ID that the given attributes would produce")]
    DeriveId {
        #[arg(short, long, default_value_t = ProjectTag::A)]
        project: ProjectTag,
        #[arg(long)]
        project_number: u32,
        #[arg(long)]
        sample_number: u32,
        #[arg(long, help = "The sample has an SEM photo")]
        sem: bool,
        #[arg(long, help = "The sample has an isolated photo")]
        isolated: bool,
    },
    #[command(about = "List all of the category filters that can be used with --filter")]
    Filters,
    #[command(about = "Start an interactive session for registering and editing samples")]
    Session,
    #[command(about = "Show the effective configuration")]
    Config {
        #[arg(long, help = "Write the effective configuration to the config file")]
        save: bool,
    },
    #[command(about = "Log in to the catalog")]
    Login,
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ViewArgs {
    #[arg(
        short,
        long,
        help = "Only show samples whose name, species, genus, family or ID contains this text"
    )]
    pub(crate) search: Option<String>,
    #[arg(
        short = 'F',
        long,
        help = "Only show samples in this category (see the 'filters' command)"
    )]
    pub(crate) filter: Option<FilterTag>,
    #[arg(
        long,
        value_parser = parse_date,
        help = "Only show samples acquired on or after this date (YYYY-MM-DD)"
    )]
    pub(crate) from: Option<Date>,
    #[arg(
        long,
        value_parser = parse_date,
        help = "Only show samples acquired on or before this date (YYYY-MM-DD)"
    )]
    pub(crate) to: Option<Date>,
    #[arg(long, help = "Sort order by last edit time: latest or oldest")]
    pub(crate) sort: Option<SortOrder>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OutputOptions {
    #[arg(long, help = "Show all fields in the listing")]
    pub(crate) full: bool,
    #[arg(short, long, value_enum, help = "Output format")]
    pub(crate) output: Option<OutputFormat>,
}

fn parse_date(s: &str) -> Result<Date, libmero::Error> {
    timestamp::parse_date(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use libmero::taxonomy::GenusTag;
    use test_log::test;
    use time::macros::date;

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from([
            "meroctl",
            "list",
            "--search",
            "coral",
            "--filter",
            "Pocilopora",
            "--from",
            "2025-01-01",
            "--sort",
            "oldest",
            "--output",
            "csv",
        ])
        .unwrap();
        let Commands::List { view, output } = cli.command else {
            panic!("Wrong command parsed: {:?}", cli.command);
        };
        assert_eq!(view.search.as_deref(), Some("coral"));
        assert_eq!(view.filter, Some(FilterTag::Genus(GenusTag::Pocillopora)));
        assert_eq!(view.from, Some(date!(2025 - 01 - 01)));
        assert_eq!(view.to, None);
        assert_eq!(view.sort, Some(SortOrder::Oldest));
        assert_eq!(output.output, Some(OutputFormat::Csv));
        assert!(!output.full);
    }

    #[test]
    fn test_parse_bad_values() {
        assert!(Cli::try_parse_from(["meroctl", "list", "--from", "31/08/2025"]).is_err());
        assert!(Cli::try_parse_from(["meroctl", "list", "--filter", "mineralia"]).is_err());
        assert!(Cli::try_parse_from(["meroctl", "list", "--sort", "newest"]).is_err());
    }

    #[test]
    fn test_parse_derive_id() {
        let cli = Cli::try_parse_from([
            "meroctl",
            "derive-id",
            "--project",
            "b",
            "--project-number",
            "3",
            "--sample-number",
            "27",
            "--sem",
        ])
        .unwrap();
        let Commands::DeriveId {
            project,
            project_number,
            sample_number,
            sem,
            isolated,
        } = cli.command
        else {
            panic!("Wrong command parsed: {:?}", cli.command);
        };
        assert_eq!(project, ProjectTag::B);
        assert_eq!((project_number, sample_number), (3, 27));
        assert!(sem);
        assert!(!isolated);
    }
}
