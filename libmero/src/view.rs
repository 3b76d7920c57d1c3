//! Parameters that describe which samples to display and in what order
use crate::{
    core::{
        error::Error,
        query::{
            Direction, DynFilterPart, SortSpec, SortSpecs,
            filter::{Cmp, FilterPart, and, or},
        },
    },
    sample::{self, ProjectTag, Sample, SortField},
    taxonomy::{GenusTag, Kingdom},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use time::Date;
use tracing::debug;

/// A category that the sample list can be narrowed down to. Only a single category can be
/// selected at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterTag {
    /// Don't filter by category
    #[default]
    All,
    /// Samples whose genus matches the tag
    Genus(GenusTag),
    /// Samples whose kingdom matches the tag
    Kingdom(Kingdom),
    /// Samples that belong to the given project series
    Project(ProjectTag),
}

impl FilterTag {
    /// All of the tags that can be selected, starting with [FilterTag::All]
    pub fn all_tags() -> Vec<FilterTag> {
        std::iter::once(FilterTag::All)
            .chain(GenusTag::iter().map(FilterTag::Genus))
            .chain(Kingdom::iter().map(FilterTag::Kingdom))
            .chain(ProjectTag::iter().map(FilterTag::Project))
            .collect()
    }

    /// A human-readable description of the tag, e.g. "Kingdom: Animalia"
    pub fn label(&self) -> String {
        match self {
            FilterTag::All => "All".to_string(),
            FilterTag::Genus(g) => format!("Genus: {}", g.title()),
            FilterTag::Kingdom(k) => format!("Kingdom: {}", k.title()),
            FilterTag::Project(p) => format!("Project: {p}"),
        }
    }

    /// The filter expression for this tag, or `None` if it places no constraint on samples
    pub fn to_filter(&self) -> Option<DynFilterPart<Sample>> {
        match self {
            FilterTag::All => None,
            FilterTag::Genus(g) => Some(
                g.spellings()
                    .into_iter()
                    .fold(or::<Sample>(), |f, spelling| {
                        f.push(sample::Filter::Genus(Cmp::Equal, spelling))
                    })
                    .build(),
            ),
            FilterTag::Kingdom(k) => {
                Some(sample::Filter::Kingdom(Cmp::Equal, k.to_string()).into())
            }
            FilterTag::Project(p) => Some(sample::Filter::Project(*p).into()),
        }
    }
}

impl std::fmt::Display for FilterTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterTag::All => write!(f, "all"),
            FilterTag::Genus(g) => write!(f, "{g}"),
            FilterTag::Kingdom(k) => write!(f, "{k}"),
            FilterTag::Project(p) => write!(f, "project{p}"),
        }
    }
}

impl FromStr for FilterTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.is_empty() {
            return Ok(FilterTag::All);
        }
        if let Some(p) = s
            .get(..7)
            .filter(|prefix| prefix.eq_ignore_ascii_case("project"))
            .and_then(|_| s.get(7..))
        {
            return ProjectTag::from_str(p)
                .map(FilterTag::Project)
                .map_err(|_| Error::Parse(s.to_string()));
        }
        GenusTag::from_str(s)
            .map(FilterTag::Genus)
            .or_else(|_| Kingdom::from_str(s).map(FilterTag::Kingdom))
            .map_err(|_| Error::Parse(s.to_string()))
    }
}

/// The order in which samples are listed, based on when they were last edited
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    EnumIter,
    Deserialize,
    Serialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently edited first
    #[default]
    Latest,
    /// Least recently edited first
    Oldest,
}

impl From<SortOrder> for SortSpecs<SortField> {
    fn from(value: SortOrder) -> Self {
        let direction = match value {
            SortOrder::Latest => Direction::Descending,
            SortOrder::Oldest => Direction::Ascending,
        };
        SortSpec::new(SortField::Edited, direction).into()
    }
}

/// The view parameters that determine which samples are shown and in which order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewParams {
    /// Free text that must appear in the name, species, genus, family or ID of a sample
    pub search: String,
    pub filter: FilterTag,
    /// Earliest acquisition date (inclusive)
    pub from: Option<Date>,
    /// Latest acquisition date (inclusive)
    pub to: Option<Date>,
    pub sort: SortOrder,
}

impl ViewParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, filter: FilterTag) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_range(mut self, from: Option<Date>, to: Option<Date>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// The combined filter expression for these parameters: text match, category and date range
    pub fn to_filter(&self) -> DynFilterPart<Sample> {
        let search = self.search.trim();
        and::<Sample>()
            .push_opt((!search.is_empty()).then(|| sample::text_like(search)))
            .push_opt(self.filter.to_filter())
            .push_opt(
                self.from
                    .map(|d| sample::Filter::Acquired(Cmp::NotLessThan, d)),
            )
            .push_opt(
                self.to
                    .map(|d| sample::Filter::Acquired(Cmp::NotGreaterThan, d)),
            )
            .build()
    }

    /// Compute the samples to display from the given samples. The result borrows from `samples`
    /// and never contains anything that isn't in it. Samples that were edited at the same time
    /// keep their relative order.
    pub fn apply<'a>(&self, samples: &'a [Sample]) -> Vec<&'a Sample> {
        let filter = self.to_filter();
        let mut matched: Vec<&Sample> = samples.iter().filter(|s| filter.matches(s)).collect();
        SortSpecs::<SortField>::from(self.sort).sort(&mut matched);
        debug!(
            total = samples.len(),
            matched = matched.len(),
            "applied view parameters"
        );
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sample::{Draft, tests::coral_draft},
        store::SampleStore,
        taxonomy::Taxonomy,
    };
    use test_log::test;
    use time::macros::{date, datetime};

    fn store() -> SampleStore {
        let mut store = SampleStore::new();
        let samples = [
            (
                "Coral Fragment 01",
                ProjectTag::A,
                1,
                Taxonomy::new("Animalia", "Acroporidae", "Acropora", "Acropora millepora"),
                Some(date!(2025 - 08 - 31)),
                datetime!(2025-09-01 10:00:00),
            ),
            (
                "Cauliflower coral",
                ProjectTag::B,
                2,
                Taxonomy::new(
                    "Animalia",
                    "Pocilloporidae",
                    "Pocillopora",
                    "Pocillopora damicornis",
                ),
                Some(date!(2025 - 07 - 14)),
                datetime!(2025-09-05 08:30:00),
            ),
            (
                "Seagrass blade",
                ProjectTag::A,
                3,
                Taxonomy::new("Plantae", "Cymodoceaceae", "Thalassodendron", ""),
                None,
                datetime!(2025-09-03 16:00:00),
            ),
            (
                "Cone snail",
                ProjectTag::B,
                4,
                Taxonomy::new("animalia", "Conidae", "Conus", "Conus textile"),
                Some(date!(2025 - 09 - 02)),
                datetime!(2025-09-01 10:00:00),
            ),
        ];
        for (name, project, n, taxonomy, acquired, now) in samples {
            let draft = Draft {
                name: name.to_string(),
                project,
                sample_number: Some(n),
                taxonomy,
                acquired,
                ..coral_draft()
            };
            store.register_at(draft, now).unwrap();
        }
        store
    }

    fn names(samples: Vec<&Sample>) -> Vec<&str> {
        samples.into_iter().map(Sample::name).collect()
    }

    #[test]
    fn test_default_view_latest_first() {
        let store = store();
        let view = ViewParams::new();
        // ties on the edit time keep store order
        assert_eq!(
            names(view.apply(store.samples())),
            vec![
                "Cauliflower coral",
                "Seagrass blade",
                "Coral Fragment 01",
                "Cone snail"
            ]
        );
        let view = ViewParams::new().with_sort(SortOrder::Oldest);
        assert_eq!(
            names(view.apply(store.samples())),
            vec![
                "Coral Fragment 01",
                "Cone snail",
                "Seagrass blade",
                "Cauliflower coral"
            ]
        );
    }

    #[test]
    fn test_two_samples_scenario() {
        let mut store = SampleStore::new();
        store
            .register_at(coral_draft(), datetime!(2025-09-01 00:00:00))
            .unwrap();
        let second = Draft {
            name: "R2".into(),
            sample_number: Some(2),
            ..coral_draft()
        };
        store
            .register_at(second, datetime!(2025-09-05 00:00:00))
            .unwrap();
        let latest = ViewParams::new().with_sort(SortOrder::Latest);
        assert_eq!(
            names(latest.apply(store.samples())),
            vec!["R2", "Coral Fragment 01"]
        );
        let oldest = ViewParams::new().with_sort(SortOrder::Oldest);
        assert_eq!(
            names(oldest.apply(store.samples())),
            vec!["Coral Fragment 01", "R2"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = store();
        let view = ViewParams::new().with_search("acropora");
        assert_eq!(names(view.apply(store.samples())), vec!["Coral Fragment 01"]);
        let view = ViewParams::new().with_search("  CORAL ");
        assert_eq!(
            names(view.apply(store.samples())),
            vec!["Cauliflower coral", "Coral Fragment 01"]
        );
        let view = ViewParams::new().with_search("B-0012-0002");
        assert_eq!(names(view.apply(store.samples())), vec!["Cauliflower coral"]);
        let view = ViewParams::new().with_search("no such sample");
        assert!(view.apply(store.samples()).is_empty());
    }

    #[test]
    fn test_category_filter() {
        let store = store();
        let apply = |tag: &str| {
            let view = ViewParams::new()
                .with_filter(tag.parse().unwrap())
                .with_sort(SortOrder::Oldest);
            names(view.apply(store.samples()))
        };
        assert_eq!(apply("all").len(), 4);
        assert_eq!(
            apply("animalia"),
            vec!["Coral Fragment 01", "Cone snail", "Cauliflower coral"]
        );
        assert_eq!(apply("plantae"), vec!["Seagrass blade"]);
        assert!(apply("fungi").is_empty());
        assert_eq!(apply("pocilopora"), vec!["Cauliflower coral"]);
        assert_eq!(apply("acropora"), vec!["Coral Fragment 01"]);
        assert_eq!(apply("projectB"), vec!["Cone snail", "Cauliflower coral"]);
        assert_eq!(apply("projecta"), vec!["Coral Fragment 01", "Seagrass blade"]);
    }

    #[test]
    fn test_genus_filter_matches_both_spellings() {
        let mut store = store();
        let draft = Draft {
            name: "Misspelled coral".to_string(),
            sample_number: Some(5),
            taxonomy: Taxonomy::new(
                "Animalia",
                "Pocilloporidae",
                "Pocilopora",
                "Pocilopora verrucosa",
            ),
            ..coral_draft()
        };
        store
            .register_at(draft, datetime!(2025-09-06 09:00:00))
            .unwrap();
        for tag in ["pocillopora", "pocilopora", "Pocillopora"] {
            let view = ViewParams::new()
                .with_filter(tag.parse().unwrap())
                .with_sort(SortOrder::Oldest);
            assert_eq!(
                names(view.apply(store.samples())),
                vec!["Cauliflower coral", "Misspelled coral"]
            );
        }
        let view = ViewParams::new().with_filter(FilterTag::Genus(GenusTag::Acropora));
        assert_eq!(names(view.apply(store.samples())), vec!["Coral Fragment 01"]);
    }

    #[test]
    fn test_date_range() {
        let store = store();
        let view = ViewParams::new()
            .with_range(Some(date!(2025 - 08 - 31)), None)
            .with_sort(SortOrder::Oldest);
        // start bound is inclusive, undated samples are excluded
        assert_eq!(
            names(view.apply(store.samples())),
            vec!["Coral Fragment 01", "Cone snail"]
        );

        let view = ViewParams::new()
            .with_range(None, Some(date!(2025 - 08 - 31)))
            .with_sort(SortOrder::Oldest);
        assert_eq!(
            names(view.apply(store.samples())),
            vec!["Coral Fragment 01", "Cauliflower coral"]
        );

        let day = date!(2025 - 09 - 02);
        let view = ViewParams::new().with_range(Some(day), Some(day));
        assert_eq!(names(view.apply(store.samples())), vec!["Cone snail"]);

        // an inverted range matches nothing rather than failing
        let view = ViewParams::new()
            .with_range(Some(date!(2025 - 12 - 01)), Some(date!(2025 - 01 - 01)));
        assert!(view.apply(store.samples()).is_empty());
    }

    #[test]
    fn test_combined_stages() {
        let store = store();
        let view = ViewParams::new()
            .with_search("co")
            .with_filter(FilterTag::Project(ProjectTag::B))
            .with_range(Some(date!(2025 - 09 - 01)), None);
        assert_eq!(names(view.apply(store.samples())), vec!["Cone snail"]);
    }

    #[test]
    fn test_output_is_subset_of_store() {
        let store = store();
        for tag in FilterTag::all_tags() {
            for sort in SortOrder::iter() {
                let view = ViewParams::new().with_filter(tag).with_sort(sort);
                let result = view.apply(store.samples());
                assert!(result.len() <= store.len());
                assert!(
                    result
                        .iter()
                        .all(|s| store.iter().any(|orig| std::ptr::eq(*s, orig)))
                );
                let edited: Vec<_> = result.iter().map(|s| s.edited()).collect();
                let mut sorted = edited.clone();
                sorted.sort();
                if sort == SortOrder::Latest {
                    sorted.reverse();
                }
                assert_eq!(edited, sorted);
            }
        }
    }

    #[test]
    fn test_filter_tag_parse_display() {
        assert_eq!("all".parse::<FilterTag>().unwrap(), FilterTag::All);
        assert_eq!("".parse::<FilterTag>().unwrap(), FilterTag::All);
        assert_eq!(
            "Animalia".parse::<FilterTag>().unwrap(),
            FilterTag::Kingdom(Kingdom::Animalia)
        );
        assert_eq!(
            "projectA".parse::<FilterTag>().unwrap(),
            FilterTag::Project(ProjectTag::A)
        );
        assert_eq!(
            "projectC".parse::<FilterTag>(),
            Err(Error::Parse("projectC".into()))
        );
        assert!("mineralia".parse::<FilterTag>().is_err());
        for tag in FilterTag::all_tags() {
            assert_eq!(tag.to_string().parse::<FilterTag>().unwrap(), tag);
        }
        assert_eq!(FilterTag::Kingdom(Kingdom::Animalia).label(), "Kingdom: Animalia");
        assert_eq!(FilterTag::Project(ProjectTag::B).label(), "Project: B");
        assert_eq!(FilterTag::all_tags().len(), 1 + 6 + 7 + 2);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("latest".parse::<SortOrder>().unwrap(), SortOrder::Latest);
        assert_eq!("Oldest".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("newest".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Latest);
    }
}
