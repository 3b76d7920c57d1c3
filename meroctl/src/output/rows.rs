use libmero::{
    core::timestamp::{format_date, format_timestamp},
    sample::{PhotoKind, Sample},
    view::FilterTag,
};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct SampleRow {
    id: String,
    name: String,
    species: String,
    image: String,
    #[tabled(rename = "Last Edited")]
    edited: String,
}

impl SampleRow {
    pub(crate) fn new(sample: &Sample) -> Self {
        Self {
            id: sample.id().to_string(),
            name: sample.name().to_string(),
            species: sample.taxonomy().species.clone(),
            image: sample
                .photos()
                .get(PhotoKind::General)
                .map(|p| p.to_string())
                .unwrap_or_else(|| "No Image".to_string()),
            edited: format_timestamp(&sample.edited()),
        }
    }
}

impl From<&Sample> for SampleRow {
    fn from(sample: &Sample) -> Self {
        Self::new(sample)
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct SampleRowFull {
    id: String,
    name: String,
    project: String,
    kingdom: String,
    family: String,
    genus: String,
    species: String,
    #[tabled(display("tabled::derive::display::option", ""))]
    acquired: Option<String>,
    #[tabled(display("tabled::derive::display::option", ""))]
    coordinates: Option<String>,
    registered: String,
    #[tabled(rename = "Last Edited")]
    edited: String,
    photos: String,
}

impl SampleRowFull {
    pub(crate) fn new(sample: &Sample) -> Self {
        let taxonomy = sample.taxonomy();
        Self {
            id: sample.id().to_string(),
            name: sample.name().to_string(),
            project: format!("{}-{:04}", sample.project(), sample.project_number()),
            kingdom: taxonomy.kingdom.clone(),
            family: taxonomy.family.clone(),
            genus: taxonomy.genus.clone(),
            species: taxonomy.species.clone(),
            acquired: sample.acquired().as_ref().map(format_date),
            coordinates: sample.coordinates().map(|c| c.to_string()),
            registered: format_timestamp(&sample.registered()),
            edited: format_timestamp(&sample.edited()),
            photos: sample
                .photos()
                .iter()
                .map(|(kind, _)| kind.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&Sample> for SampleRowFull {
    fn from(sample: &Sample) -> Self {
        Self::new(sample)
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct SampleRowDetails {
    id: String,
    name: String,
    project: String,
    #[tabled(rename = "Project Number")]
    project_number: u32,
    #[tabled(rename = "Sample Number")]
    sample_number: u32,
    kingdom: String,
    family: String,
    genus: String,
    species: String,
    #[tabled(display("tabled::derive::display::option", "Unknown"))]
    acquired: Option<String>,
    #[tabled(display("tabled::derive::display::option", "Not set"))]
    coordinates: Option<String>,
    registered: String,
    #[tabled(rename = "Last Edited")]
    edited: String,
    #[tabled(display = "format_string_vec")]
    photos: Vec<String>,
}

impl SampleRowDetails {
    pub(crate) fn new(sample: &Sample) -> Self {
        let taxonomy = sample.taxonomy();
        Self {
            id: sample.id().to_string(),
            name: sample.name().to_string(),
            project: sample.project().to_string(),
            project_number: sample.project_number(),
            sample_number: sample.sample_number(),
            kingdom: taxonomy.kingdom.clone(),
            family: taxonomy.family.clone(),
            genus: taxonomy.genus.clone(),
            species: taxonomy.species.clone(),
            acquired: sample.acquired().as_ref().map(format_date),
            coordinates: sample.coordinates().map(|c| c.to_string()),
            registered: format_timestamp(&sample.registered()),
            edited: format_timestamp(&sample.edited()),
            photos: sample
                .photos()
                .iter()
                .map(|(kind, photo)| format!("{kind}: {photo}"))
                .collect(),
        }
    }
}

impl From<&Sample> for SampleRowDetails {
    fn from(sample: &Sample) -> Self {
        Self::new(sample)
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct LatestRow {
    latest: String,
    id: String,
    name: String,
    registered: String,
    #[tabled(rename = "Last Edited")]
    edited: String,
}

impl LatestRow {
    pub(crate) fn new(latest: &str, sample: &Sample) -> Self {
        Self {
            latest: latest.to_string(),
            id: sample.id().to_string(),
            name: sample.name().to_string(),
            registered: format_timestamp(&sample.registered()),
            edited: format_timestamp(&sample.edited()),
        }
    }
}

#[derive(Tabled, Serialize)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct FilterRow {
    tag: String,
    label: String,
}

impl From<FilterTag> for FilterRow {
    fn from(tag: FilterTag) -> Self {
        Self {
            tag: tag.to_string(),
            label: tag.label(),
        }
    }
}

fn format_string_vec(names: &[String]) -> String {
    match names.is_empty() {
        true => "None".to_string(),
        false => names.join(",\n"),
    }
}
