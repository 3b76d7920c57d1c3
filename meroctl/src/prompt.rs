use inquire::{
    Confirm, CustomType, CustomUserError, Select, Text, autocompletion::Autocomplete,
    validator::Validation,
};
use libmero::{
    core::timestamp,
    sample::{Coordinates, Draft, MAX_NUMBER, PhotoKind, PhotoRef, ProjectTag, Sample},
    store::SampleStore,
    taxonomy::{GenusTag, Kingdom, Taxonomy},
    view::{FilterTag, SortOrder, ViewParams},
};
use strum::IntoEnumIterator;
use time::Date;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Internal Error: completion format was incorrect for '{0}'")]
    CompletionIdFormat(String),
    #[error("Expected coordinates in the form 'latitude, longitude', got '{0}'")]
    CoordinateFormat(String),
    #[error(transparent)]
    Validation(#[from] libmero::ValidationError),
    #[error(transparent)]
    Prompt(#[from] inquire::InquireError),
}

/// A sample that the user picked, either from the suggestions or by typing its ID
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SampleChoice {
    /// A suggestion, which carries the sample's position in the store
    Position(usize),
    /// An ID that was typed in
    Id(String),
}

impl SampleChoice {
    /// The position of the chosen sample in the store. Several samples can share an ID, so a
    /// typed ID selects the first one.
    pub(crate) fn index(&self, store: &SampleStore) -> Option<usize> {
        match self {
            SampleChoice::Position(index) => (*index < store.len()).then_some(*index),
            SampleChoice::Id(id) => store.position(id),
        }
    }
}

impl std::fmt::Display for SampleChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleChoice::Position(index) => write!(f, "#{}", index + 1),
            SampleChoice::Id(id) => f.write_str(id),
        }
    }
}

/// A text prompt for choosing a sample from the store. Suggestions are searched the same way as
/// the sample listing.
pub(crate) struct SamplePrompt<'a> {
    text: Text<'a>,
}

impl<'a> SamplePrompt<'a> {
    pub(crate) fn new(message: &'a str, store: &SampleStore) -> Self {
        Self {
            text: Text::new(message).with_autocomplete(SampleCompleter {
                samples: store.samples().to_vec(),
            }),
        }
    }

    pub(crate) fn prompt(self) -> Result<SampleChoice, Error> {
        let res = self.text.prompt()?;
        parse_choice(&res)
    }
}

#[derive(Clone)]
struct SampleCompleter {
    samples: Vec<Sample>,
}

impl Autocomplete for SampleCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let matched = ViewParams::new().with_search(input).apply(&self.samples);
        Ok(matched
            .into_iter()
            .filter_map(|s| {
                let index = self.samples.iter().position(|orig| std::ptr::eq(orig, s))?;
                Some(format!("#{} {}. {}", index + 1, s.id(), s.name()))
            })
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<inquire::autocompletion::Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// Suggests names from a fixed list that start with the input
#[derive(Clone)]
struct NameCompleter {
    names: Vec<String>,
}

impl NameCompleter {
    fn kingdoms() -> Self {
        Self {
            names: Kingdom::iter().map(|k| k.title()).collect(),
        }
    }

    fn genera() -> Self {
        Self {
            names: GenusTag::iter().map(|g| g.title()).collect(),
        }
    }
}

impl Autocomplete for NameCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let input = input.trim().to_lowercase();
        Ok(self
            .names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&input))
            .cloned()
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<inquire::autocompletion::Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

// Suggestions have the form "#$POSITION $ID. $NAME", counting positions from 1. Anything else is
// read as a typed ID.
fn parse_choice(s: &str) -> Result<SampleChoice, Error> {
    let s = s.trim();
    let Some(rest) = s.strip_prefix('#') else {
        return extract_id(s).map(SampleChoice::Id);
    };
    rest.split_whitespace()
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .map(SampleChoice::Position)
        .ok_or_else(|| Error::CompletionIdFormat(s.to_owned()))
}

// sample IDs never contain a '.', so everything before the first '.' is the ID
fn extract_id(s: &str) -> Result<String, Error> {
    s.split('.')
        .next()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::CompletionIdFormat(s.to_owned()))
}

/// Parse coordinates that were entered as "latitude, longitude". An empty string means that the
/// sample has no location.
pub(crate) fn parse_lat_lon(s: &str) -> Result<Option<Coordinates>, Error> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| Error::CoordinateFormat(s.to_string()))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::CoordinateFormat(s.to_string()))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::CoordinateFormat(s.to_string()))?;
    Ok(Some(Coordinates::from_map_click(lat, lon)?))
}

fn format_lat_lon(coords: &Coordinates) -> String {
    format!("{}, {}", coords.latitude(), coords.longitude())
}

fn validate_date(s: &str) -> Result<Validation, CustomUserError> {
    match s.trim().is_empty() || timestamp::parse_date(s.trim()).is_ok() {
        true => Ok(Validation::Valid),
        false => Ok(Validation::Invalid("Dates must have the form YYYY-MM-DD".into())),
    }
}

fn validate_lat_lon(s: &str) -> Result<Validation, CustomUserError> {
    match parse_lat_lon(s) {
        Ok(_) => Ok(Validation::Valid),
        Err(e) => Ok(Validation::Invalid(e.to_string().into())),
    }
}

fn validate_number(n: &u32) -> Result<Validation, CustomUserError> {
    match *n <= MAX_NUMBER {
        true => Ok(Validation::Valid),
        false => Ok(Validation::Invalid(
            format!("Numbers must not be larger than {MAX_NUMBER}").into(),
        )),
    }
}

fn prompt_number(message: &str, current: Option<u32>) -> Result<u32, Error> {
    let mut prompt = CustomType::<u32>::new(message)
        .with_error_message("Please enter a whole number")
        .with_validator(validate_number);
    if let Some(n) = current {
        prompt = prompt.with_default(n);
    }
    Ok(prompt.prompt()?)
}

fn prompt_text(message: &str, current: &str) -> Result<String, Error> {
    Ok(Text::new(message)
        .with_initial_value(current)
        .prompt()?
        .trim()
        .to_string())
}

fn prompt_photo(kind: PhotoKind, current: Option<&PhotoRef>) -> Result<Option<PhotoRef>, Error> {
    let message = format!("{kind} photo:");
    let res = Text::new(&message)
        .with_initial_value(current.map(PhotoRef::as_str).unwrap_or_default())
        .with_help_message("A file path or URL, leave empty for no photo")
        .prompt()?;
    let res = res.trim();
    Ok((!res.is_empty()).then(|| PhotoRef::new(res)))
}

/// Interactively fill in the fields of a draft. The current values of the draft are offered as
/// the starting values, so an existing sample can be edited by pressing enter on every field that
/// should stay the same.
pub(crate) fn prompt_draft(draft: Draft) -> Result<Draft, Error> {
    let name = prompt_text("Sample name:", &draft.name)?;

    let projects: Vec<ProjectTag> = ProjectTag::iter().collect();
    let cursor = projects
        .iter()
        .position(|p| *p == draft.project)
        .unwrap_or_default();
    let project = Select::new("Project:", projects)
        .with_starting_cursor(cursor)
        .prompt()?;
    let project_number = prompt_number("Project number:", draft.project_number)?;
    let sample_number = prompt_number("Sample number:", draft.sample_number)?;

    let kingdom = Text::new("Kingdom:")
        .with_initial_value(&draft.taxonomy.kingdom)
        .with_autocomplete(NameCompleter::kingdoms())
        .prompt()?;
    let family = prompt_text("Family:", &draft.taxonomy.family)?;
    let genus = Text::new("Genus:")
        .with_initial_value(&draft.taxonomy.genus)
        .with_autocomplete(NameCompleter::genera())
        .prompt()?;
    let species = prompt_text("Species:", &draft.taxonomy.species)?;

    let acquired = prompt_date(
        "Acquisition date:",
        draft.acquired,
        "YYYY-MM-DD, leave empty if unknown",
    )?;

    let current_coords = draft
        .coordinates
        .as_ref()
        .map(format_lat_lon)
        .unwrap_or_default();
    let default_help = format!(
        "latitude, longitude, e.g. {}; leave empty for no location",
        format_lat_lon(&Coordinates::DEFAULT_CENTER)
    );
    let coordinates = Text::new("Coordinates:")
        .with_initial_value(&current_coords)
        .with_help_message(&default_help)
        .with_validator(validate_lat_lon)
        .prompt()?;
    let coordinates = parse_lat_lon(&coordinates)?;

    let mut photos = draft.photos.clone();
    for kind in PhotoKind::iter() {
        let photo = prompt_photo(kind, draft.photos.get(kind))?;
        photos.set(kind, photo);
    }

    Ok(Draft {
        name,
        project,
        project_number: Some(project_number),
        sample_number: Some(sample_number),
        taxonomy: Taxonomy::new(&kingdom, &family, &genus, &species),
        acquired,
        coordinates,
        photos,
    })
}

struct TagChoice(FilterTag);

impl std::fmt::Display for TagChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.label())
    }
}

fn prompt_date(message: &str, current: Option<Date>, help: &str) -> Result<Option<Date>, Error> {
    let current = current
        .as_ref()
        .map(timestamp::format_date)
        .unwrap_or_default();
    let res = Text::new(message)
        .with_initial_value(&current)
        .with_help_message(help)
        .with_validator(validate_date)
        .prompt()?;
    Ok(match res.trim() {
        "" => None,
        s => timestamp::parse_date(s).ok(),
    })
}

/// Interactively change how the sample list is searched, filtered and sorted
pub(crate) fn prompt_view_params(params: &ViewParams) -> Result<ViewParams, Error> {
    let search = prompt_text("Search:", &params.search)?;

    let tags: Vec<TagChoice> = FilterTag::all_tags().into_iter().map(TagChoice).collect();
    let cursor = tags
        .iter()
        .position(|t| t.0 == params.filter)
        .unwrap_or_default();
    let TagChoice(filter) = Select::new("Category:", tags)
        .with_starting_cursor(cursor)
        .prompt()?;

    let help = "YYYY-MM-DD, leave empty for no limit";
    let from = prompt_date("Acquired on or after:", params.from, help)?;
    let to = prompt_date("Acquired on or before:", params.to, help)?;

    let orders: Vec<SortOrder> = SortOrder::iter().collect();
    let cursor = orders
        .iter()
        .position(|o| *o == params.sort)
        .unwrap_or_default();
    let sort = Select::new("Sort by last edit:", orders)
        .with_starting_cursor(cursor)
        .prompt()?;

    Ok(ViewParams::new()
        .with_search(search)
        .with_filter(filter)
        .with_range(from, to)
        .with_sort(sort))
}

/// Ask the user to confirm saving the draft, showing the ID it will be saved under
pub(crate) fn confirm_save(draft: &Draft) -> Result<bool, Error> {
    let message = match draft.derived_id() {
        Some(id) => format!("Save sample {id}?"),
        None => "Save sample?".to_string(),
    };
    Ok(Confirm::new(&message).with_default(true).prompt()?)
}
