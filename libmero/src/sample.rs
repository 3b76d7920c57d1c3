//! Objects to keep track of the specimen samples in the catalog
use crate::{
    core::{
        error::{Result, ValidationError},
        query::{DynFilterPart, SortKey, filter::Cmp, filter::FilterPart, filter::or},
        timestamp,
    },
    taxonomy::Taxonomy,
};
use serde::Serialize;
use std::cmp::Ordering;
use strum_macros::{Display, EnumIter, EnumString};
use time::{Date, PrimitiveDateTime};
use tracing::trace;

/// The largest project or sample number that fits into a sample ID
pub const MAX_NUMBER: u32 = 9999;

/// The project series that a sample belongs to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ProjectTag {
    #[default]
    A,
    B,
}

/// A geographic location in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    /// longitude
    pub x: f64,
    /// latitude
    pub y: f64,
}

impl Coordinates {
    /// The point that a location picker is centered on before anything has been selected
    pub const DEFAULT_CENTER: Coordinates = Coordinates {
        x: 115.452,
        y: -8.672,
    };

    /// Create a new coordinate pair from a longitude (`x`) and latitude (`y`)
    pub fn new(x: f64, y: f64) -> Result<Self, ValidationError> {
        let coords = Self { x, y };
        coords.validate()?;
        Ok(coords)
    }

    /// Create a coordinate pair from a (latitude, longitude) pair, which is the order that
    /// geocoding services usually report them in
    pub fn from_lat_lon(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        Self::new(lon, lat)
    }

    /// Create a coordinate pair from a location that was picked on a map. Map positions carry far
    /// more precision than is meaningful, so they are rounded to 6 decimal places (~0.1m).
    pub fn from_map_click(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        let round = |v: f64| (v * 1e6).round() / 1e6;
        Self::from_lat_lon(round(lat), round(lon))
    }

    pub fn longitude(&self) -> f64 {
        self.x
    }

    pub fn latitude(&self) -> f64 {
        self.y
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let valid = self.x.is_finite()
            && self.y.is_finite()
            && (-180.0..=180.0).contains(&self.x)
            && (-90.0..=90.0).contains(&self.y);
        match valid {
            true => Ok(()),
            false => Err(ValidationError::InvalidCoordinates {
                x: self.x,
                y: self.y,
            }),
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X: {}, Y: {}", self.x, self.y)
    }
}

/// An opaque reference to displayable image data, such as a file path or a URL. The catalog never
/// looks inside of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kinds of photos that can be attached to a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum PhotoKind {
    #[strum(to_string = "General", serialize = "image")]
    General,
    #[strum(to_string = "SEM", serialize = "sem")]
    Sem,
    #[strum(to_string = "Isolated", serialize = "iso")]
    Isolated,
}

/// The photos attached to a sample
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Photos {
    pub image: Option<PhotoRef>,
    pub sem: Option<PhotoRef>,
    pub isolated: Option<PhotoRef>,
}

impl Photos {
    pub fn get(&self, kind: PhotoKind) -> Option<&PhotoRef> {
        match kind {
            PhotoKind::General => self.image.as_ref(),
            PhotoKind::Sem => self.sem.as_ref(),
            PhotoKind::Isolated => self.isolated.as_ref(),
        }
    }

    pub fn set(&mut self, kind: PhotoKind, photo: Option<PhotoRef>) {
        match kind {
            PhotoKind::General => self.image = photo,
            PhotoKind::Sem => self.sem = photo,
            PhotoKind::Isolated => self.isolated = photo,
        }
    }

    pub fn has_sem(&self) -> bool {
        self.sem.is_some()
    }

    pub fn has_isolated(&self) -> bool {
        self.isolated.is_some()
    }

    /// All attached photos, in display order
    pub fn iter(&self) -> impl Iterator<Item = (PhotoKind, &PhotoRef)> {
        [PhotoKind::General, PhotoKind::Sem, PhotoKind::Isolated]
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|photo| (kind, photo)))
    }
}

/// Compute the identifier of a sample from its project and sample numbers and the kinds of photos
/// that are attached to it.
///
/// Both numbers are zero-padded to 4 digits, e.g. `A-0012-0001`. A `-SEM` and/or `-ISO` suffix is
/// appended when an SEM photo or an isolated photo is present. Samples that share all of these
/// inputs share an identifier.
pub fn derive_id(
    project: ProjectTag,
    project_number: u32,
    sample_number: u32,
    has_sem: bool,
    has_isolated: bool,
) -> String {
    let suffix = match (has_sem, has_isolated) {
        (true, true) => "-SEM-ISO",
        (true, false) => "-SEM",
        (false, true) => "-ISO",
        (false, false) => "",
    };
    format!("{project}-{project_number:04}-{sample_number:04}{suffix}")
}

/// A data type that represents a sample that has been committed to the catalog.
///
/// Samples can only be created or changed by committing a [Draft], which guarantees that the
/// identifier always matches the fields it is derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    id: String,
    name: String,
    project: ProjectTag,
    project_number: u32,
    sample_number: u32,
    #[serde(flatten)]
    taxonomy: Taxonomy,
    #[serde(serialize_with = "timestamp::serialize_date_option")]
    acquired: Option<Date>,
    coordinates: Option<Coordinates>,
    #[serde(serialize_with = "timestamp::serialize_timestamp")]
    registered: PrimitiveDateTime,
    #[serde(serialize_with = "timestamp::serialize_timestamp")]
    edited: PrimitiveDateTime,
    photos: Photos,
}

impl Sample {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project(&self) -> ProjectTag {
        self.project
    }

    pub fn project_number(&self) -> u32 {
        self.project_number
    }

    pub fn sample_number(&self) -> u32 {
        self.sample_number
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn acquired(&self) -> Option<Date> {
        self.acquired
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// When this sample was first committed to the catalog
    pub fn registered(&self) -> PrimitiveDateTime {
        self.registered
    }

    /// When this sample was last committed to the catalog
    pub fn edited(&self) -> PrimitiveDateTime {
        self.edited
    }

    pub fn photos(&self) -> &Photos {
        &self.photos
    }
}

/// An in-progress sample that has not been committed to the catalog yet. All fields may be
/// partially filled in; [Draft::validate()] reports what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Draft {
    pub name: String,
    pub project: ProjectTag,
    pub project_number: Option<u32>,
    pub sample_number: Option<u32>,
    #[serde(flatten)]
    pub taxonomy: Taxonomy,
    #[serde(serialize_with = "timestamp::serialize_date_option")]
    pub acquired: Option<Date>,
    pub coordinates: Option<Coordinates>,
    pub photos: Photos,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that all required fields are present and within range
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingAttribute("name"));
        }
        let project_number = self
            .project_number
            .ok_or(ValidationError::MissingAttribute("project number"))?;
        let sample_number = self
            .sample_number
            .ok_or(ValidationError::MissingAttribute("sample number"))?;
        if project_number > MAX_NUMBER {
            return Err(ValidationError::NumberOutOfRange {
                field: "project number",
                value: project_number,
            });
        }
        if sample_number > MAX_NUMBER {
            return Err(ValidationError::NumberOutOfRange {
                field: "sample number",
                value: sample_number,
            });
        }
        if let Some(coords) = &self.coordinates {
            coords.validate()?;
        }
        Ok(())
    }

    /// The identifier this draft would receive if it were committed now, or `None` if the project
    /// or sample number is still missing
    pub fn derived_id(&self) -> Option<String> {
        Some(derive_id(
            self.project,
            self.project_number?,
            self.sample_number?,
            self.photos.has_sem(),
            self.photos.has_isolated(),
        ))
    }

    /// Turn this draft into a brand new sample that was registered at `now`
    pub fn commit(self, now: PrimitiveDateTime) -> Result<Sample, ValidationError> {
        self.build(now, now)
    }

    /// Turn this draft into a new version of `previous`. The registration time of `previous` is
    /// preserved and the edit time never moves backwards, even if the clock does.
    pub fn commit_over(
        self,
        previous: &Sample,
        now: PrimitiveDateTime,
    ) -> Result<Sample, ValidationError> {
        self.build(previous.registered, now.max(previous.edited))
    }

    fn build(
        self,
        registered: PrimitiveDateTime,
        edited: PrimitiveDateTime,
    ) -> Result<Sample, ValidationError> {
        self.validate()?;
        let id = self
            .derived_id()
            .ok_or(ValidationError::MissingAttribute("sample number"))?;
        trace!(?id, "committing draft");
        Ok(Sample {
            id,
            name: self.name.trim().to_string(),
            project: self.project,
            project_number: self.project_number.unwrap_or_default(),
            sample_number: self.sample_number.unwrap_or_default(),
            taxonomy: self.taxonomy,
            acquired: self.acquired,
            coordinates: self.coordinates,
            registered,
            edited: edited.max(registered),
            photos: self.photos,
        })
    }
}

impl From<&Sample> for Draft {
    fn from(sample: &Sample) -> Self {
        Self {
            name: sample.name.clone(),
            project: sample.project,
            project_number: Some(sample.project_number),
            sample_number: Some(sample.sample_number),
            taxonomy: sample.taxonomy.clone(),
            acquired: sample.acquired,
            coordinates: sample.coordinates,
            photos: sample.photos.clone(),
        }
    }
}

/// A type for specifying fields that can be used for filtering a list of samples
#[derive(Clone, Debug)]
pub enum Filter {
    /// Compare the derived ID of the sample to the given value
    Id(Cmp, String),

    /// Compare the name of the sample to the given value
    Name(Cmp, String),

    Kingdom(Cmp, String),
    Family(Cmp, String),
    Genus(Cmp, String),
    Species(Cmp, String),

    /// Match samples that belong to the given project series
    Project(ProjectTag),

    /// Compare the acquisition date of the sample to the given date. Samples without an
    /// acquisition date never match.
    Acquired(Cmp, Date),
}

impl FilterPart<Sample> for Filter {
    fn matches(&self, sample: &Sample) -> bool {
        match self {
            Self::Id(cmp, s) => cmp.compare_str(&sample.id, s),
            Self::Name(cmp, s) => cmp.compare_str(&sample.name, s),
            Self::Kingdom(cmp, s) => cmp.compare_str(&sample.taxonomy.kingdom, s),
            Self::Family(cmp, s) => cmp.compare_str(&sample.taxonomy.family, s),
            Self::Genus(cmp, s) => cmp.compare_str(&sample.taxonomy.genus, s),
            Self::Species(cmp, s) => cmp.compare_str(&sample.taxonomy.species, s),
            Self::Project(tag) => sample.project == *tag,
            Self::Acquired(cmp, date) => sample
                .acquired
                .is_some_and(|acquired| cmp.compare(&acquired, date)),
        }
    }
}

impl From<Filter> for DynFilterPart<Sample> {
    fn from(value: Filter) -> Self {
        DynFilterPart::new(value)
    }
}

/// Build a filter that matches samples whose name, species, genus, family or ID contain the given
/// string (ignoring case)
pub fn text_like(s: &str) -> DynFilterPart<Sample> {
    let s = s.trim().to_string();
    or::<Sample>()
        .push(Filter::Name(Cmp::Like, s.clone()))
        .push(Filter::Species(Cmp::Like, s.clone()))
        .push(Filter::Genus(Cmp::Like, s.clone()))
        .push(Filter::Family(Cmp::Like, s.clone()))
        .push(Filter::Id(Cmp::Like, s))
        .build()
}

/// The fields that a list of samples can be sorted by
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortField {
    Edited,
}

impl SortKey<Sample> for SortField {
    fn compare(&self, a: &Sample, b: &Sample) -> Ordering {
        match self {
            SortField::Edited => a.edited.cmp(&b.edited),
        }
    }
}
