//! Operation data model produced by every fax parser.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};

/// A single incident as extracted from one dispatch fax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Case identifier assigned by the dispatch center.
    pub operation_number: String,

    /// Alarm time as printed on the fax.
    pub timestamp: NaiveDateTime,

    /// Time the fax entered the system. Never set by a parser.
    pub timestamp_income: NaiveDateTime,

    /// Caller or reporting party, may carry a phone number on a second line.
    pub messenger: String,

    /// Source-specific priority or triage text.
    pub priority: String,

    /// Primary incident site.
    pub einsatzort: PropertyLocation,

    /// Destination site, mostly used for patient transports.
    pub zielort: PropertyLocation,

    /// Free-text remarks.
    pub comment: String,

    /// Reported diagnosis ("Meldebild").
    pub picture: String,

    /// Operation plan reference.
    pub operation_plan: String,

    /// Dispatch keywords.
    pub keywords: OperationKeywords,

    /// Requested vehicles and units, in fax order.
    pub resources: OperationResources,

    /// Source-specific passthrough values keyed by German display labels.
    pub custom_data: BTreeMap<String, String>,
}

impl Operation {
    /// Create an empty operation received at the given time.
    ///
    /// The alarm timestamp starts out equal to the ingestion time and is
    /// overwritten once a parser finds a date or time on the fax.
    pub fn new(received: NaiveDateTime) -> Self {
        Self {
            operation_number: String::new(),
            timestamp: received,
            timestamp_income: received,
            messenger: String::new(),
            priority: String::new(),
            einsatzort: PropertyLocation::default(),
            zielort: PropertyLocation::default(),
            comment: String::new(),
            picture: String::new(),
            operation_plan: String::new(),
            keywords: OperationKeywords::default(),
            resources: OperationResources::default(),
            custom_data: BTreeMap::new(),
        }
    }

    /// The location downstream routing should navigate to.
    pub fn destination_location(&self) -> &PropertyLocation {
        &self.einsatzort
    }

    /// Look up a custom data entry.
    pub fn custom_data(&self, key: &str) -> Option<&str> {
        self.custom_data.get(key).map(String::as_str)
    }

    /// Mutable access to a custom data entry, inserting an empty value if absent.
    pub fn custom_data_mut(&mut self, key: &str) -> &mut String {
        self.custom_data.entry(key.to_string()).or_default()
    }

    /// Set a custom data entry, replacing any previous value.
    pub fn set_custom_data(&mut self, key: &str, value: impl Into<String>) {
        self.custom_data.insert(key.to_string(), value.into());
    }

    /// Mutable access to a text field addressed by a dotted path such as
    /// `Einsatzort.Street` or `keywords.b`.
    ///
    /// Segments are compared case-insensitively with underscores ignored,
    /// so both `OperationNumber` and `operation_number` resolve.
    pub fn text_field_mut(&mut self, path: &str) -> Option<&mut String> {
        let key = normalize_path(path);
        let (head, tail) = match key.split_once('.') {
            Some((head, tail)) => (head.to_string(), Some(tail.to_string())),
            None => (key.clone(), None),
        };

        match (head.as_str(), tail.as_deref()) {
            ("operationnumber", None) => Some(&mut self.operation_number),
            ("messenger", None) => Some(&mut self.messenger),
            ("priority", None) => Some(&mut self.priority),
            ("comment", None) => Some(&mut self.comment),
            ("picture", None) => Some(&mut self.picture),
            ("operationplan", None) => Some(&mut self.operation_plan),
            ("keywords", Some(field)) => self.keywords.text_field_mut(field),
            ("einsatzort", Some(field)) => self.einsatzort.text_field_mut(field),
            ("zielort", Some(field)) => self.zielort.text_field_mut(field),
            _ => None,
        }
    }

    /// Render any model value addressed by a dotted path.
    ///
    /// Returns `None` when the path names no field; empty optional values
    /// (such as missing coordinates) render as `Some("")`.
    pub fn field_text(&self, path: &str) -> Option<String> {
        let key = normalize_path(path);
        let text = match key.as_str() {
            "operationnumber" => self.operation_number.clone(),
            "timestamp" => self.timestamp.format("%d.%m.%Y %H:%M:%S").to_string(),
            "timestampincome" => self.timestamp_income.format("%d.%m.%Y %H:%M:%S").to_string(),
            "messenger" => self.messenger.clone(),
            "priority" => self.priority.clone(),
            "comment" => self.comment.clone(),
            "picture" => self.picture.clone(),
            "operationplan" => self.operation_plan.clone(),
            "keywords" => self.keywords.to_string(),
            "resources" => self.resources.to_string(),
            "einsatzort" => self.einsatzort.to_string(),
            "zielort" => self.zielort.to_string(),
            _ => {
                let (head, field) = key.split_once('.')?;
                match head {
                    "keywords" => self.keywords.field_text(field)?,
                    "einsatzort" => self.einsatzort.field_text(field)?,
                    "zielort" => self.zielort.field_text(field)?,
                    _ => return None,
                }
            }
        };
        Some(text)
    }
}

impl Default for Operation {
    fn default() -> Self {
        Self::new(Local::now().naive_local())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {}, {}",
            self.operation_number,
            self.timestamp.format("%d.%m.%Y %H:%M:%S"),
            self.destination_location()
        )
    }
}

/// A postal location with optional WGS84 coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyLocation {
    /// Free-form location name as given by the dispatch center.
    pub location: String,
    pub zip_code: String,
    pub city: String,
    pub street: String,
    /// House number, or kilometer marker on highways.
    pub street_number: String,
    pub intersection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_longitude: Option<f64>,
    /// Building or object name.
    pub property: String,
}

impl PropertyLocation {
    /// A location is usable for routing when it has a street plus a zip code or city.
    pub fn is_meaningful(&self) -> bool {
        (!self.zip_code.trim().is_empty() || !self.city.trim().is_empty())
            && !self.street.trim().is_empty()
    }

    /// Both coordinates are present.
    pub fn has_geo_coordinates(&self) -> bool {
        self.geo_latitude.is_some() && self.geo_longitude.is_some()
    }

    /// Coordinates rendered as `lat;lon`.
    pub fn geo_lat_lng(&self) -> Option<String> {
        match (self.geo_latitude, self.geo_longitude) {
            (Some(lat), Some(lng)) => Some(format!("{};{}", lat, lng)),
            _ => None,
        }
    }

    /// Parse coordinates from the `lat;lon` form.
    pub fn set_geo_lat_lng(&mut self, value: &str) -> FieldResult {
        let (lat, lng) = value
            .split_once(';')
            .ok_or_else(|| FieldError::MissingValue("longitude".to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| FieldError::InvalidNumber(lat.trim().to_string()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| FieldError::InvalidNumber(lng.trim().to_string()))?;
        self.geo_latitude = Some(lat);
        self.geo_longitude = Some(lng);
        Ok(())
    }

    fn text_field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "location" => Some(&mut self.location),
            "zipcode" => Some(&mut self.zip_code),
            "city" => Some(&mut self.city),
            "street" => Some(&mut self.street),
            "streetnumber" => Some(&mut self.street_number),
            "intersection" => Some(&mut self.intersection),
            "property" => Some(&mut self.property),
            _ => None,
        }
    }

    fn field_text(&self, field: &str) -> Option<String> {
        let text = match field {
            "geolatitude" => self.geo_latitude.map(|v| v.to_string()).unwrap_or_default(),
            "geolongitude" => self.geo_longitude.map(|v| v.to_string()).unwrap_or_default(),
            "geolatlng" => self.geo_lat_lng().unwrap_or_default(),
            "location" => self.location.clone(),
            "zipcode" => self.zip_code.clone(),
            "city" => self.city.clone(),
            "street" => self.street.clone(),
            "streetnumber" => self.street_number.clone(),
            "intersection" => self.intersection.clone(),
            "property" => self.property.clone(),
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for PropertyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        if !self.street.trim().is_empty() {
            out.push_str(&self.street);
            if !self.street_number.trim().is_empty() {
                out.push(' ');
                out.push_str(&self.street_number);
            }
            out.push_str(", ");
        }

        let has_zip = !self.zip_code.trim().is_empty();
        if has_zip {
            out.push_str(&self.zip_code);
        }
        if !self.city.trim().is_empty() {
            if has_zip {
                out.push(' ');
            }
            out.push_str(&self.city);
        }

        f.write_str(out.trim())
    }
}

/// Dispatch keywords. A source uses either `keyword`/`emergency_keyword`
/// or the B/R/S/T quartet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationKeywords {
    pub keyword: String,
    pub emergency_keyword: String,
    /// Brand (fire).
    pub b: String,
    /// Rettungsdienst (EMS).
    pub r: String,
    /// Sonstiges (other).
    pub s: String,
    /// Technische Hilfeleistung (technical rescue).
    pub t: String,
}

impl OperationKeywords {
    fn text_field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "keyword" => Some(&mut self.keyword),
            "emergencykeyword" => Some(&mut self.emergency_keyword),
            "b" => Some(&mut self.b),
            "r" => Some(&mut self.r),
            "s" => Some(&mut self.s),
            "t" => Some(&mut self.t),
            _ => None,
        }
    }

    fn field_text(&self, field: &str) -> Option<String> {
        let value = match field {
            "keyword" => &self.keyword,
            "emergencykeyword" => &self.emergency_keyword,
            "b" => &self.b,
            "r" => &self.r,
            "s" => &self.s,
            "t" => &self.t,
            _ => return None,
        };
        Some(value.clone())
    }
}

impl fmt::Display for OperationKeywords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("Stichwort", &self.keyword),
            ("Stichwort", &self.emergency_keyword),
            ("B", &self.b),
            ("R", &self.r),
            ("S", &self.s),
            ("T", &self.t),
        ]
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect();

        f.write_str(&parts.join(", "))
    }
}

/// A requested vehicle or unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResource {
    /// Vehicle or unit identifier.
    pub full_name: String,
    /// Dispatch time, free-form. May be empty.
    pub timestamp: String,
    /// Equipment explicitly requested from this unit.
    pub requested_equipment: Vec<String>,
}

impl OperationResource {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.requested_equipment.push(equipment.into());
        self
    }
}

/// How a resource list is rendered to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceListStyle {
    /// `name; time; equipment | ` per resource.
    SingleLine,
    /// Name, time and equipment on three lines per resource.
    ThreeLinesPerResource,
}

/// Ordered resource list that refuses unnamed entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationResources(Vec<OperationResource>);

impl OperationResources {
    /// Append a resource. Returns `false` and drops it when its name is blank.
    pub fn push(&mut self, resource: OperationResource) -> bool {
        if resource.full_name.trim().is_empty() {
            return false;
        }
        self.0.push(resource);
        true
    }

    /// Get the resource with this exact name, creating it if needed.
    pub fn add_resource(&mut self, full_name: &str) -> &mut OperationResource {
        let index = match self.0.iter().position(|r| r.full_name == full_name) {
            Some(index) => index,
            None => {
                self.0.push(OperationResource::new(full_name));
                self.0.len() - 1
            }
        };
        &mut self.0[index]
    }

    /// Add requested equipment to the resource with this name, creating it if needed.
    pub fn add_equipment(&mut self, full_name: &str, equipment: &str) -> &mut OperationResource {
        let resource = self.add_resource(full_name);
        resource.requested_equipment.push(equipment.to_string());
        resource
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperationResource> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<OperationResource> {
        self.0
    }

    pub fn render(&self, style: ResourceListStyle) -> String {
        let mut out = String::new();
        for resource in &self.0 {
            let equipment = resource.requested_equipment.join(", ");
            match style {
                ResourceListStyle::SingleLine => {
                    out.push_str(&format!(
                        "{}; {}; {} | ",
                        resource.full_name, resource.timestamp, equipment
                    ));
                }
                ResourceListStyle::ThreeLinesPerResource => {
                    out.push_str(&format!(
                        "{}\n{}\n{}\n",
                        resource.full_name, resource.timestamp, equipment
                    ));
                }
            }
        }
        out
    }
}

impl Deref for OperationResources {
    type Target = [OperationResource];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a OperationResources {
    type Item = &'a OperationResource;
    type IntoIter = std::slice::Iter<'a, OperationResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for OperationResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(ResourceListStyle::SingleLine))
    }
}

fn normalize_path(path: &str) -> String {
    path.trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
