//! Route preload table and project records.
//!
//! The built-in table is a small CSV file (`route,asset` per row) embedded
//! at compile time. Rows for the same route keep their file order, which is
//! the order the assets are requested in.

use crate::error::RouteTableError;
use csv::{ReaderBuilder, Trim};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Deserialize)]
struct RouteRow {
    route: String,
    asset: String,
}

/// Immutable mapping from route path to the assets it wants preloaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePreloadTable {
    assets: HashMap<String, Vec<String>>,
}

impl RoutePreloadTable {
    /// Build a table from `(route, assets)` pairs. Repeated routes are merged.
    pub fn from_entries<R, A>(entries: impl IntoIterator<Item = (R, Vec<A>)>) -> Self
    where
        R: Into<String>,
        A: Into<String>,
    {
        let mut table = Self::default();
        for (route, assets) in entries {
            let route = route.into();
            for asset in assets {
                table.push(route.clone(), asset.into());
            }
        }
        table
    }

    /// Parse `route,asset` rows (with a header line).
    pub fn from_csv_str(content: &str) -> Result<Self, RouteTableError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let mut table = Self::default();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row: RouteRow = record.deserialize(None)?;
            if row.route.is_empty() || row.asset.is_empty() {
                return Err(RouteTableError::EmptyField { line });
            }
            if !row.route.starts_with('/') {
                return Err(RouteTableError::RelativeRoute {
                    line,
                    route: row.route,
                });
            }
            table.push(row.route, row.asset);
        }

        info!(
            "Loaded route preload table: {} routes, {} assets",
            table.assets.len(),
            table.total_assets()
        );
        Ok(table)
    }

    /// The table shipped with the site.
    pub fn builtin() -> Result<Self, RouteTableError> {
        Self::from_csv_str(crate::config::ROUTE_TABLE_CSV)
    }

    fn push(&mut self, route: String, asset: String) {
        self.assets.entry(route).or_default().push(asset);
    }

    /// Assets for `route`, or `None` if the route preloads nothing.
    pub fn assets_for(&self, route: &str) -> Option<&[String]> {
        self.assets.get(route).map(Vec::as_slice)
    }

    /// Sum of asset counts over all routes (duplicates across routes count twice).
    pub fn total_assets(&self) -> usize {
        self.assets.values().map(Vec::len).sum()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProjectId {
    Number(i64),
    Float(f64),
    Text(String),
}

/// Project identifier with loose equality: `2`, `"2"` and `" 02 "` are the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawProjectId")]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => ProjectId(n.to_string()),
            Err(_) => ProjectId(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawProjectId> for ProjectId {
    fn from(raw: RawProjectId) -> Self {
        match raw {
            RawProjectId::Number(n) => ProjectId(n.to_string()),
            RawProjectId::Float(f) => ProjectId::new(&f.to_string()),
            RawProjectId::Text(s) => ProjectId::new(&s),
        }
    }
}

impl From<i64> for ProjectId {
    fn from(n: i64) -> Self {
        ProjectId(n.to_string())
    }
}

impl From<u32> for ProjectId {
    fn from(n: u32) -> Self {
        ProjectId(n.to_string())
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId::new(s)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        ProjectId::new(&s)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A portfolio project as supplied by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProjectRecord {
    pub fn new(id: impl Into<ProjectId>, title: impl Into<String>, images: &[&str]) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The first image, shown as the project's cover.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn secondary_images(&self) -> &[String] {
        self.images.get(1..).unwrap_or(&[])
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Parse a JSON array of project records.
pub fn read_projects_from_json(content: &str) -> Result<Vec<ProjectRecord>, serde_json::Error> {
    let projects: Vec<ProjectRecord> = serde_json::from_str(content)?;
    info!("Loaded {} projects", projects.len());
    Ok(projects)
}
