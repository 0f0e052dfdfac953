use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sgp4::Elements;
use utoipa::ToSchema;

use crate::predict::elements::ElementSummary;
use crate::predict::error::PredictError;
use crate::predict::observer::Observer;
use crate::predict::oracle::SatelliteOracle;

/// Identity of one satellite in the loaded catalog.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u64,
    pub tle_source: String,
}

/// One validated element set. The raw lines are kept so oracles can be
/// constructed per request without cloning parsed elements around.
pub struct TleEntry {
    pub info: SatelliteInfo,
    line1: String,
    line2: String,
}

impl TleEntry {
    pub fn elements(&self) -> Result<Elements, PredictError> {
        Elements::from_tle(
            Some(self.info.name.clone()),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
        .map_err(|e| PredictError::Elements(e.to_string()))
    }

    pub fn oracle(&self, observer: Observer) -> Result<SatelliteOracle, PredictError> {
        SatelliteOracle::new(observer, self.elements()?)
    }

    pub fn summary(&self) -> Result<ElementSummary, PredictError> {
        Ok(ElementSummary::from_elements(&self.elements()?))
    }
}

/// Loads every `.tle`/`.txt` file from a directory, keyed by catalog number.
pub struct TleLoader {
    tle_dir: PathBuf,
    satellites: HashMap<u64, TleEntry>,
}

impl TleLoader {
    pub fn new(tle_dir: PathBuf) -> Self {
        Self {
            tle_dir,
            satellites: HashMap::new(),
        }
    }

    /// Load all TLE files from the directory. Files that fail to parse are
    /// logged and skipped so one bad download cannot empty the catalog.
    pub fn load_all(&mut self) -> Result<(), PredictError> {
        if !self.tle_dir.exists() {
            return Err(PredictError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        self.satellites.clear();

        for entry in fs::read_dir(&self.tle_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            if ext != "tle" && ext != "txt" {
                continue;
            }

            match parse_tle_file(&path) {
                Ok(entries) => {
                    for tle_entry in entries {
                        self.satellites.insert(tle_entry.info.norad_id, tle_entry);
                    }
                }
                Err(e) => {
                    log::warn!("failed to parse TLE file {}: {}", path.display(), e);
                }
            }
        }

        Ok(())
    }

    pub fn satellites(&self) -> Vec<&TleEntry> {
        self.satellites.values().collect()
    }

    /// Reload TLE files (called manually or by a future watcher).
    #[allow(dead_code)]
    pub fn reload(&mut self) -> Result<(), PredictError> {
        self.load_all()
    }
}

/// Parse a single TLE file, which may hold any number of satellites.
fn parse_tle_file(path: &Path) -> Result<Vec<TleEntry>, PredictError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut results = Vec::new();
    for (name, line1, line2) in parse_tle_sets(&content) {
        // Parse once up front so broken sets are rejected at load time.
        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| PredictError::InvalidTle {
                file: filename.clone(),
                message: e.to_string(),
            })?;

        let sat_name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
        results.push(TleEntry {
            info: SatelliteInfo {
                name: sat_name,
                norad_id: elements.norad_id,
                tle_source: filename.clone(),
            },
            line1,
            line2,
        });
    }

    Ok(results)
}

/// Split raw TLE text into `(name, line1, line2)` sets. Both bare 2-line and
/// named 3-line sets are accepted; unrecognized lines are skipped.
pub fn parse_tle_sets(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
