use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::PlaceCatalog;
use crate::colors::{Palette, Rgb};
use crate::visit::{PlaceId, VisitRecord};

/// Places visited before the selected year and during it.
///
/// `past` and `current` are disjoint: a place visited in the selected year is
/// current even if it was also visited earlier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub past: BTreeSet<PlaceId>,
    pub current: BTreeSet<PlaceId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Unvisited,
    Past,
    Current,
}

/// How current places are highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    /// One fixed highlight colour (slider and static views).
    Steady,
    /// A fresh random colour per place on every recompute (playback).
    Flash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fill {
    Default,
    Visited,
    Highlight,
    Flash(Rgb),
}

impl Fill {
    pub fn color(self, palette: &Palette) -> Rgb {
        match self {
            Fill::Default => palette.unvisited,
            Fill::Visited => palette.visited,
            Fill::Highlight => palette.highlight,
            Fill::Flash(rgb) => rgb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceFill {
    pub place: PlaceId,
    pub fill: Fill,
}

/// Partition places by the selected year. Records after `year` are ignored.
pub fn project(records: &[VisitRecord], year: i32) -> Projection {
    let mut projection = Projection::default();
    for record in records {
        if record.year == year {
            projection.current.insert(record.place.clone());
        } else if record.year < year {
            projection.past.insert(record.place.clone());
        }
    }
    let Projection { past, current } = &mut projection;
    past.retain(|place| !current.contains(place));
    projection
}

impl Projection {
    pub fn classify(&self, place: &str) -> Visit {
        if self.current.contains(place) {
            Visit::Current
        } else if self.past.contains(place) {
            Visit::Past
        } else {
            Visit::Unvisited
        }
    }

    /// One fill instruction per drawable place. `sample` yields uniform
    /// values in `[0, 1)` and is only consulted for flashing places.
    pub fn fills<'a, I, R>(&self, places: I, style: HighlightStyle, mut sample: R) -> Vec<PlaceFill>
    where
        I: IntoIterator<Item = &'a str>,
        R: FnMut() -> f64,
    {
        places
            .into_iter()
            .map(|place| {
                let fill = match (self.classify(place), style) {
                    (Visit::Unvisited, _) => Fill::Default,
                    (Visit::Past, _) => Fill::Visited,
                    (Visit::Current, HighlightStyle::Steady) => Fill::Highlight,
                    (Visit::Current, HighlightStyle::Flash) => {
                        Fill::Flash(Rgb::from_unit_sample(sample()))
                    }
                };
                PlaceFill {
                    place: place.to_string(),
                    fill,
                }
            })
            .collect()
    }
}

/// Display names of the places visited in `year`, in record order without
/// repeats. Ids missing from the catalog are skipped. `None` when empty.
pub fn current_label(records: &[VisitRecord], year: i32, catalog: &PlaceCatalog) -> Option<String> {
    let mut seen = BTreeSet::new();
    let names: Vec<&str> = records
        .iter()
        .filter(|record| record.year == year)
        .filter(|record| seen.insert(record.place.as_str()))
        .filter_map(|record| catalog.name(&record.place))
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}
