use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::charts::*;
use crate::config::*;
use crate::figure::Figure;
use crate::table::VoterTable;

/// Default number of figures kept by a `ChartCache`.
pub const DEFAULT_CACHE_SIZE: usize = 64;

/// A fully specified chart: the chart function and all of its arguments.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartRequest {
    BasicHist {
        year: u16,
        field: Field,
    },
    GrpHist {
        year: u16,
        field: Field,
        #[serde(rename = "secondField")]
        second_field: Field,
        normalization: Normalization,
        #[serde(rename = "barMode")]
        bar_mode: BarMode,
    },
    StackGrpHist {
        year: u16,
        field: Field,
        #[serde(rename = "secondField")]
        second_field: Field,
        normalization: Normalization,
    },
    GrpYrHist {
        field: Field,
        normalization: Normalization,
        #[serde(rename = "barMode")]
        bar_mode: BarMode,
    },
    MultiYrHist {
        field: Field,
        #[serde(rename = "secondField")]
        second_field: Field,
        normalization: Normalization,
        #[serde(rename = "barMode")]
        bar_mode: BarMode,
    },
    BasicPie {
        year: u16,
        field: Field,
    },
    GrpPie {
        year: u16,
        field: Field,
        #[serde(rename = "secondField")]
        second_field: Field,
        category: String,
    },
    MultiGrpPie {
        field: Field,
        #[serde(rename = "secondField")]
        second_field: Field,
        category: String,
    },
}

impl ChartRequest {
    /// Calls the chart function named by this request.
    pub fn render(&self, table: &VoterTable) -> Result<Figure, ChartError> {
        match self {
            ChartRequest::BasicHist { year, field } => basic_hist(table, *year, *field),
            ChartRequest::GrpHist {
                year,
                field,
                second_field,
                normalization,
                bar_mode,
            } => grp_hist(
                table,
                *year,
                *field,
                *second_field,
                *normalization,
                *bar_mode,
            ),
            ChartRequest::StackGrpHist {
                year,
                field,
                second_field,
                normalization,
            } => stack_grp_hist(table, *year, *field, *second_field, *normalization),
            ChartRequest::GrpYrHist {
                field,
                normalization,
                bar_mode,
            } => grp_yr_hist(table, *field, *normalization, *bar_mode),
            ChartRequest::MultiYrHist {
                field,
                second_field,
                normalization,
                bar_mode,
            } => multi_yr_hist(table, *field, *second_field, *normalization, *bar_mode),
            ChartRequest::BasicPie { year, field } => basic_pie(table, *year, *field),
            ChartRequest::GrpPie {
                year,
                field,
                second_field,
                category,
            } => grp_pie(table, *year, *field, *second_field, category),
            ChartRequest::MultiGrpPie {
                field,
                second_field,
                category,
            } => multi_grp_pie(table, *field, *second_field, category),
        }
    }

    /// The fields drawn by this request, in the form they are charted.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            ChartRequest::BasicHist { field, .. } => vec![*field],
            ChartRequest::BasicPie { field, .. } => vec![crate::categories::color_field(*field)],
            ChartRequest::GrpYrHist { field, .. } => vec![*field, Field::Year],
            ChartRequest::GrpHist {
                field,
                second_field,
                ..
            }
            | ChartRequest::StackGrpHist {
                field,
                second_field,
                ..
            }
            | ChartRequest::MultiYrHist {
                field,
                second_field,
                ..
            }
            | ChartRequest::GrpPie {
                field,
                second_field,
                ..
            }
            | ChartRequest::MultiGrpPie {
                field,
                second_field,
                ..
            } => vec![*field, crate::categories::color_field(*second_field)],
        }
    }
}

/// A bounded cache of rendered figures, evicting the least recently used one.
///
/// The figures only depend on the request and on the (immutable) table the
/// cache is used with. A cache must not be shared between different tables.
#[derive(Debug)]
pub struct ChartCache {
    figures: IndexMap<ChartRequest, Figure>,
    max_figures: usize,
    hits: u64,
    misses: u64,
}

impl ChartCache {
    /// Creates a cache holding at most `max_figures` figures (at least one).
    pub fn new(max_figures: usize) -> ChartCache {
        ChartCache {
            figures: IndexMap::new(),
            max_figures: max_figures.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_figures
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn contains(&self, request: &ChartRequest) -> bool {
        self.figures.contains_key(request)
    }

    /// Returns the cached figure for this request, rendering it on a miss.
    ///
    /// Errors are not cached.
    pub fn get_or_render(
        &mut self,
        table: &VoterTable,
        request: &ChartRequest,
    ) -> Result<Figure, ChartError> {
        // The most recently used entry is kept last.
        if let Some(fig) = self.figures.shift_remove(request) {
            self.hits += 1;
            debug!(
                "get_or_render: hit {:?} (hits: {} misses: {})",
                request, self.hits, self.misses
            );
            self.figures.insert(request.clone(), fig.clone());
            return Ok(fig);
        }
        self.misses += 1;
        debug!(
            "get_or_render: miss {:?} (hits: {} misses: {})",
            request, self.hits, self.misses
        );
        let fig = request.render(table)?;
        while self.figures.len() >= self.max_figures {
            if let Some((evicted, _)) = self.figures.shift_remove_index(0) {
                debug!("get_or_render: evicting {:?}", evicted);
            }
        }
        self.figures.insert(request.clone(), fig.clone());
        Ok(fig)
    }

    pub fn clear(&mut self) {
        self.figures.clear();
    }
}

impl Default for ChartCache {
    fn default() -> Self {
        ChartCache::new(DEFAULT_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VoterTable {
        VoterTable::from_records(vec![
            VoterRecord::new(2020)
                .with(Field::Party, "Dem")
                .with(Field::Gender, "F"),
            VoterRecord::new(2016)
                .with(Field::Party, "Rep")
                .with(Field::Gender, "M"),
        ])
    }

    fn party(year: u16) -> ChartRequest {
        ChartRequest::BasicHist {
            year,
            field: Field::Party,
        }
    }

    #[test]
    fn hits_do_not_render_again() {
        let _ = env_logger::builder().is_test(true).try_init();
        let t = table();
        let mut cache = ChartCache::new(4);
        let first = cache.get_or_render(&t, &party(2020)).unwrap();
        let second = cache.get_or_render(&t, &party(2020)).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let t = table();
        let mut cache = ChartCache::new(2);
        let pie = ChartRequest::BasicPie {
            year: 2020,
            field: Field::Gender,
        };
        cache.get_or_render(&t, &party(2020)).unwrap();
        cache.get_or_render(&t, &party(2016)).unwrap();
        // Touching 2020 makes 2016 the oldest entry.
        cache.get_or_render(&t, &party(2020)).unwrap();
        cache.get_or_render(&t, &pie).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&party(2020)));
        assert!(cache.contains(&pie));
        assert!(!cache.contains(&party(2016)));
    }

    #[test]
    fn capacity_is_at_least_one() {
        let t = table();
        let mut cache = ChartCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.get_or_render(&t, &party(2020)).unwrap();
        cache.get_or_render(&t, &party(2016)).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&party(2016)));
    }

    #[test]
    fn errors_are_not_cached() {
        let t = table();
        let mut cache = ChartCache::default();
        let req = ChartRequest::BasicHist {
            year: 2020,
            field: Field::City,
        };
        assert!(cache.get_or_render(&t, &req).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn request_serializes_with_its_kind() {
        let req = ChartRequest::GrpHist {
            year: 2016,
            field: Field::VoteMethod4,
            second_field: Field::Party,
            normalization: Normalization::Percent,
            bar_mode: BarMode::Group,
        };
        let js = serde_json::to_value(&req).unwrap();
        assert_eq!(js["kind"], "grp_hist");
        assert_eq!(js["secondField"], "party_grp");
        assert_eq!(js["normalization"], "percent");
        assert_eq!(js["barMode"], "group");
    }

    #[test]
    fn fields_redirect_age_for_colors() {
        let req = ChartRequest::GrpPie {
            year: 2020,
            field: Field::Party,
            second_field: Field::Age,
            category: "Dem".to_string(),
        };
        assert_eq!(req.fields(), vec![Field::Party, Field::Generation]);
    }
}
