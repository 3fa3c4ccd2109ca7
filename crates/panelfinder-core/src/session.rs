//! Lookup session: the selected record and its working copy.
//!
//! A session borrows a loaded [`Dataset`]. Each search replaces the selected
//! record and starts a fresh, empty [`Overlay`]; edits then recompute derived
//! fields on that overlay until the next search.

use std::borrow::Cow;

use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::dataset::Dataset;
use crate::error::CoreError;
use crate::overlay::{Overlay, recompute};
use crate::ranker::Match;
use crate::record::{Field, SolarRecord};

/// The record picked by the last successful search.
#[derive(Debug, Clone)]
pub struct Selection<'d> {
    /// What the user typed.
    pub query: String,
    pub matched: Match,
    pub record: &'d SolarRecord,
    pub overlay: Overlay,
}

impl Selection<'_> {
    /// Value to display for `field`: the edited value if any, else the stored one.
    pub fn effective(&self, field: Field) -> Option<Cow<'_, str>> {
        match self.overlay.get(field) {
            Some(edited) => Some(Cow::Borrowed(edited)),
            None => self.record.get(field).map(|v| Cow::Owned(v.to_string())),
        }
    }
}

pub struct Session<'d> {
    dataset: &'d Dataset,
    config: MatchConfig,
    selection: Option<Selection<'d>>,
}

impl<'d> Session<'d> {
    pub fn new(dataset: &'d Dataset, config: MatchConfig) -> Self {
        Self {
            dataset,
            config,
            selection: None,
        }
    }

    pub fn dataset(&self) -> &'d Dataset {
        self.dataset
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&Selection<'d>> {
        self.selection.as_ref()
    }

    /// Look up `query` and make the best match the selected record.
    ///
    /// The previous selection and its edits are dropped either way. Returns
    /// `Ok(None)` when nothing matches, and an error when there is no data to
    /// search, so the two cases can be told apart.
    pub fn search(&mut self, query: &str) -> Result<Option<&Selection<'d>>, CoreError> {
        self.selection = None;

        if self.dataset.is_empty() {
            return Err(CoreError::DatasetNotLoaded);
        }

        let Some((matched, record)) = self.dataset.resolve(query, &self.config) else {
            debug!(
                query,
                addresses = self.dataset.len(),
                sample = ?self.dataset.keys().take(5).map(|k| k.as_str()).collect::<Vec<_>>(),
                "no solar panel data for address"
            );
            return Ok(None);
        };

        info!(
            query,
            key = %matched.key,
            score = format_args!("{:.2}", matched.score),
            rule = %matched.rule,
            "selected address"
        );

        self.selection = Some(Selection {
            query: query.to_string(),
            matched,
            record,
            overlay: Overlay::default(),
        });
        Ok(self.selection.as_ref())
    }

    /// Edit one field of the selected record's working copy.
    pub fn edit(&mut self, field: Field, value: &str) -> Result<&Overlay, CoreError> {
        let selection = self.selection.as_mut().ok_or(CoreError::NoActiveRecord)?;
        selection.overlay = recompute(selection.record, &selection.overlay, field, value);
        Ok(&selection.overlay)
    }

    /// Like [`edit`](Self::edit), naming the field as a string ("avgSolarPanelOutput").
    pub fn edit_named(&mut self, field: &str, value: &str) -> Result<&Overlay, CoreError> {
        let field: Field = field.parse()?;
        self.edit(field, value)
    }
}
