use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;

use log::{debug, trace};
use validator::Validate;

use crate::common::constants::NO_THRESHOLD;
use crate::common::errors::MatchError;
use crate::common::types::Weight;
use crate::core::postlist::{next_handling_prune, BoxedPostList, MaxWeightSignal};

use super::match_config::{MatchConfig, MatchMode};
use super::top_k::{ScoredDoc, TopK};

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Best first in ranked mode, docid order in boolean mode.
    pub hits: Vec<ScoredDoc>,
    /// Postings the root handed out.
    pub examined: usize,
    /// Whether matching stopped before the tree ran out of postings.
    pub terminated_early: bool,
}

/// Drives a postlist tree to its end, collecting hits.
///
/// Owns the root slot, so a root which replaces itself is swapped here. The
/// `signal` must be the one every combinator of the tree was built with.
pub struct Matcher<'a> {
    root: BoxedPostList,
    config: MatchConfig,
    signal: MaxWeightSignal,
    is_stopped: Option<&'a AtomicBool>,
}

impl<'a> Matcher<'a> {
    pub fn new(root: BoxedPostList, config: MatchConfig, signal: MaxWeightSignal) -> Self {
        Self {
            root,
            config,
            signal,
            is_stopped: None,
        }
    }

    /// Matching gives up, keeping the hits so far, once `is_stopped` is set.
    pub fn with_stop_flag(mut self, is_stopped: &'a AtomicBool) -> Self {
        self.is_stopped = Some(is_stopped);
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    fn stopped(&self) -> bool {
        self.is_stopped.map_or(false, |flag| flag.load(Relaxed))
    }

    pub fn run(mut self) -> Result<MatchResult, MatchError> {
        self.config.validate()?;
        debug!(
            "matching {} in {:?} mode, estimated {} postings (min {}, max {})",
            self.root.description(),
            self.config.mode,
            self.root.term_freq_est(),
            self.root.term_freq_min(),
            self.root.term_freq_max()
        );
        match self.config.mode {
            MatchMode::Ranked => self.run_ranked(),
            MatchMode::Boolean => self.run_boolean(),
        }
    }

    fn recalc_max_weight(&mut self) -> Weight {
        self.signal.take();
        let max_weight = self.root.recalc_max_weight();
        trace!("max weight of {} is {}", self.root.description(), max_weight);
        max_weight
    }

    fn run_ranked(&mut self) -> Result<MatchResult, MatchError> {
        let mut top = TopK::new(self.config.limit);
        let mut w_min = NO_THRESHOLD;
        let mut max_weight = self.recalc_max_weight();
        let mut examined = 0;
        let mut terminated_early = false;

        loop {
            if self.stopped() {
                debug!("matching stopped after {} postings", examined);
                terminated_early = true;
                break;
            }
            if self.signal.is_raised() {
                max_weight = self.recalc_max_weight();
            }
            if top.is_full() && max_weight <= w_min {
                debug!("max weight {} can't beat {}, terminating after {} postings", max_weight, w_min, examined);
                terminated_early = true;
                break;
            }

            next_handling_prune(&mut self.root, w_min, &self.signal)?;
            if self.root.at_end() {
                break;
            }
            examined += 1;

            let doc = ScoredDoc {
                docid: self.root.docid(),
                weight: self.root.weight(),
            };
            if top.push(doc) && self.config.early_termination && top.threshold() > w_min {
                w_min = top.threshold();
                max_weight = self.recalc_max_weight();
            }
        }

        Ok(MatchResult {
            hits: top.into_sorted_vec(),
            examined,
            terminated_early,
        })
    }

    fn run_boolean(&mut self) -> Result<MatchResult, MatchError> {
        let limit = self.config.limit;
        let mut hits = vec![];
        let mut terminated_early = false;

        loop {
            if self.stopped() {
                debug!("matching stopped after {} postings", hits.len());
                terminated_early = true;
                break;
            }
            next_handling_prune(&mut self.root, NO_THRESHOLD, &self.signal)?;
            if self.root.at_end() {
                break;
            }
            hits.push(ScoredDoc {
                docid: self.root.docid(),
                weight: 0.0,
            });
            if limit > 0 && hits.len() >= limit {
                terminated_early = true;
                break;
            }
        }

        Ok(MatchResult {
            examined: hits.len(),
            hits,
            terminated_early,
        })
    }
}
