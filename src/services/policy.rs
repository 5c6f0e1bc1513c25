//! Boarding controllers
//!
//! A policy picks which lobby row releases its next passenger, given the
//! action mask. It returns `None` only when no row is valid.

use rand::prelude::*;
use serde::Deserialize;

/// Object-safe so it can be used as `Box<dyn BoardingPolicy>`.
pub trait BoardingPolicy {
    fn choose(&mut self, mask: &[bool]) -> Option<usize>;

    fn name(&self) -> &'static str;
}

fn valid_rows(mask: &[bool]) -> impl DoubleEndedIterator<Item = usize> + '_ {
    mask.iter().enumerate().filter_map(|(row, &ok)| ok.then_some(row))
}

/// Uniform over valid rows
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl BoardingPolicy for RandomPolicy {
    fn choose(&mut self, mask: &[bool]) -> Option<usize> {
        let rows: Vec<usize> = valid_rows(mask).collect();
        rows.choose(&mut self.rng).copied()
    }

    fn name(&self) -> &'static str {
        PolicyKind::Random.as_str()
    }
}

/// Always releases the rearmost row that still has passengers
#[derive(Debug, Default, Clone, Copy)]
pub struct BackToFrontPolicy;

impl BoardingPolicy for BackToFrontPolicy {
    fn choose(&mut self, mask: &[bool]) -> Option<usize> {
        valid_rows(mask).next_back()
    }

    fn name(&self) -> &'static str {
        PolicyKind::BackToFront.as_str()
    }
}

/// Always releases the foremost row that still has passengers
#[derive(Debug, Default, Clone, Copy)]
pub struct FrontToBackPolicy;

impl BoardingPolicy for FrontToBackPolicy {
    fn choose(&mut self, mask: &[bool]) -> Option<usize> {
        valid_rows(mask).next()
    }

    fn name(&self) -> &'static str {
        PolicyKind::FrontToBack.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    BackToFront,
    FrontToBack,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::BackToFront => "back_to_front",
            PolicyKind::FrontToBack => "front_to_back",
        }
    }

    pub fn build(self, seed: u64) -> Box<dyn BoardingPolicy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::BackToFront => Box::new(BackToFrontPolicy),
            PolicyKind::FrontToBack => Box::new(FrontToBackPolicy),
        }
    }
}
