//! Strongly typed finite model built from a [`ModelDocument`].

use std::collections::{HashMap, HashSet};

use lp_common::{ActionId, StateId};
use lp_math::simplex::PROB_TOLERANCE;

use super::document::{ModelDocument, RewardsSpec};
use super::horizon::Horizon;
use super::rewards::ObjectiveReward;
use super::{ModelError, Result};
use crate::belief::BeliefState;

/// Finite POMDP with lexicographically ordered objectives.
///
/// Transition rows are indexed by `(s, a)` and observation rows by `(a, s')`;
/// both hold `(index, probability)` pairs sorted by index with zero entries
/// dropped.
#[derive(Debug, Clone)]
pub struct LexPomdp {
    name: Option<String>,
    states: Vec<String>,
    actions: Vec<String>,
    observations: Vec<String>,
    transitions: Vec<Vec<(usize, f64)>>,
    observation_rows: Vec<Vec<(usize, f64)>>,
    rewards: Vec<ObjectiveReward>,
    horizon: Horizon,
    initial_beliefs: Vec<BeliefState>,
}

struct NameIndex<'a> {
    space: &'static str,
    index: HashMap<&'a str, usize>,
}

impl<'a> NameIndex<'a> {
    fn build(space: &'static str, names: &'a [String]) -> Result<Self> {
        if names.is_empty() {
            return Err(ModelError::EmptySpace(space));
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.as_str(), i).is_some() {
                return Err(ModelError::DuplicateName {
                    space,
                    name: name.clone(),
                });
            }
        }
        Ok(NameIndex { space, index })
    }

    fn get(&self, name: &str, context: &'static str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownName {
                space: self.space,
                name: name.to_string(),
                context,
            })
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}

fn check_probability(value: f64, context: impl FnOnce() -> String) -> Result<()> {
    if !value.is_finite() || value < 0.0 || value > 1.0 + PROB_TOLERANCE {
        return Err(ModelError::InvalidProbability {
            context: context(),
            value,
        });
    }
    Ok(())
}

/// Sort each row, reject duplicate columns, drop zeros, and check that every
/// row sums to one.
fn finish_rows(
    rows: &mut [Vec<(usize, f64)>],
    describe: impl Fn(usize) -> String,
    describe_col: impl Fn(usize, usize) -> String,
) -> Result<()> {
    for (r, row) in rows.iter_mut().enumerate() {
        row.sort_by_key(|&(c, _)| c);
        if let Some(w) = row.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ModelError::DuplicateEntry {
                context: describe_col(r, w[0].0),
            });
        }
        row.retain(|&(_, p)| p > 0.0);
        let sum: f64 = row.iter().map(|&(_, p)| p).sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(ModelError::RowNotNormalized {
                context: describe(r),
                sum,
            });
        }
    }
    Ok(())
}

impl LexPomdp {
    /// Check the shape of a model document and build the typed model.
    pub fn from_document(doc: &ModelDocument) -> Result<Self> {
        let states = doc
            .states
            .as_ref()
            .ok_or(ModelError::MissingComponent("states"))?;
        let actions = doc
            .actions
            .as_ref()
            .ok_or(ModelError::MissingComponent("actions"))?;
        let observations = doc
            .observations
            .as_ref()
            .ok_or(ModelError::MissingComponent("observations"))?;

        let s_idx = NameIndex::build("state", states)?;
        let a_idx = NameIndex::build("action", actions)?;
        let z_idx = NameIndex::build("observation", observations)?;
        let (ns, na) = (s_idx.len(), a_idx.len());

        // P(s' | s, a)
        let entries = doc
            .transitions
            .as_ref()
            .ok_or(ModelError::MissingComponent("transitions"))?;
        let mut transitions = vec![Vec::new(); ns * na];
        for e in entries {
            let s = s_idx.get(&e.state, "transitions")?;
            let a = a_idx.get(&e.action, "transitions")?;
            let next = s_idx.get(&e.successor, "transitions")?;
            check_probability(e.probability, || {
                format!("transition ({}, {}) -> {}", e.state, e.action, e.successor)
            })?;
            transitions[s * na + a].push((next, e.probability));
        }
        finish_rows(
            &mut transitions,
            |r| format!("transition row ({}, {})", states[r / na], actions[r % na]),
            |r, c| {
                format!(
                    "transition ({}, {}) -> {}",
                    states[r / na],
                    actions[r % na],
                    states[c]
                )
            },
        )?;

        // P(z | s', a)
        let entries = doc
            .observation_model
            .as_ref()
            .ok_or(ModelError::MissingComponent("observation_model"))?;
        let mut observation_rows = vec![Vec::new(); na * ns];
        for e in entries {
            let a = a_idx.get(&e.action, "observation_model")?;
            let next = s_idx.get(&e.successor, "observation_model")?;
            let z = z_idx.get(&e.observation, "observation_model")?;
            check_probability(e.probability, || {
                format!(
                    "observation ({}, {}) -> {}",
                    e.action, e.successor, e.observation
                )
            })?;
            observation_rows[a * ns + next].push((z, e.probability));
        }
        finish_rows(
            &mut observation_rows,
            |r| format!("observation row ({}, {})", actions[r / ns], states[r % ns]),
            |r, c| {
                format!(
                    "observation ({}, {}) -> {}",
                    actions[r / ns],
                    states[r % ns],
                    observations[c]
                )
            },
        )?;

        let rewards = build_rewards(doc, &s_idx, &a_idx, states, actions)?;

        let spec = doc
            .horizon
            .as_ref()
            .ok_or(ModelError::MissingComponent("horizon"))?;
        let horizon = match spec.steps {
            None => Horizon::Infinite {
                discount: spec.discount,
            },
            Some(steps) => Horizon::Finite {
                discount: spec.discount,
                steps,
            },
        };
        if !horizon.has_valid_discount() {
            return Err(ModelError::InvalidDiscount(spec.discount));
        }

        let seeds = doc
            .initial_beliefs
            .as_ref()
            .ok_or(ModelError::MissingComponent("initial_beliefs"))?;
        if seeds.is_empty() {
            return Err(ModelError::EmptySpace("initial_beliefs"));
        }
        let mut initial_beliefs = Vec::with_capacity(seeds.len());
        for (index, seed) in seeds.iter().enumerate() {
            let mut pairs = Vec::with_capacity(seed.len());
            for (name, &p) in seed {
                pairs.push((StateId(s_idx.get(name, "initial_beliefs")?), p));
            }
            let belief = BeliefState::from_pairs(ns, pairs)
                .map_err(|source| ModelError::InvalidBelief { index, source })?;
            initial_beliefs.push(belief);
        }

        Ok(LexPomdp {
            name: doc.name.clone(),
            states: states.clone(),
            actions: actions.clone(),
            observations: observations.clone(),
            transitions,
            observation_rows,
            rewards,
            horizon,
            initial_beliefs,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn num_observations(&self) -> usize {
        self.observations.len()
    }

    pub fn num_objectives(&self) -> usize {
        self.rewards.len()
    }

    pub fn state_name(&self, s: StateId) -> &str {
        &self.states[s.index()]
    }

    pub fn action_name(&self, a: ActionId) -> &str {
        &self.actions[a.index()]
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionId> {
        (0..self.actions.len()).map(ActionId)
    }

    /// Sparse successor distribution `P(· | s, a)`.
    pub fn transition(&self, s: StateId, a: ActionId) -> &[(usize, f64)] {
        &self.transitions[s.index() * self.actions.len() + a.index()]
    }

    /// Sparse observation distribution `P(· | s', a)`.
    pub fn observation(&self, a: ActionId, next: StateId) -> &[(usize, f64)] {
        &self.observation_rows[a.index() * self.states.len() + next.index()]
    }

    /// Objectives in priority order (index 0 is highest).
    pub fn objectives(&self) -> &[ObjectiveReward] {
        &self.rewards
    }

    pub fn objective(&self, index: usize) -> &ObjectiveReward {
        &self.rewards[index]
    }


    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn discount(&self) -> f64 {
        self.horizon.discount()
    }

    /// Seed belief points, copied into each solve's point set.
    pub fn initial_beliefs(&self) -> &[BeliefState] {
        &self.initial_beliefs
    }
}

fn build_rewards(
    doc: &ModelDocument,
    s_idx: &NameIndex<'_>,
    a_idx: &NameIndex<'_>,
    states: &[String],
    actions: &[String],
) -> Result<Vec<ObjectiveReward>> {
    let spec = doc
        .rewards
        .as_ref()
        .ok_or(ModelError::MissingComponent("rewards"))?;
    let objectives = match spec {
        RewardsSpec::Factored(objectives) => objectives,
        RewardsSpec::Scalar(_) => {
            return Err(ModelError::MalformedRewards(
                "rewards must be factored into one named table per objective".into(),
            ))
        }
    };
    if objectives.is_empty() {
        return Err(ModelError::MalformedRewards("no objectives defined".into()));
    }

    let (ns, na) = (states.len(), actions.len());
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut tables = Vec::with_capacity(objectives.len());
    for objective in objectives {
        if !seen_names.insert(objective.name.as_str()) {
            return Err(ModelError::MalformedRewards(format!(
                "objective '{}' defined twice",
                objective.name
            )));
        }
        let mut values = vec![0.0; ns * na];
        let mut filled = vec![false; ns * na];
        for e in &objective.entries {
            let s = s_idx.get(&e.state, "rewards")?;
            let a = a_idx.get(&e.action, "rewards")?;
            if let Some(next) = &e.successor {
                return Err(ModelError::MalformedRewards(format!(
                    "objective '{}' reward ({}, {}) depends on successor '{}'; only state-action rewards are supported",
                    objective.name, e.state, e.action, next
                )));
            }
            if !e.reward.is_finite() {
                return Err(ModelError::MalformedRewards(format!(
                    "objective '{}' reward ({}, {}) is not finite",
                    objective.name, e.state, e.action
                )));
            }
            let cell = s * na + a;
            if filled[cell] {
                return Err(ModelError::MalformedRewards(format!(
                    "objective '{}' reward ({}, {}) appears more than once",
                    objective.name, states[s], actions[a]
                )));
            }
            filled[cell] = true;
            values[cell] = e.reward;
        }
        tables.push(ObjectiveReward::new(objective.name.clone(), na, values));
    }
    Ok(tables)
}
