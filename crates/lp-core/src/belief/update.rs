//! Bayesian belief update.
//!
//! For action `a` and observation `z`:
//!
//! ```text
//! τ(b, a, z)(s') ∝ O(z | s', a) · Σ_s T(s' | s, a) · b(s)
//! P(z | b, a)    = Σ_s' O(z | s', a) · Σ_s T(s' | s, a) · b(s)
//! ```

use lp_common::{ActionId, ObservationId, StateId};

use super::BeliefState;
use crate::model::LexPomdp;

/// Predicted successor distribution `Σ_s T(· | s, a) b(s)`, dense by state.
pub fn predict(model: &LexPomdp, belief: &BeliefState, action: ActionId) -> Vec<f64> {
    let mut next = vec![0.0; model.num_states()];
    for (s, p) in belief.support() {
        for &(s2, t) in model.transition(s, action) {
            next[s2] += p * t;
        }
    }
    next
}

/// Distribution over observations after taking `action` in `belief`.
///
/// Returns `(observation, probability)` pairs with positive probability,
/// sorted by observation.
pub fn observation_distribution(
    model: &LexPomdp,
    belief: &BeliefState,
    action: ActionId,
) -> Vec<(ObservationId, f64)> {
    let predicted = predict(model, belief, action);
    let mut probs = vec![0.0; model.num_observations()];
    for (s2, &p) in predicted.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        for &(z, o) in model.observation(action, StateId(s2)) {
            probs[z] += p * o;
        }
    }
    probs
        .into_iter()
        .enumerate()
        .filter(|&(_, p)| p > 0.0)
        .map(|(z, p)| (ObservationId(z), p))
        .collect()
}

/// Observation likelihood `P(z | b, a)`.
pub fn observation_likelihood(
    model: &LexPomdp,
    belief: &BeliefState,
    action: ActionId,
    observation: ObservationId,
) -> f64 {
    predict(model, belief, action)
        .iter()
        .enumerate()
        .map(|(s2, &p)| p * observation_prob(model, action, StateId(s2), observation))
        .sum()
}

/// Posterior belief `τ(b, a, z)`.
///
/// Returns None when the observation is impossible under `(b, a)`.
pub fn update(
    model: &LexPomdp,
    belief: &BeliefState,
    action: ActionId,
    observation: ObservationId,
) -> Option<BeliefState> {
    let mut weights = predict(model, belief, action);
    for (s2, w) in weights.iter_mut().enumerate() {
        *w *= observation_prob(model, action, StateId(s2), observation);
    }
    BeliefState::from_weights(&weights)
}

fn observation_prob(model: &LexPomdp, action: ActionId, next: StateId, z: ObservationId) -> f64 {
    let row = model.observation(action, next);
    row.binary_search_by_key(&z.index(), |&(o, _)| o)
        .map(|i| row[i].1)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelDocument;
    use serde_json::json;

    /// Listening in a static two-door world with an 85% accurate sensor.
    fn listen_model() -> LexPomdp {
        let doc: ModelDocument = serde_json::from_value(json!({
            "states": ["left", "right"],
            "actions": ["listen"],
            "observations": ["hear-left", "hear-right"],
            "transitions": [
                {"state": "left", "action": "listen", "successor": "left", "probability": 1.0},
                {"state": "right", "action": "listen", "successor": "right", "probability": 1.0}
            ],
            "observation_model": [
                {"action": "listen", "successor": "left", "observation": "hear-left", "probability": 0.85},
                {"action": "listen", "successor": "left", "observation": "hear-right", "probability": 0.15},
                {"action": "listen", "successor": "right", "observation": "hear-right", "probability": 0.85},
                {"action": "listen", "successor": "right", "observation": "hear-left", "probability": 0.15}
            ],
            "rewards": [{"name": "r", "entries": []}],
            "horizon": {"discount": 0.95},
            "initial_beliefs": [{"left": 0.5, "right": 0.5}]
        }))
        .unwrap();
        LexPomdp::from_document(&doc).unwrap()
    }

    #[test]
    fn update_matches_bayes_rule() {
        let m = listen_model();
        let b = BeliefState::uniform(2).unwrap();
        let post = update(&m, &b, ActionId(0), ObservationId(0)).unwrap();
        assert!((post.prob(StateId(0)) - 0.85).abs() < 1e-12);
        assert!((post.prob(StateId(1)) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn likelihoods_sum_to_one() {
        let m = listen_model();
        let b = BeliefState::from_dense(&[0.3, 0.7]).unwrap();
        let dist = observation_distribution(&m, &b, ActionId(0));
        let total: f64 = dist.iter().map(|&(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
        let direct = observation_likelihood(&m, &b, ActionId(0), ObservationId(1));
        assert!((direct - (0.3 * 0.15 + 0.7 * 0.85)).abs() < 1e-12);
    }

    #[test]
    fn certain_belief_stays_certain() {
        let m = listen_model();
        let b = BeliefState::certain(StateId(1), 2).unwrap();
        let post = update(&m, &b, ActionId(0), ObservationId(0)).unwrap();
        assert_eq!(post.prob(StateId(1)), 1.0);
    }
}
