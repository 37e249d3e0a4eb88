//! Lexicographic solve orchestration.
//!
//! Per round:
//! 1. Snapshot the full action set.
//! 2. For each objective in priority order, build the baseline cache, start
//!    from one zero vector per belief point and run the calibrated number of
//!    sweeps. The final generation becomes that objective's value function.
//! 3. Hand the point set to the expansion strategy.
//!
//! The no-op strategy ends the solve after the first round. Expansion is
//! skipped after the last configured round: the returned point set is then
//! exactly the set the returned value functions were backed up at, so every
//! belief point in a policy has a vector computed for it.

use lp_common::ActionId;
use lp_config::SolverConfig;
use tracing::{debug, info, info_span, warn};

use super::alpha::best_index;
use super::{
    backup, calibrate, AlphaVector, BaselineCache, Calibration, LexicographicPolicy,
    ProjectionCache, RoundStats, SolveError, SolveStats, ValueFunction,
};
use crate::belief::{BeliefPointSet, BeliefState};
use crate::expansion::{strategy_for, BeliefExpansion, ExpansionContext};
use crate::logging::event_names;
use crate::logging::Stage;
use crate::model::LexPomdp;

/// L-PBVI solver.
///
/// A solver holds configuration only. Every call to [`solve`](Self::solve)
/// owns a fresh belief point set and a fresh expansion strategy, so repeated
/// solves of the same model with the same configuration agree exactly.
pub struct LpbviSolver {
    config: SolverConfig,
    expansion: Option<Box<dyn Fn() -> Box<dyn BeliefExpansion> + Send + Sync>>,
}

impl std::fmt::Debug for LpbviSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LpbviSolver")
            .field("config", &self.config)
            .field("custom_expansion", &self.expansion.is_some())
            .finish()
    }
}

impl LpbviSolver {
    pub fn new(config: SolverConfig) -> Self {
        LpbviSolver {
            config,
            expansion: None,
        }
    }

    /// Replace the configured expansion rule with a custom strategy factory.
    ///
    /// The factory is called once per solve.
    pub fn with_expansion<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn BeliefExpansion> + Send + Sync + 'static,
    {
        self.expansion = Some(Box::new(factory));
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Run every precondition check and calibrate the sweep count without
    /// solving.
    pub fn check(&self, model: &LexPomdp) -> Result<Calibration, SolveError> {
        self.preconditions(model)?;
        calibrate(model, self.config.tolerance)
    }

    fn preconditions(&self, model: &LexPomdp) -> Result<(), SolveError> {
        let horizon = model.horizon();
        if !horizon.is_infinite() {
            return Err(SolveError::FiniteHorizon(horizon));
        }
        if let Some(slack) = &self.config.slack {
            if slack.len() != model.num_objectives() {
                return Err(SolveError::SlackLength {
                    expected: model.num_objectives(),
                    actual: slack.len(),
                });
            }
            if let Some((index, &value)) = slack
                .iter()
                .enumerate()
                .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
            {
                return Err(SolveError::InvalidSlack { index, value });
            }
        }
        let tolerance = self.config.tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(SolveError::InvalidTolerance(tolerance));
        }
        if self.config.max_expansions == 0 {
            return Err(SolveError::NoRounds);
        }
        if self.expansion.is_none() && self.config.expansion_rule().is_err() {
            return Err(SolveError::UnknownExpansionRule(
                self.config.expansion_rule.clone(),
            ));
        }
        Ok(())
    }

    fn strategy(&self) -> Result<Box<dyn BeliefExpansion>, SolveError> {
        if let Some(factory) = &self.expansion {
            return Ok(factory());
        }
        let rule = self
            .config
            .expansion_rule()
            .map_err(|_| SolveError::UnknownExpansionRule(self.config.expansion_rule.clone()))?;
        Ok(strategy_for(rule, self.config.seed))
    }

    /// Solve `model`, returning one value function per objective.
    pub fn solve(&self, model: &LexPomdp) -> Result<LexicographicPolicy, SolveError> {
        self.preconditions(model)?;
        let calibration = calibrate(model, self.config.tolerance)?;
        let mut strategy = self.strategy()?;

        let stage = Stage::Solve;
        info!(
            target: event_names::SOLVE_STARTED,
            stage = %stage,
            objectives = model.num_objectives(),
            states = model.num_states(),
            actions = model.num_actions(),
            sweeps = calibration.sweeps,
            rounds = self.config.max_expansions,
            expansion = strategy.name(),
            "Starting lexicographic solve"
        );

        let mut points =
            BeliefPointSet::from_seed(model.initial_beliefs()).with_limit(self.config.max_belief_points);
        let mut value_functions: Vec<ValueFunction> = Vec::new();
        let mut rounds = Vec::new();

        for round in 0..self.config.max_expansions {
            let _round_span = info_span!("round", round = round as u64).entered();
            info!(
                target: event_names::SOLVE_ROUND_STARTED,
                stage = %stage,
                belief_points = points.len(),
                "Round started"
            );

            let actions: Vec<ActionId> = model.actions().collect();
            let mut solved = Vec::with_capacity(model.num_objectives());
            let mut residuals = Vec::with_capacity(model.num_objectives());
            for objective in 0..model.num_objectives() {
                let _objective_span =
                    info_span!("objective", objective = objective as u64).entered();
                let (vf, residual) =
                    solve_objective(model, objective, &actions, &points, calibration.sweeps)?;
                info!(
                    target: event_names::SOLVE_OBJECTIVE_SOLVED,
                    stage = %stage,
                    name = model.objective(objective).name(),
                    alpha_vectors = vf.len(),
                    residual = residual.unwrap_or(0.0),
                    "Objective solved"
                );
                solved.push(vf);
                residuals.push(residual);
            }
            value_functions = solved;

            let solved_points = points.len();
            let last_round = round + 1 == self.config.max_expansions;
            let mut points_added = 0;
            if !strategy.is_terminal() && !last_round {
                let ctx = ExpansionContext {
                    model,
                    value_functions: &value_functions,
                    round,
                };
                points_added = strategy.expand(&mut points, &ctx)?;
                info!(
                    target: event_names::EXPAND_FINISHED,
                    stage = %Stage::Expand,
                    strategy = strategy.name(),
                    added = points_added,
                    belief_points = points.len(),
                    "Belief set expanded"
                );
            }

            rounds.push(RoundStats {
                round,
                belief_points: solved_points,
                final_residuals: residuals,
                points_added,
            });

            if strategy.is_terminal() {
                break;
            }
            if !last_round && points.is_full() {
                warn!(
                    target: event_names::EXPAND_STOPPED,
                    stage = %Stage::Expand,
                    strategy = strategy.name(),
                    belief_points = points.len(),
                    "Belief point cap reached; stopping early"
                );
                break;
            }
        }

        let belief_points: Vec<BeliefState> = points.as_slice().to_vec();
        info!(
            target: event_names::SOLVE_FINISHED,
            stage = %stage,
            rounds = rounds.len(),
            belief_points = belief_points.len(),
            "Solve finished"
        );

        let objectives = model
            .objectives()
            .iter()
            .map(|o| o.name().to_string())
            .collect();
        let stats = SolveStats {
            calibration,
            expansion_rule: strategy.name().to_string(),
            rounds,
        };
        Ok(LexicographicPolicy::new(
            objectives,
            value_functions,
            belief_points,
            stats,
        ))
    }
}

/// Run the calibrated sweeps for one objective.
///
/// Returns the final generation and the largest value change the last sweep
/// itself made at any belief point. That is the step from sweep N-1 to sweep
/// N, not the change one further backup of the result would make.
fn solve_objective(
    model: &LexPomdp,
    objective: usize,
    actions: &[ActionId],
    points: &BeliefPointSet,
    sweeps: u32,
) -> Result<(ValueFunction, Option<f64>), SolveError> {
    let first = actions.first().copied().ok_or(SolveError::EmptyActionSet)?;
    let baseline = BaselineCache::build(model, objective, actions);

    let mut current: Vec<AlphaVector> = points
        .iter()
        .map(|_| AlphaVector::zeros(first, model.num_states()))
        .collect();
    let mut next: Vec<AlphaVector> = Vec::with_capacity(points.len());
    let mut residual = None;

    for sweep in 0..sweeps {
        let projections = ProjectionCache::build(model, &current, actions);
        next.clear();
        for (point, b) in points.iter().enumerate() {
            let alpha = backup(b, &baseline, &projections).ok_or(SolveError::EmptyActionSet)?;
            if !alpha.is_finite() {
                return Err(SolveError::NonFinite { objective, point });
            }
            next.push(alpha);
        }

        let change = max_value_change(&current, &next, points);
        debug!(
            target: event_names::SOLVE_SWEEP_FINISHED,
            sweep,
            residual = change,
            "Sweep finished"
        );
        residual = Some(change);
        std::mem::swap(&mut current, &mut next);
    }

    Ok((ValueFunction::new(current), residual))
}

fn max_value_change(previous: &[AlphaVector], current: &[AlphaVector], points: &BeliefPointSet) -> f64 {
    points
        .iter()
        .map(|b| {
            let old = best_index(previous, b).map(|(_, v)| v).unwrap_or(0.0);
            let new = best_index(current, b).map(|(_, v)| v).unwrap_or(0.0);
            (new - old).abs()
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::NoExpansion;
    use crate::test_models;

    fn config() -> SolverConfig {
        SolverConfig::default().with_tolerance(0.01)
    }

    #[test]
    fn zero_reward_solves_to_zero() {
        let model = test_models::constant(0.0, 0.9);
        let policy = LpbviSolver::new(config()).solve(&model).unwrap();
        let b = BeliefState::uniform(1).unwrap();
        assert_eq!(policy.values_at(&b), vec![0.0]);
    }

    #[test]
    fn constant_reward_approaches_fixed_point() {
        let model = test_models::constant(1.0, 0.5);
        // Flat reward: the span floors at 1e-6, so a tiny ε is needed for sweeps.
        let policy = LpbviSolver::new(SolverConfig::default().with_tolerance(1e-12))
            .solve(&model)
            .unwrap();
        let v = policy.values_at(&BeliefState::uniform(1).unwrap())[0];
        assert!((v - 2.0).abs() < 1e-5, "value {v}");
    }

    #[test]
    fn tiger_policy_listens_when_unsure() {
        let model = test_models::tiger();
        let policy = LpbviSolver::new(config()).solve(&model).unwrap();
        assert_eq!(policy.objectives(), &["treasure".to_string(), "quiet".to_string()]);
        for b in policy.belief_points() {
            assert!(policy.values_at(b).iter().all(|v| v.is_finite()));
        }
        let uncertain = BeliefState::uniform(2).unwrap();
        assert_eq!(policy.action_at(&uncertain), Some(ActionId(0)));
        assert_eq!(policy.actions_at(&uncertain).len(), 2);
    }

    #[test]
    fn no_op_rule_runs_one_round() {
        let model = test_models::tiger();
        let policy = LpbviSolver::new(config().with_max_expansions(5))
            .solve(&model)
            .unwrap();
        assert_eq!(policy.stats().rounds_run(), 1);
        assert_eq!(policy.belief_points().len(), 3);
    }

    #[test]
    fn custom_strategy_is_used() {
        let model = test_models::tiger();
        let solver = LpbviSolver::new(config().with_expansion_rule("bogus"))
            .with_expansion(|| Box::new(NoExpansion));
        let policy = solver.solve(&model).unwrap();
        assert_eq!(policy.stats().expansion_rule, "none");
    }

    #[test]
    fn expansion_grows_points_between_rounds() {
        let model = test_models::tiger();
        let policy = LpbviSolver::new(
            config()
                .with_tolerance(0.5)
                .with_max_expansions(3)
                .with_expansion_rule("ssea")
                .with_seed(4),
        )
        .solve(&model)
        .unwrap();
        let stats = policy.stats();
        assert!(stats.rounds_run() >= 2);
        assert!(stats.rounds[1].belief_points > stats.rounds[0].belief_points);
        assert_eq!(stats.rounds.last().unwrap().points_added, 0);
    }

    #[test]
    fn preconditions_fail_before_solving() {
        let model = test_models::tiger();
        let err = LpbviSolver::new(config().with_slack(vec![0.0]))
            .solve(&model)
            .unwrap_err();
        assert_eq!(err, SolveError::SlackLength { expected: 2, actual: 1 });

        let err = LpbviSolver::new(config().with_slack(vec![0.0, -1.0]))
            .solve(&model)
            .unwrap_err();
        assert!(matches!(err, SolveError::InvalidSlack { index: 1, .. }));

        let err = LpbviSolver::new(config().with_expansion_rule("bogus"))
            .solve(&model)
            .unwrap_err();
        assert_eq!(err, SolveError::UnknownExpansionRule("bogus".into()));

        let err = LpbviSolver::new(config().with_max_expansions(0))
            .solve(&model)
            .unwrap_err();
        assert_eq!(err, SolveError::NoRounds);
    }

    #[test]
    fn check_reports_calibration() {
        let model = test_models::tiger();
        let cal = LpbviSolver::new(config()).check(&model).unwrap();
        assert_eq!(cal.per_objective.len(), 2);
        assert!(cal.sweeps > 0);
    }
}
