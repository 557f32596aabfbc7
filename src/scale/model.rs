use log::debug;

use crate::instance::{IntVar, Literal};
use crate::problem_builder::ProblemBuilder;
use crate::solver::Instance;

use super::combination::{combinations, CombinationVector};
use super::config::PuzzleConfig;
use super::ScaleError;

/// The selectors offered for one target. At least one must hold, and each one that holds forces
/// its combination to sum to the target.
#[derive(Clone, Debug)]
pub struct TargetConstraint {
    pub target: i64,
    pub selectors: Vec<Literal>,
}

/// The compiled puzzle: weight variables in slot order, plus one selector per target and
/// combination vector.
#[derive(Clone)]
pub struct ScaleModel {
    pub(crate) instance: Instance,
    weights: Vec<IntVar>,
    combinations: Vec<CombinationVector>,
    targets: Vec<TargetConstraint>,
    config: PuzzleConfig,
}

impl ScaleModel {
    /// Validates `config` and compiles the model. Nothing is built when validation fails.
    pub fn build(config: &PuzzleConfig) -> Result<ScaleModel, ScaleError> {
        config.validate()?;
        let combinations = combinations(config.weight_count, config.coverage())?;

        let mut pb = ProblemBuilder::new();
        let weights = (1..=config.weight_count)
            .map(|slot| pb.int_var(&format!("w{}", slot), config.min_value, config.max_value))
            .collect::<Result<Vec<_>, _>>()?;

        let mut targets = Vec::with_capacity(config.value_count() as usize);
        for target in config.targets() {
            let selectors = combinations
                .iter()
                .enumerate()
                .map(|(j, combination)| {
                    let selector = pb.bool_var(&format!("t{}_c{}", target, j));
                    pb.require_linear_eq_if(selector, combination.expression(&weights), target);
                    selector
                })
                .collect::<Vec<_>>();
            pb.require_any(&selectors);
            targets.push(TargetConstraint { target, selectors });
        }

        debug!(
            "scale model: {} weights, {} targets, {} combinations per target, {} constraints",
            weights.len(),
            targets.len(),
            combinations.len(),
            pb.constraint_count()
        );
        Ok(ScaleModel {
            instance: pb.build()?,
            weights,
            combinations,
            targets,
            config: config.clone(),
        })
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn weights(&self) -> &[IntVar] {
        &self.weights
    }

    pub fn combinations(&self) -> &[CombinationVector] {
        &self.combinations
    }

    pub fn targets(&self) -> &[TargetConstraint] {
        &self.targets
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn constraint_count(&self) -> usize {
        self.instance.constraints().len()
    }

    pub fn disjunction_count(&self) -> usize {
        self.instance
            .constraints()
            .iter()
            .filter(|c| c.is_disjunction())
            .count()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::instance::ConstraintKind;
    use crate::scale::{ConfigError, Coverage};

    #[test]
    fn test_model_shape() {
        let model = ScaleModel::build(&PuzzleConfig::new(1, 5, 4)).unwrap();

        assert_eq!(model.weights().len(), 4);
        assert_eq!(model.combinations().len(), 64);
        assert_eq!(model.targets().len(), 5);
        assert_eq!(model.disjunction_count(), 5);
        assert_eq!(model.constraint_count(), 5 * 64 + 5);
        assert_eq!(model.instance().int_var_count(), 4);
        assert_eq!(model.instance().bool_var_count(), 5 * 64);
        assert_eq!(model.instance().int_var_by_name("w3"), Some(model.weights()[2]));
        assert!(model
            .targets()
            .iter()
            .all(|t| t.selectors.len() == model.combinations().len()));
    }

    #[test]
    fn test_selectors_enforce_their_combination() {
        let config = PuzzleConfig::new(7, 7, 2).with_coverage(Coverage::Full);
        let model = ScaleModel::build(&config).unwrap();
        let selectors = &model.targets()[0].selectors;

        for (selector, combination) in selectors.iter().zip(model.combinations()) {
            let reified = model.instance().constraints().iter().find(|c| match c.kind() {
                ConstraintKind::LinearEq { enforcement, .. } => *enforcement == Some(*selector),
                ConstraintKind::BoolOr(_) => false,
            });
            match reified.map(|c| c.kind()) {
                Some(ConstraintKind::LinearEq { expr, rhs, .. }) => {
                    assert_eq!(*rhs, 7);
                    assert_eq!(*expr, combination.expression(model.weights()));
                }
                other => panic!("no reified equality for {:?}: {:?}", selector, other),
            }
        }
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let err = ScaleModel::build(&PuzzleConfig::new(10, 1, 4)).err().unwrap();
        assert!(matches!(
            err,
            ScaleError::Config(ConfigError::EmptyRange { min: 10, max: 1 })
        ));
    }
}
