use core::fmt;

use crate::instance::*;

use super::domain::DomainStore;

/// A branching step in the search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Fix(IntVar, i64),
    AtLeast(IntVar, i64),
    Assign(Literal),
}

impl Decision {
    pub(crate) fn is_boolean(&self) -> bool {
        matches!(self, Decision::Assign(_))
    }
}

/// A variable whose domain changed since the propagator last looked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Int(IntVar),
    Bool(BoolVar),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DomainConflict {
    Empty(IntVar),
    Clash(BoolVar),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Change {
    Lower(IntVar, i64),
    Upper(IntVar, i64),
    Bool(BoolVar),
}

/// Stores the traversal path of the DFS, and owns the domains. Should be the source of truth for
/// what needs to be reverted upon backtrack.
#[derive(Clone)]
pub(crate) struct Trail {
    // Trail will never be empty - the first element stores decision level 0
    trail: Vec<TrailEntry>,
    domains: DomainStore,
    events: Vec<Event>,
}

impl Trail {
    pub(crate) fn new(domains: DomainStore) -> Trail {
        Trail {
            trail: vec![TrailEntry::new(None, None)],
            domains,
            events: vec![],
        }
    }

    /// The number of decisions in the current assignment
    pub(crate) fn current_decision_level(&self) -> usize {
        self.trail.len() - 1
    }

    pub(crate) fn domains(&self) -> &DomainStore {
        &self.domains
    }

    pub(crate) fn last_decision(&self) -> Option<Decision> {
        self.trail.last().and_then(|entry| entry.decision)
    }

    pub(crate) fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Opens a new decision level and applies the decision to it. `alternative` is the branch to
    /// take if this one fails; `None` marks the level as the last branch at this point.
    pub(crate) fn add_decision(
        &mut self,
        decision: Decision,
        alternative: Option<Decision>,
    ) -> Result<(), DomainConflict> {
        self.trail.push(TrailEntry::new(Some(decision), alternative));
        match decision {
            Decision::Fix(var, value) => {
                self.set_lower(var, value)?;
                self.set_upper(var, value)?;
            }
            Decision::AtLeast(var, value) => {
                self.set_lower(var, value)?;
            }
            Decision::Assign(lit) => {
                self.assign(lit)?;
            }
        }
        Ok(())
    }

    pub(crate) fn set_lower(&mut self, var: IntVar, value: i64) -> Result<bool, DomainConflict> {
        let current = self.domains.lb(var);
        if value <= current {
            return Ok(false);
        }
        if value > self.domains.ub(var) {
            return Err(DomainConflict::Empty(var));
        }
        self.record(Change::Lower(var, current));
        self.domains.set_lower(var, value);
        self.events.push(Event::Int(var));
        Ok(true)
    }

    pub(crate) fn set_upper(&mut self, var: IntVar, value: i64) -> Result<bool, DomainConflict> {
        let current = self.domains.ub(var);
        if value >= current {
            return Ok(false);
        }
        if value < self.domains.lb(var) {
            return Err(DomainConflict::Empty(var));
        }
        self.record(Change::Upper(var, current));
        self.domains.set_upper(var, value);
        self.events.push(Event::Int(var));
        Ok(true)
    }

    /// Makes `lit` true
    pub(crate) fn assign(&mut self, lit: Literal) -> Result<bool, DomainConflict> {
        match self.domains.literal_value(lit) {
            Some(true) => Ok(false),
            Some(false) => Err(DomainConflict::Clash(lit.var())),
            None => {
                self.record(Change::Bool(lit.var()));
                self.domains.set_bool(lit.var(), Some(lit.polarity()));
                self.events.push(Event::Bool(lit.var()));
                Ok(true)
            }
        }
    }

    /// Drops decision levels until one with an untried alternative is found, and returns that
    /// alternative. The caller is responsible for applying it. Returns None once the search
    /// space is exhausted; the root level is never dropped.
    pub(crate) fn backtrack(&mut self) -> Option<Decision> {
        self.events.clear();
        while self.trail.len() > 1 {
            if let Some(alternative) = self.pop_level().and_then(|entry| entry.alternative) {
                return Some(alternative);
            }
        }
        None
    }

    /// Rolls back the boolean decisions at the top of the trail, leaving the integer decisions.
    /// Used after a solution is reported, so that each integer assignment is reported once.
    pub(crate) fn drop_boolean_decisions(&mut self) {
        while self.trail.len() > 1 && self.last_decision().map_or(false, |d| d.is_boolean()) {
            self.pop_level();
        }
    }

    // Callers check that the trail holds more than the root level
    fn pop_level(&mut self) -> Option<TrailEntry> {
        let entry = self.trail.pop()?;
        for change in entry.changes.iter().rev() {
            match *change {
                Change::Lower(var, previous) => self.domains.set_lower(var, previous),
                Change::Upper(var, previous) => self.domains.set_upper(var, previous),
                Change::Bool(var) => self.domains.set_bool(var, None),
            }
        }
        Some(entry)
    }

    fn record(&mut self, change: Change) {
        if let Some(entry) = self.trail.last_mut() {
            entry.changes.push(change);
        }
    }
}

impl fmt::Debug for Trail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Trail {{ depth={:?}, domains=[{:?}] }}",
            self.current_decision_level(),
            self.domains()
        )
    }
}

#[derive(Clone, Debug)]
struct TrailEntry {
    decision: Option<Decision>,
    alternative: Option<Decision>,
    changes: Vec<Change>,
}

impl TrailEntry {
    fn new(decision: Option<Decision>, alternative: Option<Decision>) -> TrailEntry {
        TrailEntry {
            decision,
            alternative,
            changes: vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::variable_registry::VariableRegister;

    fn trail() -> (Trail, IntVar, IntVar, BoolVar) {
        let mut reg = VariableRegister::new();
        let x = reg.create_int("x", 1, 5);
        let y = reg.create_int("y", 1, 5);
        let b = reg.create_bool("b");
        (Trail::new(DomainStore::new(&reg)), x, y, b)
    }

    #[test]
    fn test_bookkeeping() {
        let (mut trail, x, y, b) = trail();

        trail
            .add_decision(Decision::Fix(x, 1), Some(Decision::AtLeast(x, 2)))
            .unwrap();
        assert_eq!(trail.current_decision_level(), 1);
        assert!(trail.domains().is_fixed(x));

        assert_eq!(trail.set_upper(y, 3), Ok(true));
        assert_eq!(trail.set_upper(y, 4), Ok(false));
        assert_eq!(trail.set_lower(y, 4), Err(DomainConflict::Empty(y)));
        assert_eq!(trail.current_decision_level(), 1);

        let lit = Literal::positive(b);
        assert_eq!(trail.assign(lit), Ok(true));
        assert_eq!(trail.assign(lit), Ok(false));
        assert_eq!(trail.assign(lit.invert()), Err(DomainConflict::Clash(b)));

        assert_eq!(
            trail.take_events(),
            vec![Event::Int(x), Event::Int(y), Event::Bool(b)]
        );
        assert!(trail.take_events().is_empty());
    }

    #[test]
    fn test_backtrack_rollback() {
        let (mut trail, x, y, b) = trail();
        // root level changes survive every backtrack
        trail.set_upper(y, 4).unwrap();

        trail
            .add_decision(Decision::Fix(x, 1), Some(Decision::AtLeast(x, 2)))
            .unwrap();
        trail.set_lower(y, 2).unwrap();
        trail
            .add_decision(Decision::Assign(Literal::positive(b)), None)
            .unwrap();

        let pivot = trail.backtrack();
        assert_eq!(pivot, Some(Decision::AtLeast(x, 2)));
        assert_eq!(trail.current_decision_level(), 0);
        assert_eq!(trail.domains().lb(x), 1);
        assert_eq!(trail.domains().ub(x), 5);
        assert_eq!((trail.domains().lb(y), trail.domains().ub(y)), (1, 4));
        assert_eq!(trail.domains().bool_value(b), None);

        trail.add_decision(Decision::AtLeast(x, 2), None).unwrap();
        assert_eq!(trail.backtrack(), None);
        assert_eq!(trail.domains().lb(x), 1);
    }

    #[test]
    fn test_drop_boolean_decisions() {
        let (mut trail, x, _, b) = trail();
        let lit = Literal::positive(b);

        trail
            .add_decision(Decision::Fix(x, 3), Some(Decision::AtLeast(x, 4)))
            .unwrap();
        trail
            .add_decision(Decision::Assign(lit), Some(Decision::Assign(lit.invert())))
            .unwrap();
        trail.drop_boolean_decisions();

        assert_eq!(trail.current_decision_level(), 1);
        assert_eq!(trail.last_decision(), Some(Decision::Fix(x, 3)));
        assert_eq!(trail.domains().bool_value(b), None);
    }
}
