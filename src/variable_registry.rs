use fnv::FnvHashMap;

use crate::instance::{BoolVar, IntVar};

#[derive(Clone, Debug, Default)]
pub(crate) struct VariableRegister {
    int_names: Vec<String>,
    int_domains: Vec<(i64, i64)>,
    bool_names: Vec<String>,
    by_name: FnvHashMap<String, IntVar>,
}

impl VariableRegister {
    pub(crate) fn new() -> VariableRegister {
        VariableRegister::default()
    }

    pub(crate) fn int_name(&self, var: IntVar) -> &str {
        &self.int_names[var.index()]
    }

    pub(crate) fn int_domain(&self, var: IntVar) -> (i64, i64) {
        self.int_domains[var.index()]
    }

    pub(crate) fn get_int_by_name(&self, name: &str) -> Option<IntVar> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn create_int(&mut self, name: &str, lo: i64, hi: i64) -> IntVar {
        let var = IntVar(self.int_names.len() as u64);
        self.int_names.push(name.to_string());
        self.int_domains.push((lo, hi));
        self.by_name.insert(name.to_string(), var);
        var
    }

    pub(crate) fn create_bool(&mut self, name: &str) -> BoolVar {
        let var = BoolVar(self.bool_names.len() as u64);
        self.bool_names.push(name.to_string());
        var
    }

    pub(crate) fn int_count(&self) -> usize {
        self.int_names.len()
    }

    pub(crate) fn bool_count(&self) -> usize {
        self.bool_names.len()
    }

    pub(crate) fn contains_int(&self, var: IntVar) -> bool {
        var.index() < self.int_count()
    }

    pub(crate) fn contains_bool(&self, var: BoolVar) -> bool {
        var.index() < self.bool_count()
    }

    pub(crate) fn iter_int(&self) -> impl Iterator<Item = IntVar> + '_ {
        (0..self.int_names.len()).map(|ix| IntVar(ix as u64))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_register_bookkeeping() {
        let mut reg = VariableRegister::new();
        let w1 = reg.create_int("w1", 1, 40);
        let w2 = reg.create_int("w2", 1, 40);
        let sel = reg.create_bool("t1_c1");

        assert_eq!(reg.int_count(), 2);
        assert_eq!(reg.bool_count(), 1);
        assert_eq!(reg.int_name(w2), "w2");
        assert!(reg.contains_bool(sel));
        assert_eq!(reg.int_domain(w1), (1, 40));
        assert_eq!(reg.get_int_by_name("w1"), Some(w1));
        assert_eq!(reg.get_int_by_name("w3"), None);
        assert!(!reg.contains_int(IntVar(2)));
        assert_eq!(reg.iter_int().collect::<Vec<_>>(), vec![w1, w2]);
    }
}
