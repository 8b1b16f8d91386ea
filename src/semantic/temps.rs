//! Fresh names for temporaries and block labels
//!
//! Two independent counters, owned by one evaluation run. Names are never
//! reused within a run, including across functions.

use super::constants::{LABEL_PREFIX, TEMP_PREFIX};

#[derive(Debug, Default)]
pub struct TempNameGenerator {
    temps: usize,
    labels: usize,
}

impl TempNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_temp(&mut self) -> String {
        let name = format!("{}{}", TEMP_PREFIX, self.temps);
        self.temps += 1;
        name
    }

    pub fn new_label(&mut self) -> String {
        let name = format!("{}{}", LABEL_PREFIX, self.labels);
        self.labels += 1;
        name
    }

    /// Number of temporaries handed out so far.
    pub fn temps_issued(&self) -> usize {
        self.temps
    }

    pub fn labels_issued(&self) -> usize {
        self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent() {
        let mut names = TempNameGenerator::new();
        assert_eq!(names.new_temp(), "_v0");
        assert_eq!(names.new_temp(), "_v1");
        assert_eq!(names.new_label(), "__b0");
        assert_eq!(names.new_temp(), "_v2");
        assert_eq!(names.new_label(), "__b1");
        assert_eq!(names.temps_issued(), 3);
        assert_eq!(names.labels_issued(), 2);
    }

    #[test]
    fn test_fresh_generator_restarts() {
        let mut first = TempNameGenerator::new();
        first.new_temp();
        first.new_label();
        let mut second = TempNameGenerator::new();
        assert_eq!(second.new_temp(), "_v0");
        assert_eq!(second.new_label(), "__b0");
    }
}
