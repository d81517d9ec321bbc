//! Symptom selection and analysis.

use crate::model::input::InputError;
use crate::rules::symptom::{diagnose, display_name, Diagnosis};
use crate::rules::TagSelection;
use log::info;

#[derive(Debug, Default)]
pub struct SymptomChecker {
    selection: TagSelection,
}

impl SymptomChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one symptom tag; returns whether it is selected afterwards.
    ///
    /// Blank tags are ignored.
    pub fn toggle(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.selection.toggle(tag)
    }

    /// Unselects one tag; returns whether it was selected.
    pub fn remove(&mut self, tag: &str) -> bool {
        self.selection.remove(tag.trim())
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &TagSelection {
        &self.selection
    }

    /// Display labels for the selected tags, in selection order.
    pub fn selected_labels(&self) -> Vec<String> {
        self.selection.iter().map(display_name).collect()
    }

    /// Diagnoses the current selection.
    ///
    /// # Errors
    /// - `NoSymptomsSelected` when nothing is selected.
    pub fn analyze(&self) -> Result<Diagnosis, InputError> {
        if self.selection.is_empty() {
            return Err(InputError::NoSymptomsSelected);
        }

        let diagnosis = diagnose(&self.selection);
        info!(
            "event=symptom_analyze module=symptom status=ok selected={} emergency={}",
            self.selection.len(),
            diagnosis.emergency
        );
        Ok(diagnosis)
    }
}

#[cfg(test)]
mod tests {
    use super::SymptomChecker;
    use crate::model::input::InputError;
    use crate::rules::symptom::{EMERGENCY_DIAGNOSIS, GENERAL_DIAGNOSIS, RESPIRATORY_DIAGNOSIS};

    #[test]
    fn analyze_requires_a_selection() {
        let checker = SymptomChecker::new();
        assert_eq!(checker.analyze(), Err(InputError::NoSymptomsSelected));
    }

    #[test]
    fn toggling_changes_the_diagnosis() {
        let mut checker = SymptomChecker::new();
        checker.toggle("fever");
        assert_eq!(checker.analyze().unwrap(), GENERAL_DIAGNOSIS);

        checker.toggle("cough");
        assert_eq!(checker.analyze().unwrap(), RESPIRATORY_DIAGNOSIS);

        checker.toggle("chest-pain");
        assert_eq!(checker.analyze().unwrap(), EMERGENCY_DIAGNOSIS);

        checker.toggle("chest-pain");
        assert_eq!(checker.analyze().unwrap(), RESPIRATORY_DIAGNOSIS);
    }

    #[test]
    fn labels_follow_selection_order() {
        let mut checker = SymptomChecker::new();
        checker.toggle("stomach-pain");
        checker.toggle("fever");
        assert!(!checker.toggle(" "));
        assert_eq!(checker.selected_labels(), vec!["Stomach Pain", "Fever"]);

        assert!(checker.remove("stomach-pain"));
        assert_eq!(checker.selected_labels(), vec!["Fever"]);

        checker.clear();
        assert!(checker.selection().is_empty());
    }
}
