//! Diagnosis catalogue: which hidden diagnosis a new game gets.

use rand::seq::SliceRandom;

/// Chooses the hidden diagnosis for a new game.
pub trait DiagnosisPicker: Send + Sync {
    /// Returns `None` only when there is nothing to pick from.
    fn pick(&self) -> Option<String>;

    /// Every diagnosis this picker can return.
    fn known(&self) -> Vec<String>;
}

/// Uniform random draw from a fixed list.
#[derive(Debug, Clone)]
pub struct RandomDiagnosisPicker {
    diseases: Vec<String>,
}

impl RandomDiagnosisPicker {
    pub fn new(diseases: Vec<String>) -> Self {
        Self { diseases }
    }
}

impl DiagnosisPicker for RandomDiagnosisPicker {
    fn pick(&self) -> Option<String> {
        self.diseases.choose(&mut rand::thread_rng()).cloned()
    }

    fn known(&self) -> Vec<String> {
        self.diseases.clone()
    }
}

/// Always returns the same diagnosis.
#[derive(Debug, Clone)]
pub struct FixedDiagnosisPicker(pub String);

impl DiagnosisPicker for FixedDiagnosisPicker {
    fn pick(&self) -> Option<String> {
        Some(self.0.clone())
    }

    fn known(&self) -> Vec<String> {
        vec![self.0.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_picker_draws_from_list() {
        let diseases = vec!["流感".to_string(), "肺炎".to_string()];
        let picker = RandomDiagnosisPicker::new(diseases.clone());
        for _ in 0..20 {
            assert!(diseases.contains(&picker.pick().unwrap()));
        }
    }

    #[test]
    fn random_picker_on_empty_list_returns_none() {
        assert_eq!(RandomDiagnosisPicker::new(vec![]).pick(), None);
    }

    #[test]
    fn fixed_picker_is_fixed() {
        let picker = FixedDiagnosisPicker("哮喘".to_string());
        assert_eq!(picker.pick().as_deref(), Some("哮喘"));
        assert_eq!(picker.known(), vec!["哮喘".to_string()]);
    }
}
