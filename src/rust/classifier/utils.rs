use super::error::ClassifierError;

/// Index of the largest probability. Ties resolve to the first class, as in `numpy.argmax`.
pub(crate) fn argmax(probabilities: &[f32]) -> Option<usize> {
    probabilities.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((i, p)),
        })
        .map(|(i, _)| i)
}

/// Checks that a probability row lines up with the class list.
pub(crate) fn check_probabilities(classes: &[String], probabilities: &[f32]) -> Result<(), ClassifierError> {
    if probabilities.len() != classes.len() {
        return Err(ClassifierError::PredictionError(format!(
            "Model returned {} probabilities for {} classes",
            probabilities.len(),
            classes.len()
        )));
    }
    if let Some(pos) = probabilities.iter().position(|p| !p.is_finite()) {
        return Err(ClassifierError::PredictionError(
            format!("Probability for class '{}' is not a finite number", classes[pos])
        ));
    }
    Ok(())
}
