//! Offline evaluation of the published model.
//!
//! The numbers come from the held-out test split used when the model was
//! trained (580 rows). Only the confusion matrix is stored; accuracy and
//! the per-class metrics are derived from it.

use std::fmt::Write;

/// Binary confusion matrix plus the class labels it is indexed by.
/// Rows are true classes, columns are predicted classes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub classes: Vec<String>,
    pub confusion: Vec<Vec<u32>>,
}

/// Metrics for one class, or an average over classes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u32,
}

impl Default for EvaluationReport {
    fn default() -> Self {
        Self::published()
    }
}

impl EvaluationReport {
    /// Evaluation of `best_personality_model` on its test split.
    pub fn published() -> Self {
        Self {
            classes: vec!["Extrovert".to_string(), "Introvert".to_string()],
            confusion: vec![vec![278, 24], vec![17, 261]],
        }
    }

    pub fn total(&self) -> u32 {
        self.confusion.iter().flatten().sum()
    }

    fn correct(&self) -> u32 {
        (0..self.classes.len()).map(|i| self.confusion[i][i]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Precision, recall, F1 and support of class `i`.
    pub fn class_metrics(&self, i: usize) -> ClassMetrics {
        let true_positive = self.confusion[i][i];
        let predicted: u32 = self.confusion.iter().map(|row| row[i]).sum();
        let support: u32 = self.confusion[i].iter().sum();

        let precision = ratio(true_positive, predicted);
        let recall = ratio(true_positive, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        ClassMetrics { precision, recall, f1, support }
    }

    pub fn macro_average(&self) -> ClassMetrics {
        let n = self.classes.len() as f64;
        let metrics: Vec<_> = (0..self.classes.len()).map(|i| self.class_metrics(i)).collect();
        ClassMetrics {
            precision: metrics.iter().map(|m| m.precision).sum::<f64>() / n,
            recall: metrics.iter().map(|m| m.recall).sum::<f64>() / n,
            f1: metrics.iter().map(|m| m.f1).sum::<f64>() / n,
            support: self.total(),
        }
    }

    pub fn weighted_average(&self) -> ClassMetrics {
        let total = f64::from(self.total());
        let metrics: Vec<_> = (0..self.classes.len()).map(|i| self.class_metrics(i)).collect();
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            metrics.iter().map(|m| f(m) * f64::from(m.support)).sum::<f64>() / total
        };
        ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: self.total(),
        }
    }

    /// Classification report in scikit-learn's text layout, two decimals.
    pub fn classification_report(&self) -> String {
        const HEADERS: [&str; 4] = ["precision", "recall", "f1-score", "support"];
        let width = self.classes.iter()
            .map(|c| c.len())
            .max()
            .unwrap_or(0)
            .max("weighted avg".len());

        let mut out = format!("{:>width$} ", "");
        for header in HEADERS {
            let _ = write!(out, " {:>9}", header);
        }
        out.push_str("\n\n");

        let row = |out: &mut String, name: &str, m: ClassMetrics| {
            let _ = writeln!(
                out,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            );
        };

        for (i, class) in self.classes.iter().enumerate() {
            row(&mut out, class, self.class_metrics(i));
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy(), self.total()
        );
        row(&mut out, "macro avg", self.macro_average());
        row(&mut out, "weighted avg", self.weighted_average());
        out
    }

    /// Confusion matrix printed the way numpy prints an integer array.
    pub fn confusion_text(&self) -> String {
        let width = self.confusion.iter()
            .flatten()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        let rows: Vec<String> = self.confusion.iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(|v| format!("{:>width$}", v)).collect();
                format!("[{}]", cells.join(" "))
            })
            .collect();
        format!("[{}]", rows.join("\n "))
    }

    /// The full evaluation block shown on the explanation page.
    pub fn render_text(&self) -> String {
        format!(
            "Akurasi: {}\nLaporan Klasifikasi:\n{}\nMatriks Kebingungan:\n {}\n",
            self.accuracy(),
            self.classification_report(),
            self.confusion_text()
        )
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}
