//! Pre-computed regression results, one table per target series.

/// Evaluation of one regression model on the hold-out set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelScore {
    pub model: &'static str,
    pub mape: f64,
    pub rmse: f64,
    pub r2: f64,
    pub ljung_box_p: f64,
    pub jarque_bera_p: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelReport {
    pub title: &'static str,
    pub scores: [ModelScore; 4],
    /// Residual plots, one per model, in display order.
    pub images: [&'static str; 4],
}

pub const SCORE_COLUMNS: [&str; 6] = [
    "Modelo",
    "MAPE",
    "RMSE",
    "R^2",
    "Ljung-Box p-value",
    "Jarque-Bera p-value",
];

const KNN: &str = "Regresión K-NN";
const LASSO: &str = "Regresión Lasso";
const LINEAR: &str = "Regresión Lineal";
const RIDGE: &str = "Regresión Ridge";

const fn score(
    model: &'static str,
    mape: f64,
    rmse: f64,
    r2: f64,
    ljung_box_p: f64,
    jarque_bera_p: f64,
) -> ModelScore {
    ModelScore {
        model,
        mape,
        rmse,
        r2,
        ljung_box_p,
        jarque_bera_p,
    }
}

pub const MODEL_REPORTS: [ModelReport; 5] = [
    ModelReport {
        title: "Modelo 1: Wind speed 100 metros (Sensor 1)",
        scores: [
            score(KNN, 5.894020, 1.227196, 0.510433, 1.169459e-22, 0.000070),
            score(LASSO, 4.030474, 0.851866, 0.764100, 3.756088e-67, 0.219406),
            score(LINEAR, 4.013425, 0.845024, 0.767875, 1.306806e-63, 0.248818),
            score(RIDGE, 4.013893, 0.846827, 0.766883, 7.620692e-65, 0.241076),
        ],
        images: ["knn1.png", "lineal1.png", "ridge1.png", "lasso1.png"],
    },
    ModelReport {
        title: "Modelo 2: Wind speed 100 metros (Sensor 2)",
        scores: [
            score(KNN, 5.832642, 1.204380, 0.517706, 8.404607e-23, 0.000114),
            score(LASSO, 4.015778, 0.837676, 0.766688, 3.521004e-67, 0.173372),
            score(LINEAR, 3.996092, 0.830596, 0.770615, 1.214976e-63, 0.198714),
            score(RIDGE, 3.996013, 0.832460, 0.769584, 7.349954e-65, 0.191579),
        ],
        images: ["knn2.png", "lineal2.png", "ridge2.png", "lasso2.png"],
    },
    ModelReport {
        title: "Modelo 3: Wind speed 80 metros (Sensor 1)",
        scores: [
            score(KNN, 6.751773, 1.363591, 0.369181, 1.042822e-32, 0.000104),
            score(LASSO, 4.232456, 0.872926, 0.741481, 5.546813e-63, 0.269785),
            score(LINEAR, 4.219102, 0.864644, 0.746364, 9.800919e-60, 0.375339),
            score(RIDGE, 4.214576, 0.866600, 0.745215, 8.855226e-61, 0.339695),
        ],
        images: ["knn3.png", "lineal3.png", "ridge3.png", "lasso3.png"],
    },
    ModelReport {
        title: "Modelo 4: Wind speed 80 metros (Sensor 2)",
        scores: [
            score(KNN, 6.684306, 1.351586, 0.377391, 8.968552e-32, 0.000067),
            score(LASSO, 4.206317, 0.865937, 0.744436, 4.300009e-63, 0.252943),
            score(LINEAR, 4.203377, 0.857570, 0.749351, 7.246420e-60, 0.344181),
            score(RIDGE, 4.196624, 0.859552, 0.748190, 6.662610e-61, 0.314146),
        ],
        images: ["knn4.png", "lineal4.png", "ridge4.png", "lasso4.png"],
    },
    ModelReport {
        title: "Modelo 5: Wind speed 60 metros",
        scores: [
            score(KNN, 6.876112, 1.332056, 0.349680, 8.837886e-33, 1.308209e-08),
            score(LASSO, 4.445645, 0.890595, 0.709302, 8.780533e-59, 3.338686e-01),
            score(LINEAR, 4.439774, 0.880800, 0.715661, 1.000130e-55, 4.692246e-01),
            score(RIDGE, 4.436869, 0.882914, 0.714294, 1.275099e-56, 4.269807e-01),
        ],
        images: ["knn5.png", "lineal5.png", "ridge5.png", "lasso5.png"],
    },
];

/// p-values below 1e-6 are shown in scientific notation.
pub fn format_p_value(p: f64) -> String {
    if p != 0.0 && p.abs() < 1e-6 {
        format!("{:.6e}", p)
    } else {
        format!("{:.6}", p)
    }
}

impl ModelScore {
    pub fn row(&self) -> Vec<String> {
        vec![
            self.model.to_string(),
            format!("{:.6}", self.mape),
            format!("{:.6}", self.rmse),
            format!("{:.6}", self.r2),
            format_p_value(self.ljung_box_p),
            format_p_value(self.jarque_bera_p),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_values_keep_their_precision() {
        assert_eq!(format_p_value(1.169459e-22), "1.169459e-22");
        assert_eq!(format_p_value(0.219406), "0.219406");
        assert_eq!(format_p_value(0.000070), "0.000070");
        assert_eq!(format_p_value(1.308209e-08), "1.308209e-8");
    }

    #[test]
    fn rows_match_columns() {
        for report in &MODEL_REPORTS {
            for score in &report.scores {
                assert_eq!(score.row().len(), SCORE_COLUMNS.len());
            }
        }
    }

    fn best_by_rmse(report: &ModelReport) -> &'static str {
        report
            .scores
            .iter()
            .min_by(|a, b| a.rmse.total_cmp(&b.rmse))
            .unwrap()
            .model
    }

    #[test]
    fn linear_family_beats_knn() {
        for report in &MODEL_REPORTS {
            assert_ne!(best_by_rmse(report), KNN);
            assert_eq!(report.scores[0].model, KNN);
        }
        assert_eq!(best_by_rmse(&MODEL_REPORTS[0]), LINEAR);
    }
}
