use crate::domain::prediction::PredictionResult;
use crate::flow::form::FormState;
use crate::render::{price_per_mwh, two_decimals, yes_no};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub price: String,
    pub inputs: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

pub fn result_view(result: &PredictionResult) -> ResultView {
    ResultView {
        price: price_per_mwh(result.predicted_price),
        inputs: vec![
            ("Hour", result.hour.to_string()),
            ("Load", format!("{} MW", two_decimals(result.load))),
            ("Temperature", format!("{} °C", two_decimals(result.temperature))),
            ("Weekend", yes_no(result.weekend).to_string()),
            ("Holiday", yes_no(result.holiday).to_string()),
        ],
    }
}

pub fn form_view(state: &FormState) -> FormView {
    FormView {
        submit_label: if state.loading {
            "Predicting..."
        } else {
            "Predict Price"
        },
        error: state.error.clone(),
        result: state.result.as_ref().map(result_view),
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prediction Result")?;
        writeln!(f, "Predicted Price: {}", self.price)?;
        writeln!(f)?;
        writeln!(f, "Input Parameters:")?;
        for (label, value) in &self.inputs {
            writeln!(f, "  - {label}: {value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            writeln!(f, "[error] {error}")?;
        }
        if let Some(result) = &self.result {
            write!(f, "{result}")?;
        }
        Ok(())
    }
}
