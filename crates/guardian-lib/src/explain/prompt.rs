//! Prompt rendering for spike explanations

use super::ExplanationRequest;

/// Render the FinOps analyst prompt for one spike
pub fn build_prompt(request: &ExplanationRequest) -> String {
    let baseline = match request.baseline_cost {
        Some(avg) => format!(" (Normal average is ${:.0})", avg),
        None => String::new(),
    };

    format!(
        "You are a FinOps Cloud Expert.\n\
         Analyze the following billing alert:\n\
         - Date: {date}\n\
         - Cost: ${cost}{baseline}\n\
         \n\
         Here are the system logs for that day:\n\
         {logs}\n\
         \n\
         Explain why the cost spiked in plain simple English without jargon for a manager.\n\
         Structure your answer with:\n\
         1. What happened?\n\
         2. Root Cause\n\
         3. Recommended Action\n",
        date = request.date.format("%Y-%m-%d"),
        cost = request.cost,
        baseline = baseline,
        logs = request.log_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(baseline: Option<f64>) -> ExplanationRequest {
        ExplanationRequest {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            cost: 500.0,
            baseline_cost: baseline,
            log_text: "[LOG 14:05] Scale out".to_string(),
        }
    }

    #[test]
    fn test_prompt_contains_alert_details() {
        let prompt = build_prompt(&request(Some(110.4)));

        assert!(prompt.contains("- Date: 2024-05-01"));
        assert!(prompt.contains("- Cost: $500 (Normal average is $110)"));
        assert!(prompt.contains("[LOG 14:05] Scale out"));
        assert!(prompt.contains("3. Recommended Action"));
    }

    #[test]
    fn test_prompt_without_baseline() {
        let prompt = build_prompt(&request(None));
        assert!(prompt.contains("- Cost: $500\n"));
        assert!(!prompt.contains("Normal average"));
    }
}
