use serde_json::{json, Value};

pub const DIAGNOSIS_PROMPT: &str = "You are an expert plant pathologist. \
Examine the attached plant leaf image or document and diagnose the plant's health. \
Set overallStatus to Healthy, Diseased or Unknown (Unknown when the input does not show a plant leaf clearly enough). \
List every disease, pest or deficiency you detect in issues, each with a severity of None, Low, Medium or High, \
a confidence given as a percentage such as \"85%\", and a short plain-language explanation of the visible symptoms. \
For each issue give a treatmentPlan of numbered steps in the order they should be carried out, starting at 1, \
with the action, when to do it and practical details; prefer organic or low-toxicity options first. \
If the plant is healthy, return a single issue named \"No issues detected\" with severity None and an empty treatmentPlan. \
Add general safetyTips for handling treatments and a followUp recommendation on when and how to re-check the plant. \
Respond only with JSON matching the provided schema.";

/// Structured-output schema sent with every analysis request.
pub fn response_schema() -> Value {
    let string = || json!({ "type": "STRING" });
    let treatment_step = json!({
        "type": "OBJECT",
        "properties": {
            "step": { "type": "INTEGER" },
            "action": string(),
            "timing": string(),
            "details": string(),
        },
        "required": ["step", "action", "timing", "details"],
    });
    let issue = json!({
        "type": "OBJECT",
        "properties": {
            "name": string(),
            "severity": { "type": "STRING", "enum": ["None", "Low", "Medium", "High"] },
            "confidence": string(),
            "explanation": string(),
            "treatmentPlan": { "type": "ARRAY", "items": treatment_step },
        },
        "required": ["name", "severity", "confidence", "explanation", "treatmentPlan"],
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "overallStatus": { "type": "STRING", "enum": ["Healthy", "Diseased", "Unknown"] },
            "issues": { "type": "ARRAY", "items": issue },
            "safetyTips": { "type": "ARRAY", "items": string() },
            "followUp": string(),
        },
        "required": ["overallStatus", "issues", "safetyTips", "followUp"],
    })
}

#[cfg(test)]
mod tests {
    use super::response_schema;

    #[test]
    fn schema_requires_every_report_field() {
        let schema = response_schema();
        assert_eq!(
            schema["required"],
            serde_json::json!(["overallStatus", "issues", "safetyTips", "followUp"])
        );
        let issue = &schema["properties"]["issues"]["items"];
        assert_eq!(issue["required"].as_array().unwrap().len(), 5);
        assert_eq!(
            issue["properties"]["treatmentPlan"]["items"]["required"][0],
            "step"
        );
    }
}
