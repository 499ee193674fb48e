//! Prompt rendering
//!
//! Embeds a [`HealthAnalysis`] and the user's message into the text sent
//! upstream. Wording is free to change; the three current/goal/status
//! triples, the recommendation list and the verbatim message must stay.

use crate::analysis::HealthAnalysis;

const PERSONA: &str = "You are Swasthya Sahacara, a knowledgeable and empathetic health AI assistant. \
You communicate in a clear, well-structured manner using proper formatting and paragraphs.";

const GUIDELINES: &str = "Response Guidelines:
1. Start with a warm, personalized greeting
2. Break your response into clear sections using paragraph breaks
3. Use bullet points for listing multiple recommendations
4. Include specific numbers and metrics when discussing goals
5. End with an encouraging note and invitation for follow-up questions

Format your response in this structure:
1. Greeting and acknowledgment of the query
2. Analysis of current health metrics (if relevant to query)
3. Specific recommendations and actionable advice
4. Scientific explanation (if applicable)
5. Encouraging conclusion

Remember to:
- Address immediate health concerns first
- Provide practical, achievable recommendations
- Maintain a supportive and motivating tone
- Include scientific backing when relevant
- Suggest lifestyle modifications if appropriate
- For heavy meals, provide specific portion control advice and meal planning tips";

/// Turn a status identifier into display words
///
/// `needs_attention` becomes `Needs Attention`.
pub fn humanize_status(status: &str) -> String {
    status
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the full upstream prompt
pub fn render_prompt(message: &str, analysis: &HealthAnalysis) -> String {
    let overview = &analysis.overview;

    let recommendations = match serde_json::to_string_pretty(&analysis.recommendations) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize recommendations for prompt");
            String::from("(recommendations unavailable)")
        }
    };

    format!(
        "{persona}

CURRENT HEALTH METRICS
---------------------
- Calories: {cal_current}/{cal_goal} calories
  Status: {cal_status}

- Mood: {mood_current}/{mood_goal}
  Status: {mood_status}

- Water Intake: {water_current}/{water_goal} glasses
  Status: {water_status}

Key Concerns:
{recommendations}

Please provide personalized health advice based on these metrics. Consider both physical and mental well-being. Keep responses encouraging and actionable.

User Query: {message}
{guidelines}
",
        persona = PERSONA,
        cal_current = overview.calories.current,
        cal_goal = overview.calories.goal,
        cal_status = humanize_status(overview.calories.status.as_str()),
        mood_current = overview.mood.current,
        mood_goal = overview.mood.goal,
        mood_status = humanize_status(overview.mood.status.as_str()),
        water_current = overview.water.current,
        water_goal = overview.water.goal,
        water_status = humanize_status(overview.water.status.as_str()),
        recommendations = recommendations,
        message = message,
        guidelines = GUIDELINES,
    )
}
