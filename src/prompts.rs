use crate::models::TopicRecord;

/// One line per topic, 1-based: `"<index>. <name> (popularity: <popularity>)"`.
pub fn topic_list(topics: &[TopicRecord]) -> String {
    topics
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {} (popularity: {})", i + 1, t.name, t.popularity))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn idea_prompt(topics: &[TopicRecord]) -> String {
    format!(r#"You are a product ideation analyst. Analyze the trending topics below and produce one product idea for each topic.

## Trending topics
{topics}

## Requirements

For every topic:

1. **Understand the context**: infer from the headline what happened, why it is trending and what the public cares about.

2. **Invent a product**, including:
   - A product name wrapped in 「」, creative and memorable
   - Core function: a 50-100 word description
   - Target users: age, occupation, characteristics
   - Event timeline: 3-4 key points

3. **Score it** (100 points total):
   - innovation (0-30): are there similar products on the market
   - topicality (0-25): how easily it sparks discussion and sharing
   - fun (0-25): how enjoyable the user experience is
   - practicality (0-10): whether it solves a real need
   - feasibility (0-10): technical and commercial feasibility

## Output format

Return a JSON array. Each element looks like:
```json
{{
  "hotTopic": "trending topic",
  "productName": "「Product Name」",
  "coreFunction": "core function description",
  "targetUsers": "target user description",
  "eventTimeline": ["point 1", "point 2", "point 3"],
  "scores": {{
    "innovation": 25,
    "topicality": 22,
    "fun": 20,
    "practicality": 8,
    "feasibility": 9,
    "total": 84
  }}
}}
```

Output only the JSON array with no other text. Make sure total equals the sum of the other five scores."#, topics = topic_list(topics))
}
