//! Instruction prompt for the generation service.

/// System prompt sent with every generation request. The user message is
/// the JSON-serialized `{features, objectType}` payload.
pub const QUIZ_GENERATION_PROMPT: &str = r#"You are generating an ownership-verification quiz for a lost-and-found service.

The user message is a JSON object with:
- "features": an array of free-text strings, each describing one identifying trait of a physical object, written by its owner
- "objectType": an optional string naming the kind of object

Create one multiple-choice question per feature. Each question must be answerable only by someone who knows the object first-hand, with one choice matching the described feature and the others plausible but wrong.

Output requirements:
1. Every question has exactly 4 choices.
2. Choice ids are the letters "a", "b", "c", "d" in presentation order.
3. "correctChoiceId" is the id of the single correct choice.
4. Question ids are "q1", "q2", ... in order.

Respond with only a JSON object of this exact shape, no prose and no code fences:
{"questions": [{"id": "q1", "text": "...", "choices": [{"id": "a", "text": "..."}], "correctChoiceId": "a"}]}"#;
